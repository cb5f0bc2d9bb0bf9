//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between wall-clock milliseconds, ticks
//! and integer damage amounts. Durations convert with the nominal tick rate
//! only; callers never resample a stored duration.

use crate::{NOMINAL_MILLIS_PER_TICK, NOMINAL_TICKS_PER_SECOND};

/// Convert a wall-clock duration into whole ticks at the nominal rate.
///
/// Partial ticks are truncated, so anything shorter than one tick becomes a
/// zero-duration (instant) transition.
///
/// # Examples
/// ```
/// use lisiere::numeric::millis_to_ticks;
/// assert_eq!(millis_to_ticks(1_000), 20);
/// assert_eq!(millis_to_ticks(49), 0);
/// ```
#[must_use]
pub const fn millis_to_ticks(millis: u64) -> u64 {
    millis / NOMINAL_MILLIS_PER_TICK
}

/// Convert ticks into milliseconds at the nominal rate.
#[must_use]
pub const fn ticks_to_nominal_millis(ticks: u64) -> u64 {
    ticks.saturating_mul(NOMINAL_MILLIS_PER_TICK)
}

/// Convert ticks into milliseconds at an observed tick rate.
///
/// Falls back to the nominal rate when `ticks_per_second` is not a positive
/// finite number.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "The rounded value is clamped into the u64 domain before casting."
)]
#[must_use]
pub fn ticks_to_millis_at(ticks: u64, ticks_per_second: f64) -> u64 {
    if !ticks_per_second.is_finite() || ticks_per_second <= 0.0 {
        return ticks_to_nominal_millis(ticks);
    }
    let millis = (ticks as f64 * 1_000.0 / ticks_per_second).round();
    millis.clamp(0.0, u64::MAX as f64) as u64
}

/// Nominal tick rate as a float, for blending with observed rates.
#[expect(
    clippy::cast_precision_loss,
    reason = "The nominal tick rate is a small constant."
)]
#[must_use]
pub fn nominal_rate() -> f64 {
    NOMINAL_TICKS_PER_SECOND as f64
}

/// Floor the value and convert to `u32`, returning `None` when out of range.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The floored value is validated against the u32 domain."
)]
#[must_use]
pub fn floor_to_u32(value: f64) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    let floored = value.floor();
    if floored < f64::from(u32::MIN) || floored > f64::from(u32::MAX) {
        return None;
    }
    Some(floored as u32)
}
