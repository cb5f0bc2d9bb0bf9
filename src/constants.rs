//! Border engine constants used across modules.
//!
//! Timing values are expressed in simulation ticks. Wall-clock durations are
//! converted once, at transition start, using [`NOMINAL_TICKS_PER_SECOND`].

/// Simulation ticks per second the engine is designed around.
pub const NOMINAL_TICKS_PER_SECOND: u64 = 20;
/// Milliseconds covered by one tick at the nominal rate.
pub const NOMINAL_MILLIS_PER_TICK: u64 = 1_000 / NOMINAL_TICKS_PER_SECOND;
/// Ticks between re-announcements of an in-flight transition to listeners.
pub const REANNOUNCE_INTERVAL_TICKS: u64 = NOMINAL_TICKS_PER_SECOND;

/// Edge length of a border nobody has resized.
pub const DEFAULT_BORDER_SIZE: f64 = 59_999_968.0;
/// Smallest edge length; smaller requests are raised to it.
pub const MIN_BORDER_SIZE: f64 = 1.0;
/// Largest edge length; larger requests are lowered to it.
pub const MAX_BORDER_SIZE: f64 = 59_999_968.0;
/// Largest absolute value accepted for any center component.
pub const MAX_CENTER_COORDINATE: f64 = 29_999_984.0;

/// Default damage per block beyond the safe zone.
pub const DEFAULT_DAMAGE_PER_BLOCK: f64 = 0.2;
/// Default distance tolerated past the border.
pub const DEFAULT_SAFE_ZONE: f64 = 5.0;
/// Default warning distance.
pub const DEFAULT_WARNING_DISTANCE: f64 = 5.0;
/// Default warning lead time in seconds.
pub const DEFAULT_WARNING_TIME_SECS: u32 = 15;

/// Upper bound on sampled points per box edge, keeping surface sampling finite
/// for very large borders.
pub const MAX_SAMPLES_PER_EDGE: u64 = 1_024;
