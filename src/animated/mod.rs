//! Tick-stepped interpolation of border size and center.
//!
//! [`AnimatedValue`] is a small state machine: either a fixed value or a
//! transition counting elapsed ticks towards its end. Every mutation replaces
//! the value wholesale, and [`AnimatedValue::tick`] returns the successor
//! state rather than mutating in place, so a transition that reaches its end
//! collapses to exactly `Static(end)`.

mod lerp;

pub use lerp::Lerp;

use serde::{Deserialize, Serialize};

/// Motion classification of an animated value or a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionStatus {
    /// No transition in progress.
    Stationary,
    /// Transition towards a larger value.
    Growing,
    /// Transition towards a smaller or equal value.
    Shrinking,
}

impl MotionStatus {
    /// Returns `true` for [`MotionStatus::Stationary`].
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Stationary)
    }
}

/// In-flight linear transition.
///
/// Invariants: `total_ticks > 0` and `elapsed_ticks < total_ticks`. A
/// transition that would reach its end is never stored; it becomes
/// [`AnimatedValue::Static`] instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<T> {
    start: T,
    end: T,
    total_ticks: u64,
    elapsed_ticks: u64,
    current: T,
}

impl<T: Lerp> Transition<T> {
    /// Value the transition began at.
    #[must_use]
    pub const fn start(&self) -> T {
        self.start
    }

    /// Value the transition settles on.
    #[must_use]
    pub const fn end(&self) -> T {
        self.end
    }

    /// Length of the whole transition in ticks.
    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Ticks already applied.
    #[must_use]
    pub const fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Ticks left; always positive.
    #[must_use]
    pub const fn remaining_ticks(&self) -> u64 {
        self.total_ticks - self.elapsed_ticks
    }

    /// Value at the current tick.
    #[must_use]
    pub const fn current(&self) -> T {
        self.current
    }

    /// Fraction of the transition completed, in `[0, 1)`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "Tick counts stay far below 2^52 for any realistic transition."
    )]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.elapsed_ticks as f64 / self.total_ticks as f64
    }
}

/// A scalar or point that is either fixed or moving linearly over ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatedValue<T> {
    /// Fixed value.
    Static(T),
    /// Linear transition in progress.
    Moving(Transition<T>),
}

impl<T: Lerp + Default> Default for AnimatedValue<T> {
    fn default() -> Self {
        Self::Static(T::default())
    }
}

impl<T: Lerp> AnimatedValue<T> {
    /// Builds a transition from `start` to `end` lasting `ticks`.
    ///
    /// A zero-tick transition is rejected in favour of `Static(end)`, so the
    /// new value is visible immediately without any tick.
    ///
    /// # Examples
    ///
    /// ```
    /// use lisiere::animated::{AnimatedValue, MotionStatus};
    /// let instant = AnimatedValue::between(100.0, 50.0, 0);
    /// assert_eq!(instant, AnimatedValue::Static(50.0));
    /// assert_eq!(instant.status(), MotionStatus::Stationary);
    /// ```
    #[must_use]
    pub const fn between(start: T, end: T, ticks: u64) -> Self {
        if ticks == 0 {
            return Self::Static(end);
        }
        Self::Moving(Transition {
            start,
            end,
            total_ticks: ticks,
            elapsed_ticks: 0,
            current: start,
        })
    }

    /// Starts a transition from the current value towards `end`.
    #[must_use]
    pub fn towards(self, end: T, ticks: u64) -> Self {
        Self::between(self.value(), end, ticks)
    }

    /// Advances by one tick and returns the successor state.
    ///
    /// Call once per simulation step. A transition whose elapsed count reaches
    /// its total collapses to `Static(end)`, leaving no residual error from
    /// the interpolation.
    ///
    /// # Examples
    ///
    /// ```
    /// use lisiere::animated::AnimatedValue;
    /// let mut size = AnimatedValue::between(100.0, 50.0, 2);
    /// size = size.tick();
    /// assert_eq!(size.value(), 75.0);
    /// size = size.tick();
    /// assert_eq!(size, AnimatedValue::Static(50.0));
    /// ```
    #[must_use]
    pub fn tick(self) -> Self {
        match self {
            Self::Static(_) => self,
            Self::Moving(transition) => {
                let elapsed_ticks = transition.elapsed_ticks + 1;
                if elapsed_ticks >= transition.total_ticks {
                    return Self::Static(transition.end);
                }
                let mut next = Transition {
                    elapsed_ticks,
                    ..transition
                };
                next.current = next.start.lerp_to(next.end, next.progress());
                Self::Moving(next)
            }
        }
    }

    /// Value at the current tick.
    #[must_use]
    pub const fn value(&self) -> T {
        match self {
            Self::Static(value) => *value,
            Self::Moving(transition) => transition.current,
        }
    }

    /// Value this animation settles on.
    #[must_use]
    pub const fn target(&self) -> T {
        match self {
            Self::Static(value) => *value,
            Self::Moving(transition) => transition.end,
        }
    }

    /// Ticks until the animation settles; zero when static.
    #[must_use]
    pub const fn remaining_ticks(&self) -> u64 {
        match self {
            Self::Static(_) => 0,
            Self::Moving(transition) => transition.remaining_ticks(),
        }
    }

    /// Returns `true` while a transition is in progress.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self, Self::Moving(_))
    }

    /// The in-flight transition, if any.
    #[must_use]
    pub const fn transition(&self) -> Option<&Transition<T>> {
        match self {
            Self::Static(_) => None,
            Self::Moving(transition) => Some(transition),
        }
    }

    /// Growing iff the end magnitude exceeds the start magnitude.
    #[must_use]
    pub fn status(&self) -> MotionStatus {
        match self {
            Self::Static(_) => MotionStatus::Stationary,
            Self::Moving(transition) => {
                if transition.end.magnitude() > transition.start.magnitude() {
                    MotionStatus::Growing
                } else {
                    MotionStatus::Shrinking
                }
            }
        }
    }
}
