//! Linear interpolation for the quantities a border animates.

use glam::{DVec2, DVec3};

/// A value that can be linearly interpolated and ranked by magnitude.
///
/// `magnitude` decides whether a transition grows or shrinks: scalars compare
/// by value, points by distance from the origin.
pub trait Lerp: Copy + PartialEq {
    /// Interpolates from `self` towards `end` by `progress` in `[0, 1]`.
    #[must_use]
    fn lerp_to(self, end: Self, progress: f64) -> Self;

    /// Scalar used to classify growth.
    fn magnitude(self) -> f64;
}

impl Lerp for f64 {
    fn lerp_to(self, end: Self, progress: f64) -> Self {
        self + (end - self) * progress
    }

    fn magnitude(self) -> f64 {
        self
    }
}

impl Lerp for DVec2 {
    fn lerp_to(self, end: Self, progress: f64) -> Self {
        self.lerp(end, progress)
    }

    fn magnitude(self) -> f64 {
        self.length()
    }
}

impl Lerp for DVec3 {
    fn lerp_to(self, end: Self, progress: f64) -> Self {
        self.lerp(end, progress)
    }

    fn magnitude(self) -> f64 {
        self.length()
    }
}
