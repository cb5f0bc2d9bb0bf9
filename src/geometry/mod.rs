//! Axis-aligned geometry backing border queries.

mod aabb;

pub use aabb::Aabb;

use glam::DVec3;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Result of testing a volume against a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Containment {
    /// No part of the volume is inside.
    None,
    /// The volume straddles the boundary.
    Partial,
    /// Every part of the volume is inside.
    Full,
}

/// Totally ordered key for a point, so sampled points can be stored in sets
/// and diffed between frames.
///
/// # Examples
///
/// ```
/// use glam::DVec3;
/// use lisiere::geometry::PointKey;
/// let a = PointKey::from(DVec3::new(1.0, 2.0, 3.0));
/// let b = PointKey::from(DVec3::new(1.0, 2.0, 4.0));
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointKey(
    /// `x`, `y` and `z` components.
    pub [OrderedFloat<f64>; 3],
);

impl From<DVec3> for PointKey {
    fn from(point: DVec3) -> Self {
        Self([
            OrderedFloat(point.x),
            OrderedFloat(point.y),
            OrderedFloat(point.z),
        ])
    }
}

impl From<PointKey> for DVec3 {
    fn from(key: PointKey) -> Self {
        let [x, y, z] = key.0;
        Self::new(x.into_inner(), y.into_inner(), z.into_inner())
    }
}
