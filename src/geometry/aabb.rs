use glam::DVec3;

/// Closed axis-aligned box.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Faces are inclusive: a point lying exactly on a face is contained.
/// - Components may be infinite to describe a box unbounded along an axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: DVec3,
    max: DVec3,
}

impl Aabb {
    /// Constructs a box from two opposite corners in any order.
    #[must_use]
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Builds a box centered at `center` with the given half-extents.
    #[must_use]
    pub fn from_center_half_extents(center: DVec3, half: DVec3) -> Self {
        let reach = half.abs();
        Self {
            min: center - reach,
            max: center + reach,
        }
    }

    /// Lowest corner.
    #[must_use]
    pub const fn min(&self) -> DVec3 {
        self.min
    }

    /// Highest corner.
    #[must_use]
    pub const fn max(&self) -> DVec3 {
        self.max
    }

    /// Midpoint; an unbounded axis reports `0.0`.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        let mid = (self.min + self.max) * 0.5;
        DVec3::new(finite_or_zero(mid.x), finite_or_zero(mid.y), finite_or_zero(mid.z))
    }

    /// Edge lengths along each axis.
    #[must_use]
    pub fn extents(&self) -> DVec3 {
        self.max - self.min
    }

    /// Returns `true` if `point` lies inside or on a face.
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Returns `true` if this box shares at least one point with `other`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// Nearest point of the box to `point`.
    #[must_use]
    pub fn clamp(&self, point: DVec3) -> DVec3 {
        point.clamp(self.min, self.max)
    }

    /// The eight corners, ordered by `(x, y, z)` bit pattern `min`→`max`.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            DVec3::new(lo.x, lo.y, lo.z),
            DVec3::new(lo.x, lo.y, hi.z),
            DVec3::new(lo.x, hi.y, lo.z),
            DVec3::new(lo.x, hi.y, hi.z),
            DVec3::new(hi.x, lo.y, lo.z),
            DVec3::new(hi.x, lo.y, hi.z),
            DVec3::new(hi.x, hi.y, lo.z),
            DVec3::new(hi.x, hi.y, hi.z),
        ]
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
