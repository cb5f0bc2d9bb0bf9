//! Queryable border regions backed by animated size and center.
//!
//! [`BoundaryShape`] is the seam between a world's border and the geometry it
//! animates. [`BoxBoundary`] is the axis-aligned implementation used by
//! [`RegionBorder`](crate::border::RegionBorder): a cube of edge `size`, or a
//! square column unbounded along `y`.

mod sampling;

pub use sampling::SamplePoints;

use std::cell::Cell;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::animated::{AnimatedValue, MotionStatus};
use crate::geometry::{Aabb, Containment};

/// Region whose extent may change every tick.
///
/// Size and center animate independently: replacing one never resets or
/// retimes the other.
pub trait BoundaryShape {
    /// Size animation driving this region.
    fn size_animation(&self) -> &AnimatedValue<f64>;

    /// Center animation driving this region.
    fn center_animation(&self) -> &AnimatedValue<DVec3>;

    /// Replaces the size animation wholesale.
    fn replace_size(&mut self, size: AnimatedValue<f64>);

    /// Replaces the center animation wholesale.
    fn replace_center(&mut self, center: AnimatedValue<DVec3>);

    /// Current bounding volume.
    fn bounds(&self) -> Aabb;

    /// Advances both animations by one tick. Returns `true` when the geometry
    /// changed.
    fn tick(&mut self) -> bool;

    /// Vector from `point` to the nearest point of the boundary surface.
    ///
    /// Outside, this targets the nearest point of the region. Inside, it
    /// targets the nearest face; ties resolve to the face evaluated first in
    /// the order min-x, max-x, min-y, max-y, min-z, max-z.
    fn direction_to(&self, point: DVec3) -> DVec3;

    /// Sampled surface points at `density` points per unit length.
    fn sample_points(&self, density: f64) -> SamplePoints;

    /// Current edge length.
    fn size(&self) -> f64 {
        self.size_animation().value()
    }

    /// Current center.
    fn center(&self) -> DVec3 {
        self.center_animation().value()
    }

    /// Starts a size transition from the current size. Zero ticks applies
    /// `target` immediately.
    fn resize(&mut self, target: f64, ticks: u64) {
        let next = self.size_animation().towards(target, ticks);
        self.replace_size(next);
    }

    /// Starts a center transition from the current center. Zero ticks
    /// applies `target` immediately.
    fn recenter(&mut self, target: DVec3, ticks: u64) {
        let next = self.center_animation().towards(target, ticks);
        self.replace_center(next);
    }

    /// Returns `true` if `point` is inside or on the boundary.
    fn contains_point(&self, point: DVec3) -> bool {
        self.bounds().contains(point)
    }

    /// Classifies `volume` by sampling its eight corners with the same
    /// inclusive convention as [`BoundaryShape::contains_point`].
    ///
    /// Sampling stops as soon as one inside and one outside corner are seen.
    /// When every corner is outside, an overlap test separates a volume that
    /// straddles or encloses the region ([`Containment::Partial`]) from one
    /// that misses it entirely.
    fn contains_volume(&self, volume: &Aabb) -> Containment {
        let mut inside = false;
        let mut outside = false;
        for corner in volume.corners() {
            if self.contains_point(corner) {
                inside = true;
            } else {
                outside = true;
            }
            if inside && outside {
                return Containment::Partial;
            }
        }
        if inside {
            Containment::Full
        } else if self.bounds().overlaps(volume) {
            Containment::Partial
        } else {
            Containment::None
        }
    }

    /// Length of [`BoundaryShape::direction_to`].
    fn distance_to(&self, point: DVec3) -> f64 {
        self.direction_to(point).length()
    }

    /// Growth status, driven by the size animation only.
    fn status(&self) -> MotionStatus {
        self.size_animation().status()
    }

    /// Returns `true` while either the size or the center is moving.
    fn is_moving(&self) -> bool {
        self.size_animation().is_moving() || self.center_animation().is_moving()
    }
}

/// Vertical behaviour of a [`BoxBoundary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerticalExtent {
    /// Closed cube with six faces.
    Bounded,
    /// Square column spanning all `y`, with four faces.
    #[default]
    Unbounded,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    const fn of(self, v: DVec3) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    const fn unit(self) -> DVec3 {
        match self {
            Self::X => DVec3::X,
            Self::Y => DVec3::Y,
            Self::Z => DVec3::Z,
        }
    }
}

/// Axis-aligned border of edge length `size` around `center`.
///
/// The bounding box is cached and rebuilt lazily on the first query after a
/// tick or replacement actually changed size or center.
#[derive(Debug, Clone)]
pub struct BoxBoundary {
    size: AnimatedValue<f64>,
    center: AnimatedValue<DVec3>,
    vertical: VerticalExtent,
    cached: Cell<Aabb>,
    dirty: Cell<bool>,
}

impl BoxBoundary {
    /// Builds a stationary boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use glam::DVec3;
    /// use lisiere::shape::{BoundaryShape, BoxBoundary, VerticalExtent};
    /// let shape = BoxBoundary::new(10.0, DVec3::ZERO, VerticalExtent::Bounded);
    /// assert!(shape.contains_point(DVec3::new(5.0, 0.0, -5.0)));
    /// assert!(!shape.contains_point(DVec3::new(5.1, 0.0, 0.0)));
    /// ```
    #[must_use]
    pub fn new(size: f64, center: DVec3, vertical: VerticalExtent) -> Self {
        let cached = Cell::new(compute_bounds(size, center, vertical));
        Self {
            size: AnimatedValue::Static(size),
            center: AnimatedValue::Static(center),
            vertical,
            cached,
            dirty: Cell::new(false),
        }
    }

    /// Decomposes a prebuilt volume into size and center.
    ///
    /// The size is the largest edge among the axes the extent bounds, so a
    /// non-cubic volume becomes the smallest enclosing cube or column.
    #[must_use]
    pub fn from_bounds(bounds: &Aabb, vertical: VerticalExtent) -> Self {
        let extents = bounds.extents();
        let size = match vertical {
            VerticalExtent::Bounded => extents.max_element(),
            VerticalExtent::Unbounded => extents.x.max(extents.z),
        };
        Self::new(size, bounds.center(), vertical)
    }

    /// Whether the boundary is a cube or a column.
    #[must_use]
    pub const fn vertical(&self) -> VerticalExtent {
        self.vertical
    }

    const fn axes(&self) -> &'static [Axis] {
        match self.vertical {
            VerticalExtent::Bounded => &[Axis::X, Axis::Y, Axis::Z],
            VerticalExtent::Unbounded => &[Axis::X, Axis::Z],
        }
    }

    fn refresh(&self) -> Aabb {
        if self.dirty.replace(false) {
            self.cached.set(compute_bounds(
                self.size.value(),
                self.center.value(),
                self.vertical,
            ));
        }
        self.cached.get()
    }

    #[cfg(test)]
    fn is_dirty(&self) -> bool {
        self.dirty.get()
    }
}

fn compute_bounds(size: f64, center: DVec3, vertical: VerticalExtent) -> Aabb {
    let half = size * 0.5;
    match vertical {
        VerticalExtent::Bounded => Aabb::from_center_half_extents(center, DVec3::splat(half)),
        VerticalExtent::Unbounded => Aabb::new(
            DVec3::new(center.x - half, f64::NEG_INFINITY, center.z - half),
            DVec3::new(center.x + half, f64::INFINITY, center.z + half),
        ),
    }
}

impl BoundaryShape for BoxBoundary {
    fn size_animation(&self) -> &AnimatedValue<f64> {
        &self.size
    }

    fn center_animation(&self) -> &AnimatedValue<DVec3> {
        &self.center
    }

    fn replace_size(&mut self, size: AnimatedValue<f64>) {
        self.size = size;
        self.dirty.set(true);
    }

    fn replace_center(&mut self, center: AnimatedValue<DVec3>) {
        self.center = center;
        self.dirty.set(true);
    }

    fn bounds(&self) -> Aabb {
        self.refresh()
    }

    fn tick(&mut self) -> bool {
        let changed = self.is_moving();
        self.size = self.size.tick();
        self.center = self.center.tick();
        if changed {
            self.dirty.set(true);
        }
        changed
    }

    fn direction_to(&self, point: DVec3) -> DVec3 {
        let bounds = self.bounds();
        if !bounds.contains(point) {
            return bounds.clamp(point) - point;
        }
        let mut nearest: Option<(f64, DVec3)> = None;
        for &axis in self.axes() {
            let to_min = axis.of(point) - axis.of(bounds.min());
            let to_max = axis.of(bounds.max()) - axis.of(point);
            for (distance, towards) in [(to_min, -axis.unit()), (to_max, axis.unit())] {
                if nearest.is_none_or(|(best, _)| distance < best) {
                    nearest = Some((distance, towards * distance));
                }
            }
        }
        nearest.map_or(DVec3::ZERO, |(_, direction)| direction)
    }

    fn sample_points(&self, density: f64) -> SamplePoints {
        let bounds = self.bounds();
        match self.vertical {
            VerticalExtent::Bounded => SamplePoints::shell(&bounds, density),
            VerticalExtent::Unbounded => {
                SamplePoints::perimeter(&bounds, self.center().y, density)
            }
        }
    }
}
