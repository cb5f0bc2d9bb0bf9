//! Deterministic surface sampling for renderers.

use glam::{DVec2, DVec3};

use crate::geometry::Aabb;
use crate::MAX_SAMPLES_PER_EDGE;

/// Lazy, restartable sequence of points on a border's surface.
///
/// A closed box yields the integer lattice points of its six faces, ordered by
/// `x` index, then `y`, then `z`. A column yields its four walls as a
/// perimeter loop in the plane `y = center.y`, starting at the `(min x, min z)`
/// corner. Identical geometry always yields the identical sequence, so a
/// renderer may diff consecutive frames.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePoints {
    min: DVec3,
    max: DVec3,
    steps: u64,
    cursor: Cursor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cursor {
    Shell { i: u64, j: u64, k: u64 },
    Perimeter { plane_y: f64, index: u64 },
    Done,
}

impl SamplePoints {
    /// Samples the faces of a bounded box.
    pub(crate) fn shell(bounds: &Aabb, density: f64) -> Self {
        let steps = steps_for(bounds.extents().max_element(), density);
        Self {
            min: bounds.min(),
            max: bounds.max(),
            steps,
            cursor: Cursor::Shell { i: 0, j: 0, k: 0 },
        }
    }

    /// Samples the walls of a box that is unbounded along `y`.
    pub(crate) fn perimeter(bounds: &Aabb, plane_y: f64, density: f64) -> Self {
        let extents = bounds.extents();
        let steps = steps_for(extents.x.max(extents.z), density);
        Self {
            min: bounds.min(),
            max: bounds.max(),
            steps,
            cursor: Cursor::Perimeter { plane_y, index: 0 },
        }
    }

    /// Number of subdivisions along each edge.
    #[must_use]
    pub const fn steps_per_edge(&self) -> u64 {
        self.steps
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "Sample indices are bounded by MAX_SAMPLES_PER_EDGE."
    )]
    fn fraction(&self, index: u64) -> f64 {
        index as f64 / self.steps as f64
    }

    fn lattice_point(&self, i: u64, j: u64, k: u64) -> DVec3 {
        let span = self.max - self.min;
        self.min + span * DVec3::new(self.fraction(i), self.fraction(j), self.fraction(k))
    }

    fn perimeter_point(&self, plane_y: f64, index: u64) -> DVec3 {
        let near_left = DVec2::new(self.min.x, self.min.z);
        let near_right = DVec2::new(self.max.x, self.min.z);
        let far_right = DVec2::new(self.max.x, self.max.z);
        let far_left = DVec2::new(self.min.x, self.max.z);
        let edge = index / self.steps;
        let along = self.fraction(index % self.steps);
        let (from, to) = match edge {
            0 => (near_left, near_right),
            1 => (near_right, far_right),
            2 => (far_right, far_left),
            _ => (far_left, near_left),
        };
        let flat = from.lerp(to, along);
        DVec3::new(flat.x, plane_y, flat.y)
    }

    /// Moves the shell cursor to the next surface lattice point. Interior
    /// rows jump straight from the near `z` face to the far one.
    const fn advance_shell(&self, i: u64, j: u64, k: u64) -> Cursor {
        let n = self.steps;
        let on_side = i == 0 || i == n || j == 0 || j == n;
        let next_k = if on_side || k == n { k + 1 } else { n };
        if next_k <= n {
            Cursor::Shell { i, j, k: next_k }
        } else if j < n {
            Cursor::Shell { i, j: j + 1, k: 0 }
        } else if i < n {
            Cursor::Shell { i: i + 1, j: 0, k: 0 }
        } else {
            Cursor::Done
        }
    }
}

impl Iterator for SamplePoints {
    type Item = DVec3;

    fn next(&mut self) -> Option<DVec3> {
        match self.cursor {
            Cursor::Done => None,
            Cursor::Shell { i, j, k } => {
                let point = self.lattice_point(i, j, k);
                self.cursor = self.advance_shell(i, j, k);
                Some(point)
            }
            Cursor::Perimeter { plane_y, index } => {
                if index >= self.steps * 4 {
                    self.cursor = Cursor::Done;
                    return None;
                }
                let point = self.perimeter_point(plane_y, index);
                self.cursor = Cursor::Perimeter {
                    plane_y,
                    index: index + 1,
                };
                Some(point)
            }
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "The subdivision count is clamped to [1, MAX_SAMPLES_PER_EDGE] before casting."
)]
fn steps_for(edge: f64, density: f64) -> u64 {
    let wanted = (edge * density).ceil();
    if !wanted.is_finite() || wanted < 1.0 {
        return 1;
    }
    wanted.min(MAX_SAMPLES_PER_EDGE as f64) as u64
}
