//! Convenience constructors for borders and tick loops used in tests.

use glam::DVec3;
use lisiere::border::{DamageReport, Occupant, RegionBorder};
use lisiere::shape::{BoxBoundary, VerticalExtent};
use lisiere::tracker::MultiRegionTracker;
use lisiere::{WorldHandle, WorldId};

/// Stationary column border of edge `size` centred on the origin.
///
/// # Examples
/// ```
/// use test_utils::builders::column_border;
/// let border = column_border(3, 40.0);
/// assert_eq!(border.size(), 40.0);
/// ```
pub fn column_border(world: u64, size: f64) -> RegionBorder {
    RegionBorder::new(
        WorldId(world),
        BoxBoundary::new(size, DVec3::ZERO, VerticalExtent::Unbounded),
    )
}

/// Column border already shrinking or growing from `start` to `end`.
///
/// # Panics
/// Panics if `millis` is negative.
pub fn lerping_border(world: u64, start: f64, end: f64, millis: i64) -> RegionBorder {
    let mut border = column_border(world, start);
    border
        .lerp_size_between(start, end, millis)
        .expect("lerp parameters must be valid");
    border
}

/// Handle named `world-<id>`.
pub fn handle(world: u64) -> WorldHandle {
    WorldHandle::new(WorldId(world), format!("world-{world}"))
}

/// Ticks every border once with no occupants, then flushes the tracker.
pub fn step_all<'a>(
    borders: impl IntoIterator<Item = &'a mut RegionBorder>,
    tracker: &mut MultiRegionTracker,
) {
    let nobody: Vec<Occupant> = Vec::new();
    let mut sink: Vec<DamageReport> = Vec::new();
    for border in borders {
        border.tick(&nobody, &mut sink);
    }
    tracker.process();
}
