//! Headless stepping of several borders and their tracker.
//!
//! Every border is ticked first; only then is the tracker flushed, so
//! listeners always observe the post-tick state of all worlds.

use log::debug;

use crate::border::{DamageSink, OccupantProvider, RegionBorder};
use crate::error::TrackerError;
use crate::shape::{BoundaryShape, BoxBoundary};
use crate::tracker::{MotionChange, MultiRegionTracker};
use crate::world_handle::{WorldHandle, WorldId};

/// Owns the borders of several worlds and one tracker over them.
pub struct Simulation<S = BoxBoundary> {
    borders: Vec<RegionBorder<S>>,
    tracker: MultiRegionTracker,
    ticks: u64,
}

impl<S: BoundaryShape> Default for Simulation<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BoundaryShape> Simulation<S> {
    /// Empty simulation with a fresh tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            borders: Vec::new(),
            tracker: MultiRegionTracker::new(),
            ticks: 0,
        }
    }

    /// Adds `border` and starts tracking it under `handle`.
    ///
    /// # Errors
    /// Returns [`TrackerError::AlreadyTracked`] when the border is already
    /// linked or its world is already present.
    pub fn add_world(
        &mut self,
        mut border: RegionBorder<S>,
        handle: WorldHandle,
    ) -> Result<(), TrackerError> {
        self.tracker.add_region(&mut border, handle)?;
        self.borders.push(border);
        Ok(())
    }

    /// Stops tracking `world` and hands its border back, unlinked.
    pub fn remove_world(&mut self, world: WorldId) -> Option<RegionBorder<S>> {
        let index = self.borders.iter().position(|b| b.world() == world)?;
        let mut border = self.borders.remove(index);
        self.tracker.remove_region(&mut border);
        Some(border)
    }

    /// Border of `world`, if present.
    #[must_use]
    pub fn border(&self, world: WorldId) -> Option<&RegionBorder<S>> {
        self.borders.iter().find(|b| b.world() == world)
    }

    /// Mutable border of `world`, if present.
    pub fn border_mut(&mut self, world: WorldId) -> Option<&mut RegionBorder<S>> {
        self.borders.iter_mut().find(|b| b.world() == world)
    }

    /// Every border, in insertion order.
    pub fn borders(&self) -> impl Iterator<Item = &RegionBorder<S>> {
        self.borders.iter()
    }

    /// Tracker supervising every border.
    #[must_use]
    pub const fn tracker(&self) -> &MultiRegionTracker {
        &self.tracker
    }

    /// Mutable tracker, mainly for registering listeners.
    pub fn tracker_mut(&mut self) -> &mut MultiRegionTracker {
        &mut self.tracker
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Forwards a measured tick rate to every border.
    pub fn set_observed_tick_rate(&mut self, ticks_per_second: f64) {
        for border in &mut self.borders {
            border.set_observed_tick_rate(ticks_per_second);
        }
    }

    /// Advances every border by one tick, then dispatches tracker events.
    ///
    /// Returns the motion flips observed this tick, in border order.
    pub fn step(
        &mut self,
        occupants: &dyn OccupantProvider,
        sink: &mut dyn DamageSink,
    ) -> Vec<(WorldId, MotionChange)> {
        let changes: Vec<_> = self
            .borders
            .iter_mut()
            .filter_map(|border| {
                border
                    .tick(occupants, sink)
                    .map(|change| (border.world(), change))
            })
            .collect();
        self.tracker.process();
        self.ticks += 1;
        if !changes.is_empty() {
            debug!("tick {}: {} motion change(s)", self.ticks, changes.len());
        }
        changes
    }

    /// Steps until every border is stationary or `max_ticks` elapse. Returns
    /// the number of ticks taken.
    pub fn run_until_settled(
        &mut self,
        occupants: &dyn OccupantProvider,
        sink: &mut dyn DamageSink,
        max_ticks: u64,
    ) -> u64 {
        let start = self.ticks;
        while self.ticks - start < max_ticks && self.borders.iter().any(RegionBorder::is_moving) {
            self.step(occupants, sink);
        }
        self.ticks - start
    }
}
