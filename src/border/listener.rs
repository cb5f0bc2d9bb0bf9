//! Change notifications pushed to renderers and network sync.

use glam::DVec3;

use crate::world_handle::WorldId;

/// Why a transition is being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnounceReason {
    /// A size or center mutation just happened.
    Started,
    /// Periodic refresh of an in-flight transition.
    Refresh,
}

/// Transition parameters as seen by listeners extrapolating in wall-clock
/// time.
///
/// On [`AnnounceReason::Started`] `start`/`end` are exactly the values the
/// mutation used. On [`AnnounceReason::Refresh`] `start` is the current value,
/// so a listener can restart its extrapolation from authoritative state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LerpAnnouncement<T> {
    /// Value the announced stretch of the transition begins at.
    pub start: T,
    /// Value the transition settles on.
    pub end: T,
    /// Ticks left until the value settles on `end`.
    pub remaining_ticks: u64,
    /// Wall-clock time left at the observed tick rate.
    pub remaining_millis: u64,
    /// Duration of the whole transition at the nominal tick rate.
    pub nominal_millis: u64,
    /// Whether this is a fresh mutation or a periodic refresh.
    pub reason: AnnounceReason,
}

/// Mutation of a border's observable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderChange {
    /// Size transition started, cancelled or refreshed.
    Size(LerpAnnouncement<f64>),
    /// Center transition started, cancelled or refreshed.
    Center(LerpAnnouncement<DVec3>),
    /// New damage per block beyond the safe zone.
    DamagePerBlock(f64),
    /// New safe-zone distance.
    SafeZone(f64),
    /// New warning distance.
    WarningDistance(f64),
    /// New warning time in seconds.
    WarningTime(u32),
}

/// Receives border changes synchronously, before the mutating call returns.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeListener {
    /// Called with the world whose border changed and the change itself.
    fn on_change(&mut self, world: WorldId, change: &BorderChange);
}

impl<F: FnMut(WorldId, &BorderChange)> ChangeListener for F {
    fn on_change(&mut self, world: WorldId, change: &BorderChange) {
        self(world, change);
    }
}
