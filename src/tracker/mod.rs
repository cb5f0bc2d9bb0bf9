//! Completion barrier across several world borders.
//!
//! [`MultiRegionTracker`] watches a set of [`RegionBorder`]s and emits
//! [`TrackerEvent::AllComplete`] each time the last tracked border settles.
//! Borders report their stationary/moving flips through a [`TrackerLink`]
//! into a shared inbox; [`MultiRegionTracker::process`] drains that inbox and
//! dispatches events. Listeners may mutate borders from inside a callback:
//! the resulting reports are queued and handled in the next round of the same
//! `process` call.

mod inbox;

pub use inbox::{MotionChange, MotionFlag, TrackerLink, TransitionInbox, TransitionReport};

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};

use crate::border::RegionBorder;
use crate::error::TrackerError;
use crate::shape::BoundaryShape;
use crate::world_handle::{WorldHandle, WorldId};

/// Upper bound on drain rounds in one [`MultiRegionTracker::process`] call.
///
/// Listeners that restart borders from inside callbacks produce new reports;
/// anything still queued after this many rounds waits for the next call.
pub const MAX_DISPATCH_ROUNDS: usize = 64;

/// Notification emitted by a [`MultiRegionTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// One tracked border became stationary.
    RegionComplete(WorldHandle),
    /// A completed border started moving again.
    RegionActive(WorldHandle),
    /// Every tracked border is stationary. Carries the tracked set.
    AllComplete(HashMap<WorldId, WorldHandle>),
}

/// Receives tracker events synchronously during
/// [`MultiRegionTracker::process`].
#[cfg_attr(test, mockall::automock)]
pub trait TrackerListener {
    /// Called once per emitted event, in emission order.
    fn on_event(&mut self, event: &TrackerEvent);
}

impl<F: FnMut(&TrackerEvent)> TrackerListener for F {
    fn on_event(&mut self, event: &TrackerEvent) {
        self(event);
    }
}

/// Tracks which of several borders are still moving.
///
/// Invariant: `completed` is always a subset of the keys of `tracking`.
pub struct MultiRegionTracker {
    tracking: HashMap<WorldId, WorldHandle>,
    motion_flags: HashMap<WorldId, MotionFlag>,
    completed: HashSet<WorldId>,
    inbox: Rc<RefCell<TransitionInbox>>,
    listeners: Vec<Box<dyn TrackerListener>>,
}

impl Default for MultiRegionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiRegionTracker {
    /// Creates a tracker with nothing tracked and no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracking: HashMap::new(),
            motion_flags: HashMap::new(),
            completed: HashSet::new(),
            inbox: Rc::new(RefCell::new(TransitionInbox::default())),
            listeners: Vec::new(),
        }
    }

    /// Starts tracking `border` under `handle`.
    ///
    /// A border that is already stationary counts as completed straight away
    /// but emits nothing; the barrier is only evaluated after a real
    /// completion.
    ///
    /// A border whose previous tracker has been dropped is adopted, replacing
    /// the dead link.
    ///
    /// # Errors
    /// Returns [`TrackerError::AlreadyTracked`] when the border is linked to
    /// this or another live tracker.
    pub fn add_region<S: BoundaryShape>(
        &mut self,
        border: &mut RegionBorder<S>,
        handle: WorldHandle,
    ) -> Result<(), TrackerError> {
        let world = border.world();
        if border.is_tracked() || self.tracking.contains_key(&world) {
            return Err(TrackerError::AlreadyTracked { world });
        }
        let flag = border.attach(TrackerLink::new(&self.inbox));
        if !flag.is_moving() {
            self.completed.insert(world);
        }
        debug!("tracking {handle}");
        self.tracking.insert(world, handle);
        self.motion_flags.insert(world, flag);
        Ok(())
    }

    /// Stops tracking `border`. Never fires the barrier, even if every
    /// remaining border is stationary.
    ///
    /// Returns the handle it was tracked under, or `None` if this tracker did
    /// not own it.
    pub fn remove_region<S: BoundaryShape>(
        &mut self,
        border: &mut RegionBorder<S>,
    ) -> Option<WorldHandle> {
        if !border.link().is_some_and(|link| link.points_to(&self.inbox)) {
            return None;
        }
        border.detach();
        let world = border.world();
        self.completed.remove(&world);
        self.motion_flags.remove(&world);
        let removed = self.tracking.remove(&world);
        if let Some(handle) = &removed {
            debug!("stopped tracking {handle}");
        }
        removed
    }

    /// Adds a listener notified of every event from now on.
    pub fn register_listener(&mut self, listener: Box<dyn TrackerListener>) {
        self.listeners.push(listener);
    }

    /// Returns `true` if a border of `world` is tracked here.
    #[must_use]
    pub fn is_tracking(&self, world: WorldId) -> bool {
        self.tracking.contains_key(&world)
    }

    /// Returns `true` if the tracked border of `world` is stationary.
    #[must_use]
    pub fn is_completed(&self, world: WorldId) -> bool {
        self.completed.contains(&world)
    }

    /// Tracked worlds and the handles they were added under.
    #[must_use]
    pub fn tracked(&self) -> &HashMap<WorldId, WorldHandle> {
        &self.tracking
    }

    /// Number of tracked borders currently stationary.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Reports queued and not yet dispatched.
    #[must_use]
    pub fn pending_reports(&self) -> usize {
        self.inbox.borrow().len()
    }

    /// Dispatches every queued report.
    ///
    /// Reports are drained in batches so listeners never run while the inbox
    /// is borrowed. After a batch containing a real completion the barrier is
    /// checked: if every tracked border is completed, each motion flag is
    /// re-read and [`TrackerEvent::AllComplete`] fires only when none is
    /// moving.
    pub fn process(&mut self) {
        for _ in 0..MAX_DISPATCH_ROUNDS {
            let batch: Vec<TransitionReport> = self.inbox.borrow_mut().drain().collect();
            if batch.is_empty() {
                return;
            }
            let mut newly_completed = false;
            for report in batch {
                match report.change {
                    MotionChange::BecameStationary => {
                        newly_completed |= self.mark_completed(report.world);
                    }
                    MotionChange::BecameActive => self.mark_active(report.world),
                }
            }
            if newly_completed {
                self.check_barrier();
            }
        }
        if !self.inbox.borrow().is_empty() {
            warn!(
                "tracker dispatch hit {MAX_DISPATCH_ROUNDS} rounds; {} reports deferred",
                self.pending_reports()
            );
        }
    }

    fn mark_completed(&mut self, world: WorldId) -> bool {
        let Some(handle) = self.tracking.get(&world).cloned() else {
            debug!("ignoring completion from untracked world {world}");
            return false;
        };
        if !self.completed.insert(world) {
            return false;
        }
        debug!("{handle} completed");
        self.emit(&TrackerEvent::RegionComplete(handle));
        true
    }

    fn mark_active(&mut self, world: WorldId) {
        if !self.completed.remove(&world) {
            return;
        }
        if let Some(handle) = self.tracking.get(&world).cloned() {
            debug!("{handle} active again");
            self.emit(&TrackerEvent::RegionActive(handle));
        }
    }

    fn check_barrier(&mut self) {
        if self.tracking.is_empty() || self.completed.len() != self.tracking.len() {
            return;
        }
        let moving: Vec<WorldId> = self
            .motion_flags
            .iter()
            .filter(|(_, flag)| flag.is_moving())
            .map(|(world, _)| *world)
            .collect();
        if moving.is_empty() {
            info!("all {} tracked regions complete", self.tracking.len());
            let event = TrackerEvent::AllComplete(self.tracking.clone());
            self.emit(&event);
            return;
        }
        for world in moving {
            self.mark_active(world);
        }
    }

    fn emit(&mut self, event: &TrackerEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::{DamageReport, Occupant};
    use crate::shape::{BoxBoundary, VerticalExtent};
    use glam::DVec3;
    use rstest::{fixture, rstest};

    type Log = Rc<RefCell<Vec<TrackerEvent>>>;

    fn border(world: u64) -> RegionBorder {
        RegionBorder::new(
            world,
            BoxBoundary::new(100.0, DVec3::ZERO, VerticalExtent::Unbounded),
        )
    }

    fn handle(world: u64) -> WorldHandle {
        WorldHandle::new(world, format!("world-{world}"))
    }

    fn step(borders: &mut [&mut RegionBorder], tracker: &mut MultiRegionTracker) {
        let mut sink: Vec<DamageReport> = Vec::new();
        let nobody: Vec<Occupant> = Vec::new();
        for border in borders.iter_mut() {
            border.tick(&nobody, &mut sink);
        }
        tracker.process();
    }

    #[fixture]
    fn recorded() -> (MultiRegionTracker, Log) {
        let log: Log = Rc::default();
        let mut tracker = MultiRegionTracker::new();
        let sink = Rc::clone(&log);
        tracker.register_listener(Box::new(move |event: &TrackerEvent| {
            sink.borrow_mut().push(event.clone());
        }));
        (tracker, log)
    }

    fn all_complete_count(log: &Log) -> usize {
        log.borrow()
            .iter()
            .filter(|e| matches!(e, TrackerEvent::AllComplete(_)))
            .count()
    }

    #[rstest]
    fn stationary_border_completes_silently(recorded: (MultiRegionTracker, Log)) {
        let (mut tracker, log) = recorded;
        let mut a = border(1);
        tracker.add_region(&mut a, handle(1)).expect("first add");
        tracker.process();
        assert!(tracker.is_completed(WorldId(1)));
        assert!(log.borrow().is_empty());
    }

    #[rstest]
    fn double_add_is_rejected(recorded: (MultiRegionTracker, Log)) {
        let (mut tracker, _) = recorded;
        let mut a = border(1);
        tracker.add_region(&mut a, handle(1)).expect("first add");
        let err = tracker.add_region(&mut a, handle(1)).expect_err("second add");
        assert_eq!(err, TrackerError::AlreadyTracked { world: WorldId(1) });

        let mut other = MultiRegionTracker::new();
        assert!(other.add_region(&mut a, handle(1)).is_err());
    }

    #[rstest]
    fn border_of_dropped_tracker_can_be_adopted(recorded: (MultiRegionTracker, Log)) {
        let (mut adopter, log) = recorded;
        let mut a = border(1);
        a.lerp_size_between(100.0, 90.0, 50).expect("valid lerp");
        let mut first = MultiRegionTracker::new();
        first.add_region(&mut a, handle(1)).expect("first add");
        assert!(a.is_tracked());
        drop(first);
        assert!(!a.is_tracked());

        adopter.add_region(&mut a, handle(1)).expect("adopt orphan");
        assert!(a.is_tracked());
        step(&mut [&mut a], &mut adopter);
        assert_eq!(
            log.borrow().first(),
            Some(&TrackerEvent::RegionComplete(handle(1)))
        );
        assert_eq!(all_complete_count(&log), 1);
    }

    #[rstest]
    fn barrier_fires_once_when_last_region_settles(recorded: (MultiRegionTracker, Log)) {
        let (mut tracker, log) = recorded;
        let mut a = border(1);
        let mut b = border(2);
        a.lerp_size_between(100.0, 50.0, 100).expect("valid lerp");
        b.lerp_size_between(100.0, 60.0, 200).expect("valid lerp");
        tracker.add_region(&mut a, handle(1)).expect("add a");
        tracker.add_region(&mut b, handle(2)).expect("add b");

        for _ in 0..2 {
            step(&mut [&mut a, &mut b], &mut tracker);
        }
        assert_eq!(log.borrow().as_slice(), &[TrackerEvent::RegionComplete(handle(1))]);

        for _ in 0..10 {
            step(&mut [&mut a, &mut b], &mut tracker);
        }
        assert_eq!(all_complete_count(&log), 1);
        let events = log.borrow();
        let Some(TrackerEvent::AllComplete(set)) = events.last() else {
            panic!("expected AllComplete last, got {events:?}");
        };
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&WorldId(2)), Some(&handle(2)));
    }

    #[rstest]
    fn restart_before_barrier_reactivates(recorded: (MultiRegionTracker, Log)) {
        let (mut tracker, log) = recorded;
        let mut a = border(1);
        let mut b = border(2);
        a.lerp_size_between(100.0, 90.0, 50).expect("valid lerp");
        b.lerp_size_between(100.0, 90.0, 150).expect("valid lerp");
        tracker.add_region(&mut a, handle(1)).expect("add a");
        tracker.add_region(&mut b, handle(2)).expect("add b");

        step(&mut [&mut a, &mut b], &mut tracker);
        assert!(tracker.is_completed(WorldId(1)));

        a.lerp_size_between(90.0, 80.0, 100).expect("valid lerp");
        tracker.process();
        assert!(!tracker.is_completed(WorldId(1)));
        assert_eq!(
            log.borrow().last(),
            Some(&TrackerEvent::RegionActive(handle(1)))
        );

        for _ in 0..3 {
            step(&mut [&mut a, &mut b], &mut tracker);
        }
        assert_eq!(all_complete_count(&log), 1);
    }

    #[rstest]
    fn removal_never_fires_barrier(recorded: (MultiRegionTracker, Log)) {
        let (mut tracker, log) = recorded;
        let mut a = border(1);
        let mut b = border(2);
        b.lerp_size_between(100.0, 50.0, 1_000).expect("valid lerp");
        tracker.add_region(&mut a, handle(1)).expect("add a");
        tracker.add_region(&mut b, handle(2)).expect("add b");

        assert_eq!(tracker.remove_region(&mut b), Some(handle(2)));
        assert!(!b.is_tracked());
        tracker.process();
        assert!(log.borrow().is_empty());
        assert_eq!(tracker.remove_region(&mut b), None);
    }

    #[rstest]
    fn foreign_border_is_not_removed(recorded: (MultiRegionTracker, Log)) {
        let (mut tracker, _) = recorded;
        let mut other = MultiRegionTracker::new();
        let mut a = border(1);
        other.add_region(&mut a, handle(1)).expect("add to other");
        assert_eq!(tracker.remove_region(&mut a), None);
        assert!(a.is_tracked());
    }

    #[rstest]
    fn listener_restart_is_handled_in_same_process_call() {
        let a = Rc::new(RefCell::new(border(1)));
        let log: Log = Rc::default();
        let mut tracker = MultiRegionTracker::new();
        a.borrow_mut()
            .lerp_size_between(100.0, 90.0, 50)
            .expect("valid lerp");
        tracker
            .add_region(&mut *a.borrow_mut(), handle(1))
            .expect("add a");

        let restart = Rc::clone(&a);
        let sink = Rc::clone(&log);
        let mut restarted = false;
        tracker.register_listener(Box::new(move |event: &TrackerEvent| {
            sink.borrow_mut().push(event.clone());
            if matches!(event, TrackerEvent::AllComplete(_)) && !restarted {
                restarted = true;
                restart
                    .borrow_mut()
                    .lerp_size_between(90.0, 80.0, 50)
                    .expect("valid lerp");
            }
        }));

        // The guard must be released before dispatch reaches the listener.
        a.borrow_mut().tick(&Vec::<Occupant>::new(), &mut Vec::<DamageReport>::new());
        tracker.process();
        assert_eq!(
            log.borrow().as_slice(),
            &[
                TrackerEvent::RegionComplete(handle(1)),
                TrackerEvent::AllComplete([(WorldId(1), handle(1))].into_iter().collect()),
                TrackerEvent::RegionActive(handle(1)),
            ]
        );
        assert_eq!(tracker.pending_reports(), 0);
        assert!(!tracker.is_completed(WorldId(1)));
    }

    #[rstest]
    fn unregistered_reports_are_ignored(recorded: (MultiRegionTracker, Log)) {
        let (mut tracker, log) = recorded;
        TrackerLink::new(&tracker.inbox).report(TransitionReport {
            world: WorldId(9),
            change: MotionChange::BecameStationary,
        });
        tracker.process();
        assert!(log.borrow().is_empty());
        assert_eq!(tracker.completed_count(), 0);
    }

    #[rstest]
    fn stale_completion_is_rechecked_against_live_motion() {
        let mut tracker = MultiRegionTracker::new();
        let mut listener = MockTrackerListener::new();
        listener
            .expect_on_event()
            .withf(|e| matches!(e, TrackerEvent::RegionComplete(_)))
            .times(1)
            .return_const(());
        listener
            .expect_on_event()
            .withf(|e| matches!(e, TrackerEvent::RegionActive(_)))
            .times(1)
            .return_const(());
        listener
            .expect_on_event()
            .withf(|e| matches!(e, TrackerEvent::AllComplete(_)))
            .never();
        tracker.register_listener(Box::new(listener));

        let mut a = border(1);
        a.lerp_size_between(100.0, 50.0, 1_000).expect("valid lerp");
        tracker.add_region(&mut a, handle(1)).expect("add a");
        // A stale stationary report arriving while the flag says moving.
        TrackerLink::new(&tracker.inbox).report(TransitionReport {
            world: WorldId(1),
            change: MotionChange::BecameStationary,
        });
        tracker.process();
        assert!(!tracker.is_completed(WorldId(1)));
    }
}
