//! Utility helpers for tests.
//!
//! Recording listeners share their logs through `Rc<RefCell<_>>` so a test
//! can keep a handle after boxing the listener into a border or tracker.

pub mod builders;

use std::cell::RefCell;
use std::rc::Rc;

use lisiere::border::{AnnounceReason, BorderChange, ChangeListener};
use lisiere::tracker::{TrackerEvent, TrackerListener};
use lisiere::WorldId;

/// Records every border change with the world that raised it.
#[derive(Clone, Default)]
pub struct RecordingChangeListener {
    log: Rc<RefCell<Vec<(WorldId, BorderChange)>>>,
}

impl RecordingChangeListener {
    /// Create a listener and a second handle onto the same log.
    ///
    /// # Examples
    /// ```
    /// use test_utils::RecordingChangeListener;
    /// let (listener, log) = RecordingChangeListener::pair();
    /// assert!(log.changes().is_empty());
    /// drop(listener);
    /// ```
    pub fn pair() -> (Box<dyn ChangeListener>, Self) {
        let recorder = Self::default();
        (Box::new(recorder.clone()), recorder)
    }

    /// Every change recorded so far, oldest first.
    pub fn changes(&self) -> Vec<(WorldId, BorderChange)> {
        self.log.borrow().clone()
    }

    /// Count of size announcements carrying `reason`.
    pub fn size_announcements(&self, reason: AnnounceReason) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|(_, change)| matches!(change, BorderChange::Size(a) if a.reason == reason))
            .count()
    }
}

impl ChangeListener for RecordingChangeListener {
    fn on_change(&mut self, world: WorldId, change: &BorderChange) {
        self.log.borrow_mut().push((world, *change));
    }
}

/// Records every tracker event.
#[derive(Clone, Default)]
pub struct RecordingTrackerListener {
    log: Rc<RefCell<Vec<TrackerEvent>>>,
}

impl RecordingTrackerListener {
    /// Create a listener and a second handle onto the same log.
    pub fn pair() -> (Box<dyn TrackerListener>, Self) {
        let recorder = Self::default();
        (Box::new(recorder.clone()), recorder)
    }

    /// Every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<TrackerEvent> {
        self.log.borrow().clone()
    }

    /// Number of [`TrackerEvent::AllComplete`] notifications so far.
    pub fn all_complete_count(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|event| matches!(event, TrackerEvent::AllComplete(_)))
            .count()
    }
}

impl TrackerListener for RecordingTrackerListener {
    fn on_event(&mut self, event: &TrackerEvent) {
        self.log.borrow_mut().push(event.clone());
    }
}
