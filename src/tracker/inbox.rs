//! Buffered motion transitions awaiting tracker dispatch.
//!
//! Borders push into a shared inbox through a weak [`TrackerLink`]; the
//! tracker drains it in batches. A border reporting from inside a tracker
//! listener therefore only queues its report, and the tracker flushes it once
//! the current dispatch finishes.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::world_handle::WorldId;

/// Stationary/moving flip observed on a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionChange {
    /// The border started a size or center transition.
    BecameActive,
    /// The last running transition finished or was cancelled.
    BecameStationary,
}

/// Transition reported by one border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionReport {
    /// World whose border flipped.
    pub world: WorldId,
    /// Direction of the flip.
    pub change: MotionChange,
}

/// FIFO of reports not yet dispatched by the tracker.
#[derive(Debug, Default)]
pub struct TransitionInbox {
    reports: VecDeque<TransitionReport>,
}

impl TransitionInbox {
    /// Appends `report` behind everything already queued.
    pub fn push(&mut self, report: TransitionReport) {
        self.reports.push_back(report);
    }

    /// Removes and yields every queued report in arrival order.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, TransitionReport> {
        self.reports.drain(..)
    }

    /// Returns `true` when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Number of queued reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }
}

/// Weak back-reference from a border to the tracker supervising it.
///
/// The link never keeps the tracker alive; reports sent after the tracker is
/// dropped are discarded.
#[derive(Debug, Clone)]
pub struct TrackerLink {
    inbox: Weak<RefCell<TransitionInbox>>,
}

impl TrackerLink {
    pub(crate) fn new(inbox: &Rc<RefCell<TransitionInbox>>) -> Self {
        Self {
            inbox: Rc::downgrade(inbox),
        }
    }

    /// Queues `report`. Returns `false` when the tracker no longer exists.
    pub(crate) fn report(&self, report: TransitionReport) -> bool {
        self.inbox.upgrade().is_some_and(|inbox| {
            inbox.borrow_mut().push(report);
            true
        })
    }

    /// Returns `true` while the tracker behind the link still exists.
    pub(crate) fn is_alive(&self) -> bool {
        self.inbox.strong_count() > 0
    }

    pub(crate) fn points_to(&self, inbox: &Rc<RefCell<TransitionInbox>>) -> bool {
        std::ptr::eq(self.inbox.as_ptr(), Rc::as_ptr(inbox))
    }
}

/// Live view of a border's motion shared with its tracker.
///
/// The border writes it on every mutation and tick; the tracker reads it to
/// re-verify stationarity before firing the barrier.
#[derive(Debug, Clone, Default)]
pub struct MotionFlag(Rc<Cell<bool>>);

impl MotionFlag {
    /// Last motion state written by the border.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn set(&self, moving: bool) {
        self.0.set(moving);
    }
}
