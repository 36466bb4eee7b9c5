//! Delayed-action queue.
//!
//! A plain poll-on-tick queue: the evaluator pushes entries as delayed
//! actions are dispatched and, once per tick, takes every entry whose
//! deadline has passed. Entries leave the queue exactly once and are never
//! re-queued.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::context::ContextSnapshot;
use crate::core::Timestamp;
use crate::model::Action;

/// An action waiting for its deadline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action: Action,
    pub snapshot: ContextSnapshot,
    pub due_at: Timestamp,
}

impl PendingAction {
    /// Check if the action may fire at `now`.
    #[must_use]
    pub fn is_due(&self, now: Timestamp) -> bool {
        now >= self.due_at
    }
}

/// Batch of due actions. Most ticks fire none or a handful.
pub type DueBatch = SmallVec<[PendingAction; 4]>;

/// Insertion-ordered queue of pending actions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DelayedQueue {
    pending: Vec<PendingAction>,
}

impl DelayedQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an action.
    pub fn schedule(&mut self, action: Action, snapshot: ContextSnapshot, due_at: Timestamp) {
        self.pending.push(PendingAction {
            action,
            snapshot,
            due_at,
        });
    }

    /// Remove and return every entry due at `now`, in insertion order.
    /// Entries not yet due stay queued in their original order.
    pub fn take_due(&mut self, now: Timestamp) -> DueBatch {
        if !self.pending.iter().any(|p| p.is_due(now)) {
            return DueBatch::new();
        }

        let mut due = DueBatch::new();
        let mut waiting = Vec::with_capacity(self.pending.len());
        for entry in self.pending.drain(..) {
            if entry.is_due(now) {
                due.push(entry);
            } else {
                waiting.push(entry);
            }
        }
        self.pending = waiting;
        due
    }

    /// Earliest deadline among queued entries.
    #[must_use]
    pub fn next_due(&self) -> Option<Timestamp> {
        self.pending.iter().map(|p| p.due_at).min()
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every queued entry.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Queued entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingAction> {
        self.pending.iter()
    }
}
