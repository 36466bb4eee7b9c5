//! Per-tick diagnostics.

use serde::{Deserialize, Serialize};

/// What one `process_events` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Events whose conditions were evaluated (sub-events included).
    pub events_evaluated: u32,

    /// Events whose conditions passed and whose actions were dispatched.
    pub events_fired: u32,

    /// Effects run synchronously during the event pass.
    pub actions_executed: u32,

    /// Actions placed on the delayed queue.
    pub actions_scheduled: u32,

    /// Delayed actions that fired during the drain.
    pub delayed_fired: u32,

    /// Condition or action opcodes with no registered descriptor.
    pub unknown_opcodes: u32,

    /// Behaviors that returned an error or panicked.
    pub behavior_failures: u32,

    /// Sub-event lists skipped for exceeding the nesting limit.
    pub depth_limited: u32,
}

impl TickReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add another report's counts to this one.
    pub fn absorb(&mut self, other: &TickReport) {
        self.events_evaluated += other.events_evaluated;
        self.events_fired += other.events_fired;
        self.actions_executed += other.actions_executed;
        self.actions_scheduled += other.actions_scheduled;
        self.delayed_fired += other.delayed_fired;
        self.unknown_opcodes += other.unknown_opcodes;
        self.behavior_failures += other.behavior_failures;
        self.depth_limited += other.depth_limited;
    }

    /// Check if anything went wrong this tick.
    #[must_use]
    pub fn has_problems(&self) -> bool {
        self.unknown_opcodes > 0 || self.behavior_failures > 0 || self.depth_limited > 0
    }

    /// Effects run this tick, immediate and delayed.
    #[must_use]
    pub fn effects_run(&self) -> u32 {
        self.actions_executed + self.delayed_fired
    }
}
