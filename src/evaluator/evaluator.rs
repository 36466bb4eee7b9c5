//! The event evaluator.
//!
//! Called once per host frame. Each call:
//!
//! 1. Visits the event list in priority order (lower first, ties in list
//!    order), skipping disabled and consumed trigger-once events.
//! 2. For each event whose conditions pass: dispatches its actions, consumes
//!    it if trigger-once, then recurses into its sub-events with a fresh
//!    priority ordering of that list.
//! 3. After the whole pass, fires every delayed action whose deadline has
//!    been reached, in the order they were scheduled.
//!
//! ## Failure Handling
//!
//! Nothing a rule does can abort a tick. An unknown opcode is logged and
//! treated as a false predicate or a no-op effect. A behavior that returns an
//! error or panics is logged and treated the same way; siblings keep running.
//! [`TickReport`] counts what happened.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, trace, warn};

use crate::context::{GameWorld, RuleContext};
use crate::core::{EngineConfig, RuleError, Timestamp};
use crate::model::{Action, Condition, Event};
use crate::registry::Registries;

use super::scheduler::{DelayedQueue, PendingAction};
use super::stats::TickReport;

/// Tick-driven evaluator for a rule set.
///
/// The evaluator owns the registries and the delayed-action queue. Event
/// lists belong to the host and are passed in on each tick; the only thing
/// the evaluator changes on them is the trigger-once flag.
#[derive(Debug)]
pub struct EventEvaluator {
    registries: Registries,
    config: EngineConfig,
    queue: DelayedQueue,
    tick: u64,
    last_now: Option<Timestamp>,
}

impl EventEvaluator {
    /// Create an evaluator over the given registries.
    pub fn new(registries: Registries, config: EngineConfig) -> Result<Self, RuleError> {
        config.validate()?;
        Ok(Self::build(registries, config))
    }

    /// Evaluator with the builtin opcode library and default configuration.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::build(Registries::builtin(), EngineConfig::default())
    }

    fn build(registries: Registries, config: EngineConfig) -> Self {
        Self {
            registries,
            config,
            queue: DelayedQueue::new(),
            tick: 0,
            last_now: None,
        }
    }

    /// Run one tick over `events`.
    pub fn process_events(
        &mut self,
        events: &mut [Event],
        world: &mut dyn GameWorld,
        now: Timestamp,
    ) -> TickReport {
        self.tick += 1;
        let delta_ms = self.last_now.map_or(0, |previous| now.since(previous));
        self.last_now = Some(now);

        let mut report = TickReport::new();
        {
            let mut ctx = RuleContext::new(&mut *world, now)
                .with_tick(self.tick, delta_ms)
                .with_seed(self.config.seed);
            self.process_list(events, &mut ctx, 1, &mut report);
        }
        self.drain_delayed(world, now, delta_ms, &mut report);

        trace!(
            tick = self.tick,
            fired = report.events_fired,
            pending = self.queue.len(),
            "tick complete"
        );
        report
    }

    /// Evaluate a condition list against a context.
    ///
    /// Empty lists pass. Otherwise every condition must pass after applying
    /// its inversion; evaluation stops at the first failure.
    pub fn evaluate_conditions(&self, conditions: &[Condition], ctx: &RuleContext<'_>) -> bool {
        self.check_conditions(conditions, ctx, &mut TickReport::new())
    }

    /// Dispatch an action list: immediate actions run now, delayed ones are
    /// queued with a snapshot of `ctx`.
    pub fn execute_actions(&mut self, actions: &[Action], ctx: &mut RuleContext<'_>) -> TickReport {
        let mut report = TickReport::new();
        self.dispatch_actions(actions, ctx, &mut report);
        report
    }

    /// Number of delayed actions waiting to fire.
    #[must_use]
    pub fn pending_action_count(&self) -> usize {
        self.queue.len()
    }

    /// Earliest deadline in the delayed queue.
    #[must_use]
    pub fn next_due(&self) -> Option<Timestamp> {
        self.queue.next_due()
    }

    /// Delayed actions waiting to fire, in scheduling order.
    pub fn pending_actions(&self) -> impl Iterator<Item = &PendingAction> {
        self.queue.iter()
    }

    /// Drop every pending delayed action. Event trigger state is untouched.
    pub fn reset(&mut self) {
        self.queue.clear();
    }

    /// Clear the trigger-once state of every event in the tree.
    pub fn reset_events(events: &mut [Event]) {
        for event in events {
            event.reset();
        }
    }

    /// The opcode registries.
    #[must_use]
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Mutable access to the registries, for registering host opcodes.
    pub fn registries_mut(&mut self) -> &mut Registries {
        &mut self.registries
    }

    /// The evaluator configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of `process_events` calls so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    // === Event pass ===

    fn process_list(
        &mut self,
        events: &mut [Event],
        ctx: &mut RuleContext<'_>,
        depth: usize,
        report: &mut TickReport,
    ) {
        // Stable sort: equal priorities keep list order.
        let mut order: Vec<usize> = (0..events.len()).collect();
        order.sort_by_key(|&index| events[index].priority);

        for index in order {
            let event = &mut events[index];
            if !event.should_execute() {
                continue;
            }
            report.events_evaluated += 1;

            let mut scoped = ctx.scoped(event);
            if !self.check_conditions(&event.conditions, &scoped, report) {
                continue;
            }

            debug!(event = %event.name, id = %event.id, tick = scoped.tick(), "event triggered");
            report.events_fired += 1;
            self.dispatch_actions(&event.actions, &mut scoped, report);
            event.mark_triggered();

            if event.sub_events.is_empty() {
                continue;
            }
            if depth >= self.config.max_depth {
                warn!(
                    event = %event.name,
                    id = %event.id,
                    max_depth = self.config.max_depth,
                    "sub-events nested too deeply, skipped"
                );
                report.depth_limited += 1;
                continue;
            }
            self.process_list(&mut event.sub_events, &mut scoped, depth + 1, report);
        }
    }

    // === Conditions ===

    fn check_conditions(
        &self,
        conditions: &[Condition],
        ctx: &RuleContext<'_>,
        report: &mut TickReport,
    ) -> bool {
        conditions
            .iter()
            .all(|condition| self.check_condition(condition, ctx, report))
    }

    fn check_condition(&self, condition: &Condition, ctx: &RuleContext<'_>, report: &mut TickReport) -> bool {
        let raw = match self.registries.condition(&condition.opcode) {
            None => {
                warn!(opcode = %condition.opcode, condition = %condition.id, "unknown condition opcode");
                report.unknown_opcodes += 1;
                false
            }
            Some(descriptor) => {
                ctx.bind_condition(Some(condition.id.clone()));
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| descriptor.test(&condition.params, ctx)));
                ctx.bind_condition(None);
                match outcome {
                    Ok(Ok(result)) => {
                        trace!(opcode = %condition.opcode, condition = %condition.id, result, "condition evaluated");
                        result
                    }
                    Ok(Err(err)) => {
                        warn!(opcode = %condition.opcode, condition = %condition.id, error = %err, "condition failed");
                        report.behavior_failures += 1;
                        false
                    }
                    Err(payload) => {
                        error!(
                            opcode = %condition.opcode,
                            condition = %condition.id,
                            panic = panic_message(payload.as_ref()),
                            "condition panicked"
                        );
                        report.behavior_failures += 1;
                        false
                    }
                }
            }
        };
        condition.apply_inversion(raw)
    }

    // === Actions ===

    fn dispatch_actions(&mut self, actions: &[Action], ctx: &mut RuleContext<'_>, report: &mut TickReport) {
        for action in actions {
            if action.is_delayed() {
                let due_at = ctx.now().after(action.delay);
                debug!(opcode = %action.opcode, action = %action.id, due_at = %due_at, "action scheduled");
                self.queue.schedule(action.clone(), ctx.snapshot(), due_at);
                report.actions_scheduled += 1;
            } else if self.run_action(action, ctx, report) {
                report.actions_executed += 1;
            }
        }
    }

    /// Run one effect. Returns true if it completed without error.
    fn run_action(&self, action: &Action, ctx: &mut RuleContext<'_>, report: &mut TickReport) -> bool {
        let Some(descriptor) = self.registries.action(&action.opcode) else {
            warn!(opcode = %action.opcode, action = %action.id, "unknown action opcode");
            report.unknown_opcodes += 1;
            return false;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| descriptor.apply(&action.params, ctx))) {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                warn!(opcode = %action.opcode, action = %action.id, error = %err, "action failed");
                report.behavior_failures += 1;
                false
            }
            Err(payload) => {
                error!(
                    opcode = %action.opcode,
                    action = %action.id,
                    panic = panic_message(payload.as_ref()),
                    "action panicked"
                );
                report.behavior_failures += 1;
                false
            }
        }
    }

    // === Delayed queue ===

    fn drain_delayed(
        &mut self,
        world: &mut dyn GameWorld,
        now: Timestamp,
        delta_ms: u64,
        report: &mut TickReport,
    ) {
        for pending in self.queue.take_due(now) {
            let mut ctx = RuleContext::restore(
                &mut *world,
                now,
                self.tick,
                delta_ms,
                self.config.seed,
                &pending.snapshot,
            );
            debug!(
                opcode = %pending.action.opcode,
                action = %pending.action.id,
                due_at = %pending.due_at,
                late_ms = now.since(pending.due_at),
                "delayed action fired"
            );
            if self.run_action(&pending.action, &mut ctx, report) {
                report.delayed_fired += 1;
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
