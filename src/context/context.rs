//! Per-evaluation context passed to every predicate and effect.
//!
//! A [`RuleContext`] bundles the host world with the bindings of the event
//! currently being processed: the tick clock, the event's identity, and the
//! collision slot that collision predicates fill for the event's actions.
//!
//! ## Snapshots
//!
//! Delayed actions outlive the tick that scheduled them, so they cannot hold
//! the context itself. At schedule time the evaluator takes a
//! [`ContextSnapshot`] of the bindings only; at fire time it rebuilds a
//! context around the *current* world with those bindings. Entities recorded
//! in the snapshot may have been destroyed in between.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

use crate::core::{RuleId, RuleRng, Timestamp};
use crate::model::Event;

use super::world::{CollisionPair, GameWorld};

/// Identity of the event whose rules are running.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBinding {
    pub id: RuleId,
    pub name: String,
}

impl EventBinding {
    /// Bind to an event.
    #[must_use]
    pub fn of(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
        }
    }
}

/// The top-level bindings of a context, captured when an action is delayed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub event: Option<EventBinding>,
    pub collision: Option<CollisionPair>,
    pub scheduled_at: Timestamp,
    pub scheduled_tick: u64,
}

/// Context for evaluating conditions and executing actions.
pub struct RuleContext<'w> {
    world: &'w mut dyn GameWorld,
    now: Timestamp,
    delta_ms: u64,
    tick: u64,
    seed: u64,
    event: Option<EventBinding>,
    collision: Cell<Option<CollisionPair>>,
    condition: RefCell<Option<RuleId>>,
    scheduled_at: Option<Timestamp>,
}

impl<'w> RuleContext<'w> {
    /// Create a context around a world at a point in time.
    pub fn new(world: &'w mut dyn GameWorld, now: Timestamp) -> Self {
        Self {
            world,
            now,
            delta_ms: 0,
            tick: 0,
            seed: 0,
            event: None,
            collision: Cell::new(None),
            condition: RefCell::new(None),
            scheduled_at: None,
        }
    }

    /// Set the tick counter and frame delta (builder pattern).
    #[must_use]
    pub fn with_tick(mut self, tick: u64, delta_ms: u64) -> Self {
        self.tick = tick;
        self.delta_ms = delta_ms;
        self
    }

    /// Set the roll seed (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Bind to an event (builder pattern).
    #[must_use]
    pub fn with_event(mut self, binding: EventBinding) -> Self {
        self.event = Some(binding);
        self
    }

    /// Rebuild a context for a delayed action from its snapshot.
    ///
    /// Clock values (`now`, `tick`, `delta_ms`) are those of the firing tick;
    /// event identity and collision pair are those of the scheduling tick.
    pub fn restore(
        world: &'w mut dyn GameWorld,
        now: Timestamp,
        tick: u64,
        delta_ms: u64,
        seed: u64,
        snapshot: &ContextSnapshot,
    ) -> Self {
        Self {
            world,
            now,
            delta_ms,
            tick,
            seed,
            event: snapshot.event.clone(),
            collision: Cell::new(snapshot.collision),
            condition: RefCell::new(None),
            scheduled_at: Some(snapshot.scheduled_at),
        }
    }

    /// A child context for one event: same world and clock, the event's
    /// binding, and an empty collision slot.
    pub fn scoped(&mut self, event: &Event) -> RuleContext<'_> {
        RuleContext {
            world: &mut *self.world,
            now: self.now,
            delta_ms: self.delta_ms,
            tick: self.tick,
            seed: self.seed,
            event: Some(EventBinding::of(event)),
            collision: Cell::new(None),
            condition: RefCell::new(None),
            scheduled_at: None,
        }
    }

    /// Capture the bindings a delayed action needs.
    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            event: self.event.clone(),
            collision: self.collision.get(),
            scheduled_at: self.now,
            scheduled_tick: self.tick,
        }
    }

    /// Read access to the world.
    #[must_use]
    pub fn world(&self) -> &dyn GameWorld {
        &*self.world
    }

    /// Write access to the world.
    pub fn world_mut(&mut self) -> &mut dyn GameWorld {
        &mut *self.world
    }

    /// Current tick time.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Milliseconds since the previous tick (0 on the first tick).
    #[must_use]
    pub fn delta_ms(&self) -> u64 {
        self.delta_ms
    }

    /// Number of the current tick, starting at 1 for the first
    /// `process_events` call.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// The event being processed, if any.
    #[must_use]
    pub fn event(&self) -> Option<&EventBinding> {
        self.event.as_ref()
    }

    /// When a delayed action was scheduled; `None` for immediate execution.
    #[must_use]
    pub fn scheduled_at(&self) -> Option<Timestamp> {
        self.scheduled_at
    }

    /// The collision pair recorded by this event's conditions.
    #[must_use]
    pub fn collision_pair(&self) -> Option<CollisionPair> {
        self.collision.get()
    }

    /// Record the collision pair a predicate matched.
    ///
    /// This is the one write a predicate may make; it only touches the
    /// event-local slot.
    pub fn record_collision(&self, pair: CollisionPair) {
        self.collision.set(Some(pair));
    }

    /// The condition currently being evaluated, if any.
    #[must_use]
    pub fn condition(&self) -> Option<RuleId> {
        self.condition.borrow().clone()
    }

    /// Bind the condition being evaluated. The evaluator sets this around
    /// each predicate call so chance rolls can key on it.
    pub fn bind_condition(&self, id: Option<RuleId>) {
        *self.condition.borrow_mut() = id;
    }

    /// Deterministic roll: true with `probability`, repeatable for the same
    /// seed, tick and key.
    #[must_use]
    pub fn roll(&self, key: &str, probability: f64) -> bool {
        RuleRng::for_roll(self.seed, self.tick, key).gen_bool(probability)
    }
}

impl std::fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleContext")
            .field("now", &self.now)
            .field("delta_ms", &self.delta_ms)
            .field("tick", &self.tick)
            .field("event", &self.event)
            .field("collision", &self.collision.get())
            .field("condition", &self.condition.borrow())
            .field("scheduled_at", &self.scheduled_at)
            .finish_non_exhaustive()
    }
}
