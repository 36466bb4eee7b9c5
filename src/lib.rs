//! # rust-eca
//!
//! A deterministic event-condition-action rule engine for data-driven
//! gameplay logic.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven**: Rules are plain data (events holding conditions,
//!    actions and sub-events) authored in an editor and loaded from JSON.
//!
//! 2. **Open Vocabulary**: Conditions and actions name their behavior by
//!    opcode. Hosts register new opcodes next to the built-in catalog.
//!
//! 3. **Fault Isolation**: A missing opcode, a failing behavior or a panic
//!    affects one condition or action, never the tick.
//!
//! 4. **Deterministic**: Chance predicates draw from a seeded RNG keyed by
//!    tick, so a replay with the same seed and inputs takes the same branches.
//!
//! ## Architecture
//!
//! Each tick the host calls [`EventEvaluator::process_events`] with its event
//! list, its [`GameWorld`] and the current time. Events run in priority order;
//! delayed actions are queued with a snapshot of their bindings and fire on a
//! later tick.
//!
//! ## Modules
//!
//! - `core`: IDs, time, parameter values, configuration, RNG, errors
//! - `model`: conditions, actions, events and rule sets
//! - `registry`: opcode descriptors and the condition/action registries
//! - `context`: the host world boundary and the per-rule context
//! - `builtins`: the built-in condition and action catalog
//! - `evaluator`: the tick loop and the delayed-action queue
//! - `host`: an in-memory reference world
//!
//! ```
//! use rust_eca::{Action, Condition, Event, EventEvaluator, GameWorld, SceneState, Timestamp};
//!
//! let mut events = vec![Event::new("Start")
//!     .with_condition(Condition::new("always"))
//!     .with_action(Action::new("addToVariable").with_param("variable", "score").with_param("value", 10))];
//!
//! let mut world = SceneState::new();
//! let mut evaluator = EventEvaluator::with_builtins();
//! evaluator.process_events(&mut events, &mut world, Timestamp::ZERO);
//!
//! assert_eq!(world.variable("score").and_then(|v| v.as_number()), Some(10.0));
//! ```

pub mod core;
pub mod model;
pub mod registry;
pub mod context;
pub mod builtins;
pub mod evaluator;
pub mod host;

// Re-export commonly used types
pub use crate::core::{
    BehaviorError, BehaviorResult, EngineConfig, EntityId, OpcodeKind, ParamValue, Params,
    RuleError, RuleId, RuleRng, Timestamp,
};

pub use crate::model::{Action, Condition, Event, RuleSet, UnresolvedOpcode};

pub use crate::registry::{
    ActionDescriptor, ActionRegistry, ConditionDescriptor, ConditionRegistry, DescriptorInfo,
    Effect, ParamKind, ParamSpec, Predicate, Registries,
};

pub use crate::context::{
    CollisionPair, ContextSnapshot, EntityView, GameWorld, MouseButton, RuleContext, Vec2,
};

pub use crate::evaluator::{DelayedQueue, EventEvaluator, TickReport};

pub use crate::host::{PortCall, SceneState};
