//! Rule data: the records hosts author and the evaluator runs.
//!
//! - [`Condition`]: one opcode-named predicate, optionally inverted
//! - [`Action`]: one opcode-named effect, optionally delayed
//! - [`Event`]: conditions, actions and nested sub-events
//! - [`RuleSet`]: the serialized collection of events
//!
//! Serialized field names follow the editor format (`type`, `triggerOnce`,
//! `subEvents`). Missing fields take their defaults on load.

mod action;
mod condition;
mod event;
mod rule_set;

pub use action::{Action, DEFAULT_ACTION_OPCODE};
pub use condition::{Condition, DEFAULT_CONDITION_OPCODE};
pub use event::{Event, DEFAULT_EVENT_NAME};
pub use rule_set::{RuleSet, UnresolvedOpcode};
