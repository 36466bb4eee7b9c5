//! Core engine types: ids, time, parameter values, configuration, RNG, errors.
//!
//! This module contains the fundamental building blocks shared by the rule
//! model, the registries and the evaluator. None of it knows about any
//! particular game.

pub mod entity;
pub mod id;
pub mod time;
pub mod value;
pub mod config;
pub mod rng;
pub mod error;

pub use entity::EntityId;
pub use id::RuleId;
pub use time::Timestamp;
pub use value::{ParamValue, Params};
pub use config::{EngineConfig, DEFAULT_MAX_DEPTH};
pub use rng::RuleRng;
pub use error::{BehaviorError, BehaviorResult, OpcodeKind, RuleError};
