//! Error types.
//!
//! Two families:
//! - [`RuleError`]: setup-time failures (registration, configuration, rule-set
//!   decoding). Returned to the host.
//! - [`BehaviorError`]: what a condition or action behavior reports at
//!   evaluation time. Never propagated out of a tick; the evaluator logs it and
//!   treats the condition as false or the action as skipped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which registry an opcode belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpcodeKind {
    /// A condition (predicate) opcode.
    Condition,
    /// An action (effect) opcode.
    Action,
}

impl std::fmt::Display for OpcodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpcodeKind::Condition => f.write_str("condition"),
            OpcodeKind::Action => f.write_str("action"),
        }
    }
}

/// Setup-time errors.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("{kind} opcode {opcode:?} is already registered")]
    DuplicateOpcode { kind: OpcodeKind, opcode: String },
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
    #[error("rule set JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by descriptor behaviors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BehaviorError {
    #[error("missing parameter {0:?}")]
    MissingParam(String),
    #[error("invalid parameter {name:?}: {reason}")]
    InvalidParam { name: String, reason: String },
    #[error("host does not support {0}")]
    Unsupported(&'static str),
    #[error("script error: {0}")]
    Script(String),
    #[error("{0}")]
    Other(String),
}

/// Result of a predicate or effect behavior.
pub type BehaviorResult<T> = Result<T, BehaviorError>;
