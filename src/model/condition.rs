//! Conditions: single logical tests.
//!
//! A condition names a predicate opcode, carries its parameters, and may be
//! inverted (logical NOT). An event's conditions are ANDed together.

use serde::{Deserialize, Serialize};

use crate::core::{ParamValue, Params, RuleId};

/// Opcode used when a serialized condition omits `type`.
pub const DEFAULT_CONDITION_OPCODE: &str = "always";

fn generated_id() -> RuleId {
    RuleId::generate("cond")
}

fn default_opcode() -> String {
    DEFAULT_CONDITION_OPCODE.to_string()
}

/// A single test in an event's condition list.
///
/// An unregistered opcode evaluates to false (so an inverted unknown opcode
/// evaluates to true).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Unique identifier.
    #[serde(default = "generated_id")]
    pub id: RuleId,

    /// Predicate opcode, resolved against the condition registry.
    #[serde(rename = "type", default = "default_opcode")]
    pub opcode: String,

    /// Opcode-specific parameters.
    #[serde(default)]
    pub params: Params,

    /// Negate the predicate's result.
    #[serde(default)]
    pub inverted: bool,
}

impl Condition {
    /// Create a condition with a generated ID.
    pub fn new(opcode: impl Into<String>) -> Self {
        Self {
            id: generated_id(),
            opcode: opcode.into(),
            params: Params::new(),
            inverted: false,
        }
    }

    /// Set the ID (builder pattern).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<RuleId>) -> Self {
        self.id = id.into();
        self
    }

    /// Add a parameter (builder pattern).
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Replace all parameters (builder pattern).
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Mark as inverted (builder pattern).
    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Flip the inversion flag in place.
    pub fn invert(&mut self) -> &mut Self {
        self.inverted = !self.inverted;
        self
    }

    /// Apply this condition's inversion to a raw predicate result.
    #[must_use]
    pub fn apply_inversion(&self, raw: bool) -> bool {
        raw != self.inverted
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::new(DEFAULT_CONDITION_OPCODE)
    }
}
