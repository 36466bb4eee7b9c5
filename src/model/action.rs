//! Actions: effects to perform when an event fires.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::{ParamValue, Params, RuleId};

/// Opcode used when a serialized action omits `type`.
pub const DEFAULT_ACTION_OPCODE: &str = "doNothing";

fn generated_id() -> RuleId {
    RuleId::generate("action")
}

fn default_opcode() -> String {
    DEFAULT_ACTION_OPCODE.to_string()
}

/// Editor delays are plain JSON numbers and may be fractional, negative,
/// null or numeric strings. Anything not a positive number means no delay;
/// positive fractions round up so they stay deferred.
fn lenient_delay<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if ms.is_finite() && ms > 0.0 { ms.ceil() as u64 } else { 0 })
}

/// A single effect in an event's action list.
///
/// `delay == 0` runs the effect within the current tick. A positive delay
/// defers it to the first tick at or after `now + delay`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Unique identifier.
    #[serde(default = "generated_id")]
    pub id: RuleId,

    /// Effect opcode, resolved against the action registry.
    #[serde(rename = "type", default = "default_opcode")]
    pub opcode: String,

    /// Opcode-specific parameters.
    #[serde(default)]
    pub params: Params,

    /// Delay in milliseconds before the effect runs.
    #[serde(default, deserialize_with = "lenient_delay")]
    pub delay: u64,
}

impl Action {
    /// Create an immediate action with a generated ID.
    pub fn new(opcode: impl Into<String>) -> Self {
        Self {
            id: generated_id(),
            opcode: opcode.into(),
            params: Params::new(),
            delay: 0,
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

    /// Set the delay in milliseconds (builder pattern).
    #[must_use]
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay = delay_ms;
        self
    }

    /// Returns true if this action is deferred rather than run immediately.
    #[must_use]
    pub fn is_delayed(&self) -> bool {
        self.delay > 0
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::new(DEFAULT_ACTION_OPCODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let action = Action::new("addToVariable")
            .with_id("act-1")
            .with_param("variable", "score")
            .with_param("value", 10)
            .with_delay(250);

        assert_eq!(action.id.as_str(), "act-1");
        assert_eq!(action.params.number("value"), Some(10.0));
        assert_eq!(action.delay, 250);
        assert!(action.is_delayed());
    }

    #[test]
    fn test_immediate_by_default() {
        assert!(!Action::new("playSound").is_delayed());
    }

    #[test]
    fn test_missing_fields_default() {
        let action: Action = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        assert_eq!(action.opcode, DEFAULT_ACTION_OPCODE);
        assert_eq!(action.delay, 0);
    }

    #[test]
    fn test_lenient_delay() {
        let delay = |json: &str| serde_json::from_str::<Action>(json).unwrap().delay;

        assert_eq!(delay(r#"{"delay": 0.5}"#), 1);
        assert_eq!(delay(r#"{"delay": 250.2}"#), 251);
        assert_eq!(delay(r#"{"delay": null}"#), 0);
        assert_eq!(delay(r#"{"delay": -40}"#), 0);
        assert_eq!(delay(r#"{"delay": "300"}"#), 300);
        assert_eq!(delay(r#"{"delay": true}"#), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let action = Action::new("showText").with_id("a1").with_param("text", "Win").with_delay(500);
        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(json["type"], "showText");
        assert_eq!(json["delay"], 500);
        assert_eq!(json["params"]["text"], "Win");
    }
}
