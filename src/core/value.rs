//! Parameter values for rule records.
//!
//! Rule data is host-authored and opcode-specific, so parameters are a loose
//! bag of small tagged values keyed by name. Each descriptor documents the
//! shape it expects and falls back to its declared defaults when a value is
//! missing or has the wrong type.
//!
//! ## ParamValue Types
//!
//! - `Number`: positions, amounts, durations (always `f64`)
//! - `Text`: object kinds, variable names, keys, colors
//! - `Bool`: flags (loop, visible)
//! - `Reference`: a specific world entity
//!
//! In serialized rule sets values are untagged: `10`, `"coin"`, `true`,
//! `{"entity": 3}`. Params whose value is `null` are dropped on load.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::entity::EntityId;
use super::error::BehaviorError;

/// A single parameter value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// Reference to a world entity.
    Reference {
        /// The referenced entity.
        entity: EntityId,
    },
}

impl ParamValue {
    /// Create an entity reference.
    #[must_use]
    pub const fn reference(entity: EntityId) -> Self {
        ParamValue::Reference { entity }
    }

    /// Numeric view: numbers, and text that parses as a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            ParamValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean view: bools, numbers (non-zero is true), and `"true"`/`"false"`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            ParamValue::Number(v) => Some(*v != 0.0 && !v.is_nan()),
            ParamValue::Text(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            ParamValue::Reference { .. } => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Entity view: references, and non-negative integral numbers.
    #[must_use]
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            ParamValue::Reference { entity } => Some(*entity),
            ParamValue::Number(v) if *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64 => {
                Some(EntityId(*v as u32))
            }
            _ => None,
        }
    }

    /// Loose truthiness used by boolean variable checks.
    ///
    /// Zero, NaN and empty text are false; every reference is true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            ParamValue::Bool(v) => *v,
            ParamValue::Number(v) => *v != 0.0 && !v.is_nan(),
            ParamValue::Text(s) => !s.is_empty(),
            ParamValue::Reference { .. } => true,
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        ParamValue::Number(0.0)
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Reference { entity } => write!(f, "{entity}"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Number(f64::from(v))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<EntityId> for ParamValue {
    fn from(entity: EntityId) -> Self {
        ParamValue::Reference { entity }
    }
}

/// Named parameters of one condition or action.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(FxHashMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Insert or overwrite a parameter, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Remove a parameter.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.0.remove(name)
    }

    /// Get a raw value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Check whether a parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Numeric parameter, if present and numeric.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_number)
    }

    /// Numeric parameter or `default`.
    #[must_use]
    pub fn number_or(&self, name: &str, default: f64) -> f64 {
        self.number(name).unwrap_or(default)
    }

    /// Text parameter, if present and textual.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_text)
    }

    /// Text parameter or `default`.
    #[must_use]
    pub fn text_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.text(name).unwrap_or(default)
    }

    /// Boolean parameter or `default`.
    #[must_use]
    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.get(name).and_then(ParamValue::as_bool).unwrap_or(default)
    }

    /// Entity parameter, if present.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<EntityId> {
        self.get(name).and_then(ParamValue::as_entity)
    }

    /// Required numeric parameter.
    pub fn require_number(&self, name: &str) -> Result<f64, BehaviorError> {
        match self.get(name) {
            None => Err(BehaviorError::MissingParam(name.to_string())),
            Some(value) => value.as_number().ok_or_else(|| BehaviorError::InvalidParam {
                name: name.to_string(),
                reason: format!("expected a number, got {value}"),
            }),
        }
    }

    /// Required text parameter.
    pub fn require_text(&self, name: &str) -> Result<&str, BehaviorError> {
        match self.get(name) {
            None => Err(BehaviorError::MissingParam(name.to_string())),
            Some(value) => value.as_text().ok_or_else(|| BehaviorError::InvalidParam {
                name: name.to_string(),
                reason: format!("expected text, got {value}"),
            }),
        }
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = FxHashMap::<String, Option<ParamValue>>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v)))
                .collect(),
        ))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_views() {
        assert_eq!(ParamValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(ParamValue::from("10").as_number(), Some(10.0));
        assert_eq!(ParamValue::from("ten").as_number(), None);
        assert_eq!(ParamValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_bool_views() {
        assert_eq!(ParamValue::Bool(false).as_bool(), Some(false));
        assert_eq!(ParamValue::Number(3.0).as_bool(), Some(true));
        assert_eq!(ParamValue::Number(0.0).as_bool(), Some(false));
        assert_eq!(ParamValue::from("true").as_bool(), Some(true));
        assert_eq!(ParamValue::from("yes").as_bool(), None);
    }

    #[test]
    fn test_entity_views() {
        assert_eq!(ParamValue::reference(EntityId(4)).as_entity(), Some(EntityId(4)));
        assert_eq!(ParamValue::Number(4.0).as_entity(), Some(EntityId(4)));
        assert_eq!(ParamValue::Number(4.5).as_entity(), None);
        assert_eq!(ParamValue::Number(-1.0).as_entity(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(ParamValue::Number(1.0).is_truthy());
        assert!(!ParamValue::Number(0.0).is_truthy());
        assert!(!ParamValue::Number(f64::NAN).is_truthy());
        assert!(!ParamValue::from("").is_truthy());
        assert!(ParamValue::from("x").is_truthy());
    }

    #[test]
    fn test_params_defaults() {
        let params = Params::new().with("x", 3.0).with("label", "hi").with("loop", false);

        assert_eq!(params.number_or("x", 0.0), 3.0);
        assert_eq!(params.number_or("y", 7.0), 7.0);
        assert_eq!(params.text_or("label", "none"), "hi");
        assert_eq!(params.text_or("missing", "none"), "none");
        assert!(!params.bool_or("loop", true));
        assert!(params.bool_or("missing", true));
    }

    #[test]
    fn test_require() {
        let params = Params::new().with("value", "oops");

        assert!(matches!(
            params.require_number("missing"),
            Err(BehaviorError::MissingParam(name)) if name == "missing"
        ));
        assert!(matches!(
            params.require_number("value"),
            Err(BehaviorError::InvalidParam { .. })
        ));
        assert_eq!(params.require_text("value").unwrap(), "oops");
    }

    #[test]
    fn test_untagged_deserialization() {
        let params: Params = serde_json::from_str(
            r#"{"score": 10, "name": "coin", "loop": true, "target": {"entity": 3}, "gone": null}"#,
        )
        .unwrap();

        assert_eq!(params.number("score"), Some(10.0));
        assert_eq!(params.text("name"), Some("coin"));
        assert!(params.bool_or("loop", false));
        assert_eq!(params.entity("target"), Some(EntityId(3)));
        assert!(!params.contains("gone"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_from_iterator() {
        let params: Params = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(params.number("b"), Some(2.0));
    }
}
