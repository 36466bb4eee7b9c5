//! Opaque identifiers for rule records.
//!
//! Events, conditions, and actions are identified by strings so that rule
//! sets authored in an editor (`"event-1"`, `"cond_3"`) round-trip unchanged.
//! Identity is by id; behavior lookup is by opcode, never by id.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_GENERATED: AtomicU64 = AtomicU64::new(1);

/// Identifier of an [`Event`](crate::model::Event),
/// [`Condition`](crate::model::Condition) or [`Action`](crate::model::Action).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub String);

impl RuleId {
    /// Create an ID from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh process-local ID such as `event_17`.
    ///
    /// Generated IDs never repeat within one process.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        let n = NEXT_GENERATED.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}_{n}"))
    }

    /// Borrow the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if no ID was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RuleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RuleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = RuleId::generate("event");
        let b = RuleId::generate("event");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("event_"));
    }

    #[test]
    fn test_transparent_serialization() {
        let id = RuleId::from("cond-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"cond-1\"");
        let back: RuleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(RuleId::default().is_empty());
        assert!(!RuleId::from("x").is_empty());
    }
}
