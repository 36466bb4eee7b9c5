//! Entity identification.
//!
//! Every live world object (player, enemy, coin, door) is addressed by an
//! [`EntityId`] issued by the host world. The engine never allocates entity
//! IDs itself; it only carries them between predicates, effects, and the
//! delayed-action queue.
//!
//! ## Lifetime
//!
//! An `EntityId` captured by a delayed action may refer to an entity that no
//! longer exists when the action fires. Every effect that resolves an id must
//! tolerate a missing entity.
//!
//! ```
//! use rust_eca::core::EntityId;
//!
//! let coin = EntityId::new(7);
//! assert_eq!(coin.raw(), 7);
//! assert_eq!(coin.to_string(), "Entity(7)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a world entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The next ID in sequence.
    ///
    /// Used by worlds that allocate IDs monotonically.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_and_from() {
        let id = EntityId::from(12);
        assert_eq!(id, EntityId::new(12));
        assert_eq!(id.raw(), 12);
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(EntityId::default(), EntityId(0));
    }

    #[test]
    fn test_next() {
        assert_eq!(EntityId(3).next(), EntityId(4));
        assert_eq!(EntityId(u32::MAX).next(), EntityId(0));
    }

    #[test]
    fn test_ordering() {
        let mut ids = vec![EntityId(9), EntityId(1), EntityId(5)];
        ids.sort();
        assert_eq!(ids, vec![EntityId(1), EntityId(5), EntityId(9)]);
    }

    #[test]
    fn test_display_in_logs() {
        let coin = EntityId::new(42);
        assert_eq!(format!("destroyed {coin}"), "destroyed Entity(42)");
    }

    #[test]
    fn test_serializes_as_bare_number() {
        // Rule JSON references entities as `{"entity": 17}`.
        assert_eq!(serde_json::to_string(&EntityId(17)).unwrap(), "17");
        let parsed: EntityId = serde_json::from_str("17").unwrap();
        assert_eq!(parsed, EntityId(17));
    }
}
