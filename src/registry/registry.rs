//! Opcode registry.
//!
//! Maps opcode strings to descriptors. Lookups are hash-based; listings keep
//! registration order so editors show opcodes in the order they were added.

use rustc_hash::FxHashMap;

use crate::core::RuleError;

use super::descriptor::{ActionDescriptor, ConditionDescriptor, Descriptor};

/// Registry of one descriptor kind.
pub struct Registry<D> {
    entries: FxHashMap<String, D>,
    order: Vec<String>,
}

/// Registry of condition opcodes.
pub type ConditionRegistry = Registry<ConditionDescriptor>;

/// Registry of action opcodes.
pub type ActionRegistry = Registry<ActionDescriptor>;

impl<D: Descriptor> Registry<D> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Register a new opcode.
    ///
    /// Fails with [`RuleError::DuplicateOpcode`] if the opcode is taken; use
    /// [`replace`](Self::replace) to override an existing descriptor.
    pub fn register(&mut self, opcode: impl Into<String>, descriptor: D) -> Result<(), RuleError> {
        let opcode = opcode.into();
        if self.entries.contains_key(&opcode) {
            return Err(RuleError::DuplicateOpcode {
                kind: D::KIND,
                opcode,
            });
        }
        self.order.push(opcode.clone());
        self.entries.insert(opcode, descriptor);
        Ok(())
    }

    /// Register or override an opcode. Last registration wins; an overridden
    /// opcode keeps its original listing position.
    pub fn replace(&mut self, opcode: impl Into<String>, descriptor: D) -> Option<D> {
        let opcode = opcode.into();
        if !self.entries.contains_key(&opcode) {
            self.order.push(opcode.clone());
        }
        self.entries.insert(opcode, descriptor)
    }

    /// Remove an opcode.
    pub fn unregister(&mut self, opcode: &str) -> Option<D> {
        let removed = self.entries.remove(opcode)?;
        self.order.retain(|op| op != opcode);
        Some(removed)
    }

    /// Look up a descriptor.
    #[must_use]
    pub fn get(&self, opcode: &str) -> Option<&D> {
        self.entries.get(opcode)
    }

    /// Check if an opcode is registered.
    #[must_use]
    pub fn contains(&self, opcode: &str) -> bool {
        self.entries.contains_key(opcode)
    }

    /// Number of registered opcodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Opcodes in registration order.
    pub fn opcodes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(opcode, descriptor)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &D)> {
        self.order
            .iter()
            .filter_map(|op| self.entries.get(op).map(|d| (op.as_str(), d)))
    }

    /// Distinct categories, in order of first registration.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for (_, descriptor) in self.iter() {
            let category = descriptor.category();
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Entries grouped by category, for editor menus.
    ///
    /// Categories appear in order of first registration and entries within
    /// a category keep registration order.
    #[must_use]
    pub fn by_category(&self) -> Vec<(&str, Vec<(&str, &D)>)> {
        let mut groups: Vec<(&str, Vec<(&str, &D)>)> = Vec::new();
        for (opcode, descriptor) in self.iter() {
            let category = descriptor.category();
            match groups.iter_mut().find(|(name, _)| *name == category) {
                Some((_, entries)) => entries.push((opcode, descriptor)),
                None => groups.push((category, vec![(opcode, descriptor)])),
            }
        }
        groups
    }
}

impl<D: Descriptor> Default for Registry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Descriptor> std::fmt::Debug for Registry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &D::KIND)
            .field("opcodes", &self.order)
            .finish()
    }
}
