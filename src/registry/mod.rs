//! Opcode registries.
//!
//! Conditions and actions live in separate namespaces: the same opcode
//! string (`customScript`) may name both a condition and an action.
//!
//! ```
//! use rust_eca::registry::Registries;
//!
//! let registries = Registries::builtin();
//! assert!(registries.conditions.contains("collision"));
//! assert!(registries.actions.contains("addToVariable"));
//! ```

mod descriptor;
#[allow(clippy::module_inception)]
mod registry;

pub use descriptor::{
    ActionDescriptor, ConditionDescriptor, Descriptor, DescriptorInfo, Effect, ParamKind,
    ParamSpec, Predicate, VisibilityRule,
};
pub use registry::{ActionRegistry, ConditionRegistry, Registry};

use crate::builtins;

/// The condition and action registries an evaluator resolves opcodes against.
#[derive(Debug, Default)]
pub struct Registries {
    pub conditions: ConditionRegistry,
    pub actions: ActionRegistry,
}

impl Registries {
    /// Empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registries pre-populated with the standard opcode library.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registries = Self::new();
        builtins::install(&mut registries);
        registries
    }

    /// Look up a condition descriptor.
    #[must_use]
    pub fn condition(&self, opcode: &str) -> Option<&ConditionDescriptor> {
        self.conditions.get(opcode)
    }

    /// Look up an action descriptor.
    #[must_use]
    pub fn action(&self, opcode: &str) -> Option<&ActionDescriptor> {
        self.actions.get(opcode)
    }
}
