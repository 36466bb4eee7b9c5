//! The standard opcode library.
//!
//! Conditions cover collisions, variables, input, object queries, time,
//! scenes, physics and animation; actions cover the matching effects.
//! Hosts either start from [`Registries::builtin`](crate::registry::Registries::builtin)
//! or register the builtins into their own registries alongside custom
//! opcodes.

mod actions;
mod compare;
mod conditions;

pub use actions::{ALL_OF_TYPE, COLLISION_OTHER, COLLISION_SELF};
pub use compare::Comparison;

use crate::core::RuleError;
use crate::registry::{ActionRegistry, ConditionRegistry, Registries};

/// Register every builtin condition.
///
/// Fails on the first opcode that is already taken.
pub fn register_builtin_conditions(registry: &mut ConditionRegistry) -> Result<(), RuleError> {
    for (opcode, descriptor) in conditions::descriptors() {
        registry.register(opcode, descriptor)?;
    }
    Ok(())
}

/// Register every builtin action.
///
/// Fails on the first opcode that is already taken.
pub fn register_builtin_actions(registry: &mut ActionRegistry) -> Result<(), RuleError> {
    for (opcode, descriptor) in actions::descriptors() {
        registry.register(opcode, descriptor)?;
    }
    Ok(())
}

/// Install the builtins, overriding anything registered under the same opcodes.
pub(crate) fn install(registries: &mut Registries) {
    for (opcode, descriptor) in conditions::descriptors() {
        registries.conditions.replace(opcode, descriptor);
    }
    for (opcode, descriptor) in actions::descriptors() {
        registries.actions.replace(opcode, descriptor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogue() {
        let registries = Registries::builtin();

        for opcode in ["always", "once", "collision", "compareVariable", "everyXSeconds", "randomChance", "customScript"] {
            assert!(registries.conditions.contains(opcode), "missing condition {opcode}");
        }
        for opcode in ["doNothing", "destroyObject", "addToVariable", "playMusic", "logMessage", "customScript"] {
            assert!(registries.actions.contains(opcode), "missing action {opcode}");
        }
    }

    #[test]
    fn test_register_twice_fails() {
        let mut registry = ConditionRegistry::new();
        register_builtin_conditions(&mut registry).unwrap();
        assert!(matches!(
            register_builtin_conditions(&mut registry),
            Err(RuleError::DuplicateOpcode { .. })
        ));
    }

    #[test]
    fn test_categories() {
        let registries = Registries::builtin();

        assert_eq!(registries.conditions.categories().first(), Some(&"Basic"));
        assert!(registries.conditions.categories().contains(&"Collision"));
        assert!(registries.actions.categories().contains(&"Camera"));
    }
}
