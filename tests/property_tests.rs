//! Property tests for evaluation order and condition inversion.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use rust_eca::context::RuleContext;
use rust_eca::core::{EngineConfig, Params, Timestamp};
use rust_eca::model::{Action, Condition, Event};
use rust_eca::registry::{ActionDescriptor, Registries};
use rust_eca::{EventEvaluator, SceneState};

/// Evaluator whose `record` action appends its `index` param to `log`.
fn recording_evaluator(log: &Rc<RefCell<Vec<usize>>>) -> EventEvaluator {
    let mut registries = Registries::builtin();
    let log = Rc::clone(log);
    registries.actions.replace(
        "record",
        ActionDescriptor::new("Record", "Test", move |p: &Params, _: &mut RuleContext<'_>| {
            log.borrow_mut().push(p.number_or("index", -1.0) as usize);
            Ok(())
        }),
    );
    EventEvaluator::new(registries, EngineConfig::default()).unwrap()
}

fn constant(value: bool) -> Condition {
    if value {
        Condition::new("always")
    } else {
        Condition::new("always").inverted()
    }
}

proptest! {
    /// Dispatch order is ascending priority, ties in list order.
    #[test]
    fn priority_order_is_stable_sort(priorities in prop::collection::vec(-5_i32..5, 0..24)) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut evaluator = recording_evaluator(&log);
        let mut world = SceneState::new();
        let mut events: Vec<Event> = priorities
            .iter()
            .enumerate()
            .map(|(index, &priority)| {
                Event::new(format!("e{index}"))
                    .with_priority(priority)
                    .with_action(Action::new("record").with_param("index", index as f64))
            })
            .collect();

        evaluator.process_events(&mut events, &mut world, Timestamp(0));

        let mut expected: Vec<usize> = (0..priorities.len()).collect();
        expected.sort_by_key(|&index| priorities[index]);
        let recorded = log.borrow().clone();
        prop_assert_eq!(recorded, expected);
    }

    /// An event passes exactly when every condition, after inversion, holds.
    #[test]
    fn conditions_are_inverted_conjunction(entries in prop::collection::vec((any::<bool>(), any::<bool>()), 0..8)) {
        let evaluator = EventEvaluator::with_builtins();
        let mut world = SceneState::new();
        let ctx = RuleContext::new(&mut world, Timestamp::ZERO);

        let conditions: Vec<Condition> = entries
            .iter()
            .map(|&(raw, inverted)| {
                let mut condition = constant(raw);
                if inverted {
                    condition.invert();
                }
                condition
            })
            .collect();
        let expected = entries.iter().all(|&(raw, inverted)| raw != inverted);

        prop_assert_eq!(evaluator.evaluate_conditions(&conditions, &ctx), expected);
    }

    /// Unknown opcodes contribute exactly their inversion flag.
    #[test]
    fn unknown_opcode_contributes_inversion(opcode in "zz[a-z]{1,8}", inverted in any::<bool>()) {
        let evaluator = EventEvaluator::with_builtins();
        let mut world = SceneState::new();
        let ctx = RuleContext::new(&mut world, Timestamp::ZERO);

        let mut condition = Condition::new(opcode);
        condition.inverted = inverted;

        prop_assert_eq!(evaluator.evaluate_conditions(&[condition], &ctx), inverted);
    }
}
