//! Evaluator integration tests.
//!
//! These tests drive `process_events` through the public API with an
//! in-memory world and instrumented opcodes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rust_eca::context::{RuleContext, Vec2};
use rust_eca::core::{EngineConfig, Params, Timestamp};
use rust_eca::model::{Action, Condition, Event};
use rust_eca::registry::{ActionDescriptor, ConditionDescriptor, Registries};
use rust_eca::{EventEvaluator, GameWorld, PortCall, SceneState};

/// Registries with a `record` action that appends its `tag` param to a log.
fn recording_registries(log: &Rc<RefCell<Vec<String>>>) -> Registries {
    let mut registries = Registries::builtin();
    let log = Rc::clone(log);
    registries.actions.replace(
        "record",
        ActionDescriptor::new("Record", "Test", move |p: &Params, _: &mut RuleContext<'_>| {
            log.borrow_mut().push(p.text_or("tag", "").to_string());
            Ok(())
        }),
    );
    registries
}

fn record(tag: &str) -> Action {
    Action::new("record").with_param("tag", tag)
}

fn evaluator_with(registries: Registries) -> EventEvaluator {
    EventEvaluator::new(registries, EngineConfig::default()).unwrap()
}

fn score(world: &SceneState) -> f64 {
    world.variable("score").and_then(|v| v.as_number()).unwrap_or(0.0)
}

fn add_score(amount: f64) -> Action {
    Action::new("addToVariable").with_param("variable", "score").with_param("value", amount)
}

/// An event without conditions fires on every tick.
#[test]
fn test_empty_conditions_always_pass() {
    let mut evaluator = EventEvaluator::with_builtins();
    let mut world = SceneState::new();
    let mut events = vec![Event::new("Every frame").with_action(add_score(1.0))];

    for now in [0, 16, 32] {
        evaluator.process_events(&mut events, &mut world, Timestamp(now));
    }

    assert_eq!(score(&world), 3.0);
}

/// Two inverted copies of the same condition cancel out.
#[test]
fn test_inversion_flips_once() {
    let evaluator = EventEvaluator::with_builtins();
    let mut world = SceneState::new();
    world.set_variable("lives", 3.into());
    let ctx = RuleContext::new(&mut world, Timestamp::ZERO);

    let has_lives = Condition::new("compareVariable")
        .with_param("variable", "lives")
        .with_param("comparison", ">")
        .with_param("value", 0);

    assert!(evaluator.evaluate_conditions(&[has_lives.clone()], &ctx));
    assert!(!evaluator.evaluate_conditions(&[has_lives.clone().inverted()], &ctx));

    let mut twice = has_lives.clone().inverted();
    twice.invert();
    assert!(evaluator.evaluate_conditions(&[twice], &ctx));
    assert!(!evaluator.evaluate_conditions(&[has_lives.clone(), has_lives.inverted()], &ctx));
}

/// A trigger-once event dispatches exactly once.
#[test]
fn test_trigger_once() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut evaluator = evaluator_with(recording_registries(&log));
    let mut world = SceneState::new();
    let mut events = vec![Event::new("Intro")
        .trigger_once()
        .with_condition(Condition::new("always"))
        .with_action(record("intro"))];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));
    assert!(events[0].has_triggered);

    let report = evaluator.process_events(&mut events, &mut world, Timestamp(16));

    assert_eq!(*log.borrow(), vec!["intro"]);
    assert_eq!(report.events_evaluated, 0);
}

/// Events dispatch in ascending priority regardless of list order.
#[test]
fn test_priority_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut evaluator = evaluator_with(recording_registries(&log));
    let mut world = SceneState::new();
    let mut events = vec![
        Event::new("late").with_priority(10).with_action(record("10")),
        Event::new("early").with_priority(-5).with_action(record("-5")),
        Event::new("middle").with_priority(0).with_action(record("0")),
    ];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));

    assert_eq!(*log.borrow(), vec!["-5", "0", "10"]);
}

/// Equal priorities keep list order.
#[test]
fn test_priority_ties_are_stable() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut evaluator = evaluator_with(recording_registries(&log));
    let mut world = SceneState::new();
    let mut events = vec![
        Event::new("a").with_priority(1).with_action(record("a")),
        Event::new("b").with_action(record("b")),
        Event::new("c").with_priority(1).with_action(record("c")),
        Event::new("d").with_action(record("d")),
    ];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));

    assert_eq!(*log.borrow(), vec!["b", "d", "a", "c"]);
}

/// A 50ms delay fires on the first tick at or after the deadline, once.
#[test]
fn test_delay_fires_once_at_deadline() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut evaluator = evaluator_with(recording_registries(&log));
    let mut world = SceneState::new();
    let mut events = vec![Event::new("Delayed")
        .trigger_once()
        .with_action(record("boom").with_delay(50))];

    let report = evaluator.process_events(&mut events, &mut world, Timestamp(100));
    assert!(log.borrow().is_empty());
    assert_eq!(report.actions_scheduled, 1);

    evaluator.process_events(&mut events, &mut world, Timestamp(149));
    assert!(log.borrow().is_empty());

    let report = evaluator.process_events(&mut events, &mut world, Timestamp(150));
    assert_eq!(*log.borrow(), vec!["boom"]);
    assert_eq!(report.delayed_fired, 1);

    evaluator.process_events(&mut events, &mut world, Timestamp(400));
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(evaluator.pending_action_count(), 0);
}

/// Delayed actions fire even with an empty event list, in scheduling order.
#[test]
fn test_queue_drains_without_events() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut evaluator = evaluator_with(recording_registries(&log));
    let mut world = SceneState::new();
    let mut events = vec![Event::new("Chain")
        .trigger_once()
        .with_action(record("second").with_delay(30))
        .with_action(record("first").with_delay(10))
        .with_action(record("third").with_delay(30))];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));

    let mut nothing: Vec<Event> = Vec::new();
    evaluator.process_events(&mut nothing, &mut world, Timestamp(100));

    assert_eq!(*log.borrow(), vec!["second", "first", "third"]);
}

/// Unknown opcodes never abort the tick and never touch the world.
#[test]
fn test_unknown_opcodes_are_safe() {
    let mut evaluator = EventEvaluator::with_builtins();
    let mut world = SceneState::new();
    let mut events = vec![
        Event::new("unknown condition")
            .with_condition(Condition::new("isFullMoon"))
            .with_action(add_score(1.0)),
        Event::new("inverted unknown")
            .with_condition(Condition::new("isFullMoon").inverted())
            .with_action(add_score(10.0)),
        Event::new("unknown action").with_action(Action::new("summonDragon")),
    ];

    let report = evaluator.process_events(&mut events, &mut world, Timestamp(0));

    assert_eq!(score(&world), 10.0);
    assert_eq!(report.unknown_opcodes, 3);
    assert!(world.calls().is_empty());
}

/// Sub-events under a failing parent are never evaluated.
#[test]
fn test_sub_events_gated_by_parent() {
    let calls = Rc::new(Cell::new(0));
    let mut registries = Registries::builtin();
    let counter = Rc::clone(&calls);
    registries.conditions.replace(
        "counted",
        ConditionDescriptor::new("Counted", "Test", move |_: &Params, _: &RuleContext<'_>| {
            counter.set(counter.get() + 1);
            Ok(true)
        }),
    );
    let mut evaluator = evaluator_with(registries);
    let mut world = SceneState::new();
    let mut events = vec![Event::new("parent")
        .with_condition(Condition::new("variableIsTrue").with_param("variable", "open"))
        .with_sub_event(Event::new("child").with_condition(Condition::new("counted")))];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));
    assert_eq!(calls.get(), 0);

    world.set_variable("open", true.into());
    evaluator.process_events(&mut events, &mut world, Timestamp(16));
    assert_eq!(calls.get(), 1);
}

/// After `reset_events` a consumed event fires again.
#[test]
fn test_reset_events_rearms() {
    let mut evaluator = EventEvaluator::with_builtins();
    let mut world = SceneState::new();
    let mut events = vec![Event::new("Bonus")
        .trigger_once()
        .with_sub_event(Event::new("Nested bonus").trigger_once().with_action(add_score(5.0)))
        .with_action(add_score(1.0))];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));
    evaluator.process_events(&mut events, &mut world, Timestamp(16));
    assert_eq!(score(&world), 6.0);

    EventEvaluator::reset_events(&mut events);
    assert!(!events[0].has_triggered);
    assert!(!events[0].sub_events[0].has_triggered);

    evaluator.process_events(&mut events, &mut world, Timestamp(32));
    assert_eq!(score(&world), 12.0);
}

/// Disabled events are skipped together with their sub-events.
#[test]
fn test_disabled_event_skipped() {
    let mut evaluator = EventEvaluator::with_builtins();
    let mut world = SceneState::new();
    let mut events = vec![Event::new("Off")
        .disabled()
        .with_action(add_score(1.0))
        .with_sub_event(Event::new("Inner").with_action(add_score(1.0)))];

    let report = evaluator.process_events(&mut events, &mut world, Timestamp(0));

    assert_eq!(score(&world), 0.0);
    assert_eq!(report.events_evaluated, 0);
}

/// A collision pair recorded by one event is invisible to the next.
#[test]
fn test_collision_pair_is_per_event() {
    let mut evaluator = EventEvaluator::with_builtins();
    let mut world = SceneState::new();
    let player = world.spawn("player", Vec2::ZERO);
    let coin = world.spawn("coin", Vec2::ZERO);
    world.set_colliding(player, coin, true);

    let mut events = vec![
        Event::new("Collect")
            .with_condition(
                Condition::new("collision")
                    .with_param("objectA", "player")
                    .with_param("objectB", "coin"),
            )
            .with_action(Action::new("hideObject").with_param("object", "collision_other")),
        Event::new("No pair here").with_action(Action::new("destroyObject").with_param("object", "collision_other")),
    ];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));

    assert_eq!(
        world.calls().iter().cloned().collect::<Vec<_>>(),
        vec![PortCall::SetVisible { id: coin, visible: false }]
    );
    assert!(world.entity_exists(coin));
}

/// Delayed actions keep the collision pair of the tick that scheduled them.
#[test]
fn test_delayed_action_keeps_collision_pair() {
    let mut evaluator = EventEvaluator::with_builtins();
    let mut world = SceneState::new();
    let player = world.spawn("player", Vec2::ZERO);
    let coin = world.spawn("coin", Vec2::ZERO);
    world.set_colliding(player, coin, true);

    let mut events = vec![Event::new("Collect")
        .trigger_once()
        .with_condition(
            Condition::new("collision")
                .with_param("objectA", "player")
                .with_param("objectB", "coin"),
        )
        .with_action(
            Action::new("destroyObject")
                .with_param("object", "collision_other")
                .with_delay(200),
        )];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));
    world.set_colliding(player, coin, false);
    assert!(world.entity_exists(coin));

    evaluator.process_events(&mut events, &mut world, Timestamp(250));

    assert!(!world.entity_exists(coin));
    assert!(world.entity_exists(player));
}

/// A delayed action whose entity vanished fires without effect.
#[test]
fn test_delayed_action_tolerates_missing_entity() {
    let mut evaluator = EventEvaluator::with_builtins();
    let mut world = SceneState::new();
    let crate_id = world.spawn("crate", Vec2::ZERO);

    let mut events = vec![Event::new("Push crate")
        .trigger_once()
        .with_action(
            Action::new("moveObject")
                .with_param("object", crate_id)
                .with_param("x", 5)
                .with_param("y", 5)
                .with_delay(10),
        )];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));
    world.destroy_entity(crate_id);
    let report = evaluator.process_events(&mut events, &mut world, Timestamp(20));

    assert_eq!(report.delayed_fired, 1);
    assert!(world.entity(crate_id).is_none());
}

/// Trigger-once is consumed at dispatch, before delayed actions fire.
#[test]
fn test_trigger_once_consumed_at_dispatch() {
    let mut evaluator = EventEvaluator::with_builtins();
    let mut world = SceneState::new();
    let mut events = vec![Event::new("Later").trigger_once().with_action(add_score(1.0).with_delay(1_000))];

    evaluator.process_events(&mut events, &mut world, Timestamp(0));

    assert!(events[0].has_triggered);
    assert_eq!(score(&world), 0.0);
    assert_eq!(evaluator.pending_action_count(), 1);
}
