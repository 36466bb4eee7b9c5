//! Tick throughput over a 200-event rule set.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rust_eca::context::Vec2;
use rust_eca::core::Timestamp;
use rust_eca::model::{Action, Condition, Event};
use rust_eca::{EventEvaluator, GameWorld, SceneState};

/// 200 events mixing passing and failing conditions, one level of nesting,
/// and a few delayed actions.
fn rule_set() -> Vec<Event> {
    (0..200)
        .map(|i| {
            let mut event = Event::new(format!("rule {i}"))
                .with_priority(i % 7)
                .with_condition(
                    Condition::new("compareVariable")
                        .with_param("variable", "score")
                        .with_param("comparison", if i % 2 == 0 { ">=" } else { "<" })
                        .with_param("value", 0),
                )
                .with_action(
                    Action::new("addToVariable")
                        .with_param("variable", format!("counter_{}", i % 10))
                        .with_param("value", 1),
                );
            if i % 10 == 0 {
                event = event
                    .with_condition(
                        Condition::new("collision")
                            .with_param("objectA", "player")
                            .with_param("objectB", "coin"),
                    )
                    .with_sub_event(
                        Event::new(format!("rule {i} bonus"))
                            .with_action(Action::new("playSound").with_param("sound", "ding").with_delay(32)),
                    );
            }
            event
        })
        .collect()
}

fn scene() -> SceneState {
    let mut world = SceneState::new();
    world.set_variable("score", 0.into());
    let player = world.spawn("player", Vec2::ZERO);
    for i in 0..50_u8 {
        let coin = world.spawn("coin", Vec2::new(f64::from(i), 0.0));
        if i == 49 {
            world.set_colliding(player, coin, true);
        }
    }
    world
}

fn bench_process_events(c: &mut Criterion) {
    let mut events = rule_set();
    let mut world = scene();
    let mut evaluator = EventEvaluator::with_builtins();
    let mut now = 0;

    c.bench_function("process_events_200", |b| {
        b.iter(|| {
            now += 16;
            let report = evaluator.process_events(&mut events, &mut world, Timestamp(now));
            world.take_calls();
            black_box(report)
        })
    });
}

criterion_group!(benches, bench_process_events);
criterion_main!(benches);
