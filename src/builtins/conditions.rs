//! Builtin condition opcodes.
//!
//! Every predicate reads the world only. Missing or mistyped parameters make
//! the predicate false rather than an error, except where a declared default
//! applies.

use tracing::trace;

use crate::context::{CollisionPair, MouseButton, RuleContext};
use crate::core::{BehaviorResult, Params};
use crate::registry::{ConditionDescriptor, ParamKind, ParamSpec};

use super::compare::Comparison;

fn object_param(name: &str, label: &str) -> ParamSpec {
    ParamSpec::new(name, ParamKind::Object).label(label).required()
}

fn comparison_param(ops: &[Comparison]) -> ParamSpec {
    ParamSpec::new("comparison", ParamKind::select(ops.iter().map(|op| op.symbol())))
        .label("Comparison")
        .default_value("=")
}

fn comparison(params: &Params) -> Option<Comparison> {
    Comparison::parse(params.text_or("comparison", "="))
}

/// All builtin conditions, in editor order.
pub(crate) fn descriptors() -> Vec<(&'static str, ConditionDescriptor)> {
    let count_ops = [
        Comparison::Eq,
        Comparison::Gt,
        Comparison::Lt,
        Comparison::Ge,
        Comparison::Le,
    ];

    vec![
        // === Basic ===
        (
            "always",
            ConditionDescriptor::new("Always", "Basic", always).describe("Always true (runs every frame)"),
        ),
        (
            "once",
            ConditionDescriptor::new("Once", "Basic", always)
                .describe("True once; pair with the event's trigger-once flag"),
        ),
        // === Collision ===
        (
            "collision",
            ConditionDescriptor::new("Collision", "Collision", collision)
                .describe("Object A collides with Object B")
                .param(object_param("objectA", "Object A"))
                .param(object_param("objectB", "Object B")),
        ),
        (
            "objectAtPosition",
            ConditionDescriptor::new("Object at position", "Collision", object_at_position)
                .describe("Object is at a specific position")
                .param(object_param("object", "Object"))
                .param(ParamSpec::new("x", ParamKind::Number).label("X position").required())
                .param(ParamSpec::new("y", ParamKind::Number).label("Y position").required())
                .param(ParamSpec::new("tolerance", ParamKind::Number).label("Tolerance").default_value(10.0)),
        ),
        // === Variables ===
        (
            "compareVariable",
            ConditionDescriptor::new("Compare variable", "Variables", compare_variable)
                .describe("Compare a variable to a value")
                .param(ParamSpec::new("variable", ParamKind::Variable).label("Variable").required())
                .param(comparison_param(&Comparison::ALL))
                .param(ParamSpec::new("value", ParamKind::Number).label("Value").required()),
        ),
        (
            "compareVariables",
            ConditionDescriptor::new("Compare two variables", "Variables", compare_variables)
                .describe("Compare two variables")
                .param(ParamSpec::new("variable1", ParamKind::Variable).label("First variable").required())
                .param(comparison_param(&Comparison::ALL))
                .param(ParamSpec::new("variable2", ParamKind::Variable).label("Second variable").required()),
        ),
        (
            "variableIsTrue",
            ConditionDescriptor::new("Variable is true", "Variables", variable_is_true)
                .describe("Boolean variable is true")
                .param(ParamSpec::new("variable", ParamKind::Variable).label("Variable").required()),
        ),
        // === Input ===
        (
            "keyPressed",
            ConditionDescriptor::new("Key is pressed", "Input", |p: &Params, ctx: &RuleContext<'_>| {
                Ok(p.text("key").is_some_and(|key| ctx.world().is_key_down(key)))
            })
            .describe("A keyboard key is currently pressed")
            .param(ParamSpec::new("key", ParamKind::Key).label("Key").required()),
        ),
        (
            "keyReleased",
            ConditionDescriptor::new("Key was released", "Input", |p: &Params, ctx: &RuleContext<'_>| {
                Ok(p.text("key").is_some_and(|key| ctx.world().was_key_released(key)))
            })
            .describe("A keyboard key was released this frame")
            .param(ParamSpec::new("key", ParamKind::Key).label("Key").required()),
        ),
        (
            "keyJustPressed",
            ConditionDescriptor::new("Key just pressed", "Input", |p: &Params, ctx: &RuleContext<'_>| {
                Ok(p.text("key").is_some_and(|key| ctx.world().was_key_just_pressed(key)))
            })
            .describe("A key was pressed this frame")
            .param(ParamSpec::new("key", ParamKind::Key).label("Key").required()),
        ),
        (
            "mouseClicked",
            ConditionDescriptor::new("Mouse clicked", "Input", mouse_clicked)
                .describe("Mouse button was clicked")
                .param(
                    ParamSpec::new("button", ParamKind::select(["left", "right", "middle"]))
                        .label("Button")
                        .default_value("left"),
                ),
        ),
        // === Objects ===
        (
            "objectExists",
            ConditionDescriptor::new("Object exists", "Objects", |p: &Params, ctx: &RuleContext<'_>| {
                Ok(p.text("object").is_some_and(|kind| ctx.world().count_of_kind(kind) > 0))
            })
            .describe("At least one instance of the object exists")
            .param(object_param("object", "Object type")),
        ),
        (
            "objectCount",
            ConditionDescriptor::new("Number of objects", "Objects", object_count)
                .describe("Count of object instances matches")
                .param(object_param("object", "Object type"))
                .param(comparison_param(&count_ops))
                .param(ParamSpec::new("count", ParamKind::Number).label("Count").required()),
        ),
        (
            "objectVisible",
            ConditionDescriptor::new("Object is visible", "Objects", |p: &Params, ctx: &RuleContext<'_>| {
                Ok(p.text("object").is_some_and(|kind| {
                    ctx.world().entities_of_kind(kind).iter().any(|e| e.visible)
                }))
            })
            .describe("Some instance of the object is visible")
            .param(object_param("object", "Object type")),
        ),
        // === Time ===
        (
            "timerElapsed",
            ConditionDescriptor::new("Timer has elapsed", "Time", timer_elapsed)
                .describe("A named timer has run for at least the duration")
                .param(ParamSpec::new("timerName", ParamKind::Text).label("Timer name").required())
                .param(ParamSpec::new("duration", ParamKind::Number).label("Duration (seconds)").required()),
        ),
        (
            "everyXSeconds",
            ConditionDescriptor::new("Every X seconds", "Time", every_x_seconds)
                .describe("True on the frame scene time crosses each interval")
                .param(
                    ParamSpec::new("interval", ParamKind::Number)
                        .label("Interval (seconds)")
                        .required()
                        .default_value(1.0),
                ),
        ),
        (
            "randomChance",
            ConditionDescriptor::new("Random chance", "Time", random_chance)
                .describe("True with the given probability, re-rolled each frame")
                .param(
                    ParamSpec::new("probability", ParamKind::Slider { min: 0.0, max: 1.0, step: 0.05 })
                        .label("Probability")
                        .default_value(0.5),
                ),
        ),
        // === Scene ===
        (
            "sceneStarted",
            ConditionDescriptor::new("Scene just started", "Scene", scene_started).describe("The scene was just loaded"),
        ),
        // === Physics ===
        (
            "objectIsGrounded",
            ConditionDescriptor::new("Object is grounded", "Physics", |p: &Params, ctx: &RuleContext<'_>| {
                Ok(p.text("object").is_some_and(|kind| {
                    let world = ctx.world();
                    world.entities_of_kind(kind).iter().any(|e| world.is_grounded(e.id))
                }))
            })
            .describe("Object is touching the ground")
            .param(object_param("object", "Object type")),
        ),
        (
            "objectIsMoving",
            ConditionDescriptor::new("Object is moving", "Physics", object_is_moving)
                .describe("Object speed is at least the minimum")
                .param(object_param("object", "Object type"))
                .param(ParamSpec::new("minSpeed", ParamKind::Number).label("Minimum speed").default_value(0.1)),
        ),
        // === Animation ===
        (
            "animationFinished",
            ConditionDescriptor::new("Animation finished", "Animation", animation_finished)
                .describe("Current (or named) animation has completed")
                .param(object_param("object", "Object type"))
                .param(ParamSpec::new("animation", ParamKind::Text).label("Animation name (optional)")),
        ),
        // === Scenes ===
        (
            "sceneStart",
            ConditionDescriptor::new("Scene starts", "Scenes", scene_started).describe("True when the scene first loads"),
        ),
        (
            "currentScene",
            ConditionDescriptor::new("Current scene is", "Scenes", |p: &Params, ctx: &RuleContext<'_>| {
                Ok(match (p.text("sceneName"), ctx.world().current_scene()) {
                    (Some(wanted), Some(current)) => wanted == current,
                    _ => false,
                })
            })
            .describe("Current scene name matches")
            .param(ParamSpec::new("sceneName", ParamKind::Scene).label("Scene name").required()),
        ),
        (
            "globalVariableEquals",
            ConditionDescriptor::new("Global variable equals", "Scenes", |p: &Params, ctx: &RuleContext<'_>| {
                let Some(name) = p.text("variableName") else {
                    return Ok(false);
                };
                let current = ctx.world().global_variable(name);
                Ok(Comparison::Eq.values(current.as_ref(), p.get("value")))
            })
            .describe("A global variable has a specific value")
            .param(ParamSpec::new("variableName", ParamKind::Text).label("Variable name").required())
            .param(ParamSpec::new("value", ParamKind::Text).label("Value").required()),
        ),
        (
            "globalVariableGreaterThan",
            ConditionDescriptor::new("Global variable greater than", "Scenes", |p: &Params, ctx: &RuleContext<'_>| {
                let (Some(name), Some(value)) = (p.text("variableName"), p.number("value")) else {
                    return Ok(false);
                };
                let current = ctx.world().global_variable(name).and_then(|v| v.as_number()).unwrap_or(0.0);
                Ok(Comparison::Gt.numbers(current, value))
            })
            .describe("A global variable is greater than a value")
            .param(ParamSpec::new("variableName", ParamKind::Text).label("Variable name").required())
            .param(ParamSpec::new("value", ParamKind::Number).label("Value").required()),
        ),
        // === Advanced ===
        (
            "customScript",
            ConditionDescriptor::new("Custom script", "Advanced", |p: &Params, ctx: &RuleContext<'_>| {
                ctx.world().eval_script(p.require_text("code")?)
            })
            .describe("Evaluate host script code (advanced)")
            .param(ParamSpec::new("code", ParamKind::Code).label("Script").required()),
        ),
    ]
}

fn always(_params: &Params, _ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    Ok(true)
}

/// Any A touching a different B. Records the first pair found.
fn collision(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let (Some(kind_a), Some(kind_b)) = (params.text("objectA"), params.text("objectB")) else {
        return Ok(false);
    };
    let world = ctx.world();
    let objects_b = world.entities_of_kind(kind_b);

    for a in world.entities_of_kind(kind_a) {
        for b in &objects_b {
            if a.id != b.id && world.is_colliding(a.id, b.id) {
                trace!(subject = %a.id, other = %b.id, "collision matched");
                ctx.record_collision(CollisionPair::new(a.id, b.id));
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn object_at_position(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let (Some(kind), Some(x), Some(y)) = (params.text("object"), params.number("x"), params.number("y")) else {
        return Ok(false);
    };
    let tolerance = params.number_or("tolerance", 10.0);

    Ok(ctx.world().entities_of_kind(kind).iter().any(|e| {
        (e.position.x - x).abs() <= tolerance && (e.position.y - y).abs() <= tolerance
    }))
}

fn compare_variable(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let (Some(name), Some(op)) = (params.text("variable"), comparison(params)) else {
        return Ok(false);
    };
    let current = ctx.world().variable(name);
    Ok(op.values(current.as_ref(), params.get("value")))
}

fn compare_variables(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let (Some(first), Some(second), Some(op)) =
        (params.text("variable1"), params.text("variable2"), comparison(params))
    else {
        return Ok(false);
    };
    let world = ctx.world();
    Ok(op.values(world.variable(first).as_ref(), world.variable(second).as_ref()))
}

fn variable_is_true(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    Ok(params
        .text("variable")
        .and_then(|name| ctx.world().variable(name))
        .is_some_and(|value| value.is_truthy()))
}

fn mouse_clicked(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    Ok(MouseButton::parse(params.text_or("button", "left"))
        .is_some_and(|button| ctx.world().was_mouse_clicked(button)))
}

fn object_count(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let (Some(kind), Some(count), Some(op)) = (params.text("object"), params.number("count"), comparison(params))
    else {
        return Ok(false);
    };
    Ok(op.numbers(ctx.world().count_of_kind(kind) as f64, count))
}

fn timer_elapsed(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let (Some(name), Some(seconds)) = (params.text("timerName"), params.number("duration")) else {
        return Ok(false);
    };
    Ok(ctx
        .world()
        .timer_elapsed(name)
        .is_some_and(|elapsed| elapsed as f64 >= seconds * 1000.0))
}

/// True on the tick whose `(elapsed - delta, elapsed]` window contains an
/// interval boundary. Derived from the clock alone so repeated evaluation
/// within one tick agrees.
fn every_x_seconds(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let interval_ms = params.number_or("interval", 1.0) * 1000.0;
    if interval_ms.is_nan() || interval_ms <= 0.0 || ctx.delta_ms() == 0 {
        return Ok(false);
    }
    let elapsed = ctx.world().elapsed_time();
    let previous = elapsed.saturating_sub(ctx.delta_ms());

    Ok((elapsed as f64 / interval_ms).floor() > (previous as f64 / interval_ms).floor())
}

fn random_chance(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let probability = params.number_or("probability", 0.5);
    let event = ctx.event().map_or("", |binding| binding.id.as_str());
    let condition = ctx.condition().unwrap_or_default();
    let key = format!("{event}/{condition}/{}", params.text_or("key", "randomChance"));
    Ok(ctx.roll(&key, probability))
}

fn scene_started(_params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    Ok(ctx.world().is_scene_start())
}

fn object_is_moving(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let Some(kind) = params.text("object") else {
        return Ok(false);
    };
    let min_speed = params.number_or("minSpeed", 0.1);
    let world = ctx.world();

    Ok(world
        .entities_of_kind(kind)
        .iter()
        .any(|e| world.velocity(e.id).is_some_and(|v| v.length() >= min_speed)))
}

fn animation_finished(params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
    let Some(kind) = params.text("object") else {
        return Ok(false);
    };
    let animation = params.text("animation").filter(|name| !name.is_empty());
    let world = ctx.world();

    Ok(world
        .entities_of_kind(kind)
        .iter()
        .any(|e| world.is_animation_finished(e.id, animation)))
}
