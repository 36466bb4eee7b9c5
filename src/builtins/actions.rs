//! Builtin action opcodes.
//!
//! Effects go through the world's ports. An effect whose parameters are
//! missing does nothing; seconds-valued parameters are converted to the
//! milliseconds the ports take.
//!
//! ## Object picker
//!
//! Entity-targeting actions take an `object` parameter naming which entities
//! to affect:
//!
//! - `collision_self` / `collision_other`: one side of the pair recorded by
//!   this event's collision condition (nothing if no pair was recorded)
//! - `all_of_type`: every entity of kind `objectType`
//! - an entity reference (`{"entity": 7}`): that entity

use tracing::info;

use crate::context::{MusicOptions, ParticleOptions, RuleContext, SoundOptions, Vec2};
use crate::core::{BehaviorResult, EntityId, ParamValue, Params};
use crate::registry::{ActionDescriptor, ParamKind, ParamSpec};

/// Object picker choice that targets a whole kind.
pub const ALL_OF_TYPE: &str = "all_of_type";
pub const COLLISION_SELF: &str = "collision_self";
pub const COLLISION_OTHER: &str = "collision_other";

/// Resolved `object` parameter.
#[derive(Clone, Debug, PartialEq)]
enum Target {
    Entity(EntityId),
    Kind(String),
    Nothing,
}

fn pick(params: &Params, ctx: &RuleContext<'_>) -> Target {
    match params.get("object") {
        Some(ParamValue::Reference { entity }) => Target::Entity(*entity),
        Some(ParamValue::Text(choice)) => match choice.as_str() {
            COLLISION_OTHER => ctx.collision_pair().map_or(Target::Nothing, |p| Target::Entity(p.other)),
            COLLISION_SELF => ctx.collision_pair().map_or(Target::Nothing, |p| Target::Entity(p.subject)),
            ALL_OF_TYPE => params
                .text("objectType")
                .map_or(Target::Nothing, |kind| Target::Kind(kind.to_string())),
            _ => Target::Nothing,
        },
        _ => Target::Nothing,
    }
}

/// Entity IDs the picker resolves to.
fn targets(params: &Params, ctx: &RuleContext<'_>) -> Vec<EntityId> {
    match pick(params, ctx) {
        Target::Entity(id) => vec![id],
        Target::Kind(kind) => ctx.world().entities_of_kind(&kind).into_iter().map(|e| e.id).collect(),
        Target::Nothing => Vec::new(),
    }
}

fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

fn picker_params(options: &[&str]) -> [ParamSpec; 2] {
    [
        ParamSpec::new("object", ParamKind::select(options.iter().copied()))
            .label("Object")
            .required(),
        ParamSpec::new("objectType", ParamKind::Object)
            .label("Object type")
            .visible_if(|p| p.text("object") == Some(ALL_OF_TYPE)),
    ]
}

fn with_picker(descriptor: ActionDescriptor) -> ActionDescriptor {
    let [object, object_type] = picker_params(&[COLLISION_OTHER, COLLISION_SELF, ALL_OF_TYPE]);
    descriptor.param(object).param(object_type)
}

fn number_param(name: &str, label: &str) -> ParamSpec {
    ParamSpec::new(name, ParamKind::Number).label(label).required()
}

fn variable_params(descriptor: ActionDescriptor, value_label: &str) -> ActionDescriptor {
    descriptor
        .param(ParamSpec::new("variable", ParamKind::Variable).label("Variable").required())
        .param(number_param("value", value_label))
}

/// All builtin actions, in editor order.
pub(crate) fn descriptors() -> Vec<(&'static str, ActionDescriptor)> {
    vec![
        // === Basic ===
        (
            "doNothing",
            ActionDescriptor::new("Do nothing", "Basic", |_: &Params, _: &mut RuleContext<'_>| Ok(()))
                .describe("Placeholder action"),
        ),
        // === Objects ===
        (
            "createObject",
            ActionDescriptor::new("Create object", "Objects", create_object)
                .describe("Spawn a new object")
                .param(ParamSpec::new("objectType", ParamKind::Object).label("Object type").required())
                .param(number_param("x", "X position"))
                .param(number_param("y", "Y position"))
                .param(ParamSpec::new("layer", ParamKind::Text).label("Layer").default_value("entities")),
        ),
        (
            "destroyObject",
            with_picker(ActionDescriptor::new("Destroy object", "Objects", destroy_object))
                .describe("Remove an object from the game"),
        ),
        (
            "hideObject",
            with_picker(ActionDescriptor::new("Hide object", "Objects", |p: &Params, ctx: &mut RuleContext<'_>| {
                set_visibility(p, ctx, false)
            }))
            .describe("Make object invisible"),
        ),
        (
            "showObject",
            with_picker(ActionDescriptor::new("Show object", "Objects", |p: &Params, ctx: &mut RuleContext<'_>| {
                set_visibility(p, ctx, true)
            }))
            .describe("Make object visible"),
        ),
        // === Variables ===
        (
            "setVariable",
            ActionDescriptor::new("Set variable", "Variables", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let (Some(name), Some(value)) = (p.text("variable"), p.get("value")) {
                    ctx.world_mut().set_variable(name, value.clone());
                }
                Ok(())
            })
            .describe("Set a variable to a value")
            .param(ParamSpec::new("variable", ParamKind::Variable).label("Variable").required())
            .param(ParamSpec::new("value", ParamKind::Text).label("Value").required()),
        ),
        (
            "addToVariable",
            variable_params(
                ActionDescriptor::new("Add to variable", "Variables", |p: &Params, ctx: &mut RuleContext<'_>| {
                    if let (Some(name), Some(amount)) = (p.text("variable"), p.number("value")) {
                        ctx.world_mut().add_to_variable(name, amount);
                    }
                    Ok(())
                })
                .describe("Add a value to a variable"),
                "Value to add",
            ),
        ),
        (
            "subtractFromVariable",
            variable_params(
                ActionDescriptor::new("Subtract from variable", "Variables", |p: &Params, ctx: &mut RuleContext<'_>| {
                    if let (Some(name), Some(amount)) = (p.text("variable"), p.number("value")) {
                        ctx.world_mut().add_to_variable(name, -amount);
                    }
                    Ok(())
                })
                .describe("Subtract a value from a variable"),
                "Value to subtract",
            ),
        ),
        (
            "multiplyVariable",
            variable_params(
                ActionDescriptor::new("Multiply variable", "Variables", |p: &Params, ctx: &mut RuleContext<'_>| {
                    if let (Some(name), Some(factor)) = (p.text("variable"), p.number("value")) {
                        ctx.world_mut().multiply_variable(name, factor);
                    }
                    Ok(())
                })
                .describe("Multiply a variable by a value"),
                "Multiply by",
            ),
        ),
        (
            "toggleVariable",
            ActionDescriptor::new("Toggle boolean", "Variables", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let Some(name) = p.text("variable") {
                    ctx.world_mut().toggle_variable(name);
                }
                Ok(())
            })
            .describe("Flip a boolean variable")
            .param(ParamSpec::new("variable", ParamKind::Variable).label("Variable").required()),
        ),
        // === Movement ===
        (
            "moveObject",
            with_picker(ActionDescriptor::new("Move object", "Movement", |p: &Params, ctx: &mut RuleContext<'_>| {
                let (Some(x), Some(y)) = (p.number("x"), p.number("y")) else {
                    return Ok(());
                };
                for id in targets(p, ctx) {
                    ctx.world_mut().set_position(id, Vec2::new(x, y));
                }
                Ok(())
            }))
            .describe("Move an object to a position")
            .param(number_param("x", "X position"))
            .param(number_param("y", "Y position")),
        ),
        (
            "setVelocity",
            with_picker(ActionDescriptor::new("Set velocity", "Movement", |p: &Params, ctx: &mut RuleContext<'_>| {
                let velocity = Vec2::new(p.number_or("vx", 0.0), p.number_or("vy", 0.0));
                for id in targets(p, ctx) {
                    ctx.world_mut().set_velocity(id, velocity);
                }
                Ok(())
            }))
            .describe("Set object velocity")
            .param(number_param("vx", "Velocity X"))
            .param(number_param("vy", "Velocity Y")),
        ),
        (
            "applyForce",
            with_picker(ActionDescriptor::new("Apply force", "Movement", |p: &Params, ctx: &mut RuleContext<'_>| {
                let force = Vec2::new(p.number_or("fx", 0.0), p.number_or("fy", 0.0));
                for id in targets(p, ctx) {
                    ctx.world_mut().apply_force(id, force);
                }
                Ok(())
            }))
            .describe("Push an object")
            .param(number_param("fx", "Force X"))
            .param(number_param("fy", "Force Y")),
        ),
        (
            "rotateObject",
            with_picker(ActionDescriptor::new("Rotate object", "Movement", |p: &Params, ctx: &mut RuleContext<'_>| {
                let Some(angle) = p.number("angle") else {
                    return Ok(());
                };
                for id in targets(p, ctx) {
                    ctx.world_mut().set_rotation(id, angle);
                }
                Ok(())
            }))
            .describe("Set object rotation")
            .param(number_param("angle", "Angle (degrees)")),
        ),
        (
            "scaleObject",
            with_picker(ActionDescriptor::new("Scale object", "Movement", |p: &Params, ctx: &mut RuleContext<'_>| {
                let scale = p.number_or("scale", 1.0);
                for id in targets(p, ctx) {
                    ctx.world_mut().set_scale(id, scale);
                }
                Ok(())
            }))
            .describe("Set object scale")
            .param(number_param("scale", "Scale").default_value(1.0)),
        ),
        // === Audio ===
        (
            "playSound",
            ActionDescriptor::new("Play sound", "Audio", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let Some(sound) = p.text("sound") {
                    let volume = p.number_or("volume", 1.0);
                    ctx.world_mut().play_sound(sound, SoundOptions { volume });
                }
                Ok(())
            })
            .describe("Play a sound effect")
            .param(ParamSpec::new("sound", ParamKind::Sound).label("Sound").required())
            .param(
                ParamSpec::new("volume", ParamKind::Slider { min: 0.0, max: 1.0, step: 0.1 })
                    .label("Volume")
                    .default_value(1.0),
            ),
        ),
        (
            "playMusic",
            ActionDescriptor::new("Play music", "Audio", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let Some(music) = p.text("music") {
                    let options = MusicOptions {
                        looped: p.bool_or("loop", true),
                        volume: p.number_or("volume", 0.5),
                    };
                    ctx.world_mut().play_music(music, options);
                }
                Ok(())
            })
            .describe("Play background music")
            .param(ParamSpec::new("music", ParamKind::Sound).label("Music").required())
            .param(ParamSpec::new("loop", ParamKind::Bool).label("Loop").default_value(true))
            .param(
                ParamSpec::new("volume", ParamKind::Slider { min: 0.0, max: 1.0, step: 0.1 })
                    .label("Volume")
                    .default_value(0.5),
            ),
        ),
        (
            "stopMusic",
            ActionDescriptor::new("Stop music", "Audio", |_: &Params, ctx: &mut RuleContext<'_>| {
                ctx.world_mut().stop_music();
                Ok(())
            })
            .describe("Stop background music"),
        ),
        // === UI ===
        (
            "showText",
            ActionDescriptor::new("Show text message", "UI", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let Some(text) = p.text("text") {
                    let duration = seconds_to_ms(p.number_or("duration", 3.0));
                    ctx.world_mut().show_message(text, duration);
                }
                Ok(())
            })
            .describe("Display a message on screen")
            .param(ParamSpec::new("text", ParamKind::Text).label("Text").required())
            .param(ParamSpec::new("duration", ParamKind::Number).label("Duration (seconds)").default_value(3.0)),
        ),
        // === Camera ===
        (
            "shakeCamera",
            ActionDescriptor::new("Shake camera", "Camera", |p: &Params, ctx: &mut RuleContext<'_>| {
                let intensity = p.number_or("intensity", 5.0);
                let duration = seconds_to_ms(p.number_or("duration", 0.3));
                ctx.world_mut().shake_camera(intensity, duration);
                Ok(())
            })
            .describe("Screen shake effect")
            .param(ParamSpec::new("intensity", ParamKind::Number).label("Intensity").default_value(5.0))
            .param(ParamSpec::new("duration", ParamKind::Number).label("Duration (seconds)").default_value(0.3)),
        ),
        (
            "panCamera",
            ActionDescriptor::new("Pan camera", "Camera", |p: &Params, ctx: &mut RuleContext<'_>| {
                let (Some(x), Some(y)) = (p.number("x"), p.number("y")) else {
                    return Ok(());
                };
                let duration = seconds_to_ms(p.number_or("duration", 1.0));
                ctx.world_mut().pan_camera(Vec2::new(x, y), duration);
                Ok(())
            })
            .describe("Move the camera to a position")
            .param(number_param("x", "X position"))
            .param(number_param("y", "Y position"))
            .param(ParamSpec::new("duration", ParamKind::Number).label("Duration (seconds)").default_value(1.0)),
        ),
        (
            "zoomCamera",
            ActionDescriptor::new("Zoom camera", "Camera", |p: &Params, ctx: &mut RuleContext<'_>| {
                let zoom = p.number_or("zoom", 1.0);
                let duration = seconds_to_ms(p.number_or("duration", 0.5));
                ctx.world_mut().zoom_camera(zoom, duration);
                Ok(())
            })
            .describe("Change camera zoom")
            .param(ParamSpec::new("zoom", ParamKind::Number).label("Zoom level").default_value(1.0))
            .param(ParamSpec::new("duration", ParamKind::Number).label("Duration (seconds)").default_value(0.5)),
        ),
        // === Effects ===
        (
            "createParticles",
            ActionDescriptor::new("Create particles", "Effects", |p: &Params, ctx: &mut RuleContext<'_>| {
                let (Some(x), Some(y)) = (p.number("x"), p.number("y")) else {
                    return Ok(());
                };
                let options = ParticleOptions {
                    count: p.number_or("count", 20.0).max(0.0).round() as u32,
                    color: p.text_or("color", "#FFD700").to_string(),
                };
                ctx.world_mut().emit_particles(Vec2::new(x, y), options);
                Ok(())
            })
            .describe("Emit a particle burst")
            .param(number_param("x", "X position"))
            .param(number_param("y", "Y position"))
            .param(ParamSpec::new("count", ParamKind::Number).label("Particle count").default_value(20.0))
            .param(ParamSpec::new("color", ParamKind::Color).label("Color").default_value("#FFD700")),
        ),
        (
            "flashScreen",
            ActionDescriptor::new("Flash screen", "Effects", |p: &Params, ctx: &mut RuleContext<'_>| {
                let color = p.text_or("color", "#FFFFFF");
                let duration = seconds_to_ms(p.number_or("duration", 0.1));
                ctx.world_mut().flash_screen(color, duration);
                Ok(())
            })
            .describe("Brief screen flash")
            .param(ParamSpec::new("color", ParamKind::Color).label("Color").default_value("#FFFFFF"))
            .param(ParamSpec::new("duration", ParamKind::Number).label("Duration (seconds)").default_value(0.1)),
        ),
        // === Time ===
        (
            "startTimer",
            ActionDescriptor::new("Start timer", "Time", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let Some(name) = p.text("timerName") {
                    ctx.world_mut().start_timer(name);
                }
                Ok(())
            })
            .describe("Start a named timer")
            .param(ParamSpec::new("timerName", ParamKind::Text).label("Timer name").required()),
        ),
        (
            "resetTimer",
            ActionDescriptor::new("Reset timer", "Time", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let Some(name) = p.text("timerName") {
                    ctx.world_mut().reset_timer(name);
                }
                Ok(())
            })
            .describe("Reset a named timer to zero")
            .param(ParamSpec::new("timerName", ParamKind::Text).label("Timer name").required()),
        ),
        (
            // Waiting is expressed through `Action::delay`.
            "wait",
            ActionDescriptor::new("Wait", "Time", |_: &Params, _: &mut RuleContext<'_>| Ok(()))
                .describe("Marker; delay the following actions with their delay field")
                .param(number_param("duration", "Duration (seconds)")),
        ),
        // === Debug ===
        (
            "logMessage",
            ActionDescriptor::new("Log message", "Debug", |p: &Params, ctx: &mut RuleContext<'_>| {
                let message = p.text_or("message", "");
                let event = ctx.event().map_or("", |binding| binding.name.as_str());
                info!(event = %event, "{message}");
                ctx.world_mut().console_log(message);
                Ok(())
            })
            .describe("Write to the log and the game console")
            .param(ParamSpec::new("message", ParamKind::Text).label("Message").required()),
        ),
        // === Scenes ===
        (
            "changeScene",
            ActionDescriptor::new("Change scene", "Scenes", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let Some(scene) = p.text("sceneName") {
                    ctx.world_mut().load_scene(scene);
                }
                Ok(())
            })
            .describe("Load a different scene")
            .param(ParamSpec::new("sceneName", ParamKind::Scene).label("Scene").required()),
        ),
        (
            "restartScene",
            ActionDescriptor::new("Restart scene", "Scenes", |_: &Params, ctx: &mut RuleContext<'_>| {
                ctx.world_mut().restart_scene();
                Ok(())
            })
            .describe("Reload the current scene"),
        ),
        (
            "setGlobalVariable",
            ActionDescriptor::new("Set global variable", "Scenes", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let (Some(name), Some(value)) = (p.text("variableName"), p.get("value")) {
                    ctx.world_mut().set_global_variable(name, value.clone());
                }
                Ok(())
            })
            .describe("Set a variable that persists across scenes")
            .param(ParamSpec::new("variableName", ParamKind::Text).label("Variable name").required())
            .param(ParamSpec::new("value", ParamKind::Text).label("Value").required()),
        ),
        (
            "addToGlobalVariable",
            ActionDescriptor::new("Add to global variable", "Scenes", |p: &Params, ctx: &mut RuleContext<'_>| {
                if let (Some(name), Some(amount)) = (p.text("variableName"), p.number("amount")) {
                    ctx.world_mut().add_to_global_variable(name, amount);
                }
                Ok(())
            })
            .describe("Add a value to a global variable")
            .param(ParamSpec::new("variableName", ParamKind::Text).label("Variable name").required())
            .param(number_param("amount", "Amount")),
        ),
        // === Advanced ===
        (
            "customScript",
            ActionDescriptor::new("Run custom script", "Advanced", |p: &Params, ctx: &mut RuleContext<'_>| {
                let code = p.require_text("code")?;
                ctx.world_mut().run_script(code)
            })
            .describe("Execute host script code (advanced)")
            .param(ParamSpec::new("code", ParamKind::Code).label("Script").required()),
        ),
    ]
}

fn create_object(params: &Params, ctx: &mut RuleContext<'_>) -> BehaviorResult<()> {
    let (Some(kind), Some(x), Some(y)) = (params.text("objectType"), params.number("x"), params.number("y")) else {
        return Ok(());
    };
    let layer = params.text_or("layer", "entities");
    ctx.world_mut().spawn_entity(kind, Vec2::new(x, y), layer);
    Ok(())
}

fn destroy_object(params: &Params, ctx: &mut RuleContext<'_>) -> BehaviorResult<()> {
    match pick(params, ctx) {
        Target::Entity(id) => ctx.world_mut().destroy_entity(id),
        Target::Kind(kind) => ctx.world_mut().destroy_all_of_kind(&kind),
        Target::Nothing => {}
    }
    Ok(())
}

fn set_visibility(params: &Params, ctx: &mut RuleContext<'_>, visible: bool) -> BehaviorResult<()> {
    match pick(params, ctx) {
        Target::Entity(id) => ctx.world_mut().set_visible(id, visible),
        Target::Kind(kind) => ctx.world_mut().set_kind_visible(&kind, visible),
        Target::Nothing => {}
    }
    Ok(())
}
