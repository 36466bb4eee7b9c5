//! The host world boundary.
//!
//! [`GameWorld`] is everything the rule engine may read from or do to the
//! running game. The host implements it over its own entity store, physics,
//! audio, camera and scene systems.
//!
//! Only entity lookup and the variable store are required. Every other port
//! has a default that behaves like an absent subsystem: queries answer
//! "no"/`None` and effects do nothing. A host without audio simply does not
//! override the audio ports.

use serde::{Deserialize, Serialize};

use crate::core::{BehaviorError, BehaviorResult, EntityId, ParamValue};

/// 2D vector used for positions, velocities and forces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Construct a vector from components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Read-only view of one entity, as returned by entity queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    /// Object type name (`"coin"`, `"enemy"`).
    pub kind: String,
    pub position: Vec2,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scale: f64,
    pub visible: bool,
}

impl EntityView {
    /// A visible, unrotated, unscaled entity.
    pub fn new(id: EntityId, kind: impl Into<String>, position: Vec2) -> Self {
        Self {
            id,
            kind: kind.into(),
            position,
            rotation: 0.0,
            scale: 1.0,
            visible: true,
        }
    }
}

/// The two entities matched by a collision predicate.
///
/// `subject` is the entity from the predicate's first object parameter
/// ("collision self"), `other` the one it collided with ("collision other").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionPair {
    pub subject: EntityId,
    pub other: EntityId,
}

impl CollisionPair {
    /// Create a pair.
    #[must_use]
    pub const fn new(subject: EntityId, other: EntityId) -> Self {
        Self { subject, other }
    }
}

/// Mouse buttons known to the input ports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Parse an editor button name; unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "left" => Some(MouseButton::Left),
            "right" => Some(MouseButton::Right),
            "middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Options for a one-shot sound.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoundOptions {
    pub volume: f64,
}

/// Options for background music.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MusicOptions {
    pub looped: bool,
    pub volume: f64,
}

/// Options for a particle burst.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleOptions {
    pub count: u32,
    pub color: String,
}

/// World-state accessors and effect ports supplied by the host.
///
/// Durations passed to ports are in milliseconds.
pub trait GameWorld {
    // === Entity queries ===

    /// All entities of a kind, in a stable order.
    fn entities_of_kind(&self, kind: &str) -> Vec<EntityView>;

    /// Look up one entity.
    fn entity(&self, id: EntityId) -> Option<EntityView>;

    /// Check whether an entity still exists.
    fn entity_exists(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    /// Number of entities of a kind.
    fn count_of_kind(&self, kind: &str) -> usize {
        self.entities_of_kind(kind).len()
    }

    // === Scene variables ===

    /// Read a scene variable.
    fn variable(&self, name: &str) -> Option<ParamValue>;

    /// Write a scene variable.
    fn set_variable(&mut self, name: &str, value: ParamValue);

    /// Add to a numeric variable. A missing or non-numeric variable counts as 0.
    fn add_to_variable(&mut self, name: &str, amount: f64) {
        let current = self.variable(name).and_then(|v| v.as_number()).unwrap_or(0.0);
        self.set_variable(name, ParamValue::Number(current + amount));
    }

    /// Multiply a numeric variable. A missing or non-numeric variable counts as 0.
    fn multiply_variable(&mut self, name: &str, factor: f64) {
        let current = self.variable(name).and_then(|v| v.as_number()).unwrap_or(0.0);
        self.set_variable(name, ParamValue::Number(current * factor));
    }

    /// Flip a boolean variable. A missing variable counts as false.
    fn toggle_variable(&mut self, name: &str) {
        let current = self.variable(name).is_some_and(|v| v.is_truthy());
        self.set_variable(name, ParamValue::Bool(!current));
    }

    // === Global (cross-scene) variables ===

    fn global_variable(&self, _name: &str) -> Option<ParamValue> {
        None
    }

    fn set_global_variable(&mut self, _name: &str, _value: ParamValue) {}

    fn add_to_global_variable(&mut self, name: &str, amount: f64) {
        let current = self.global_variable(name).and_then(|v| v.as_number()).unwrap_or(0.0);
        self.set_global_variable(name, ParamValue::Number(current + amount));
    }

    // === Timers ===

    /// Milliseconds since a named timer was started, if it is running.
    fn timer_elapsed(&self, _name: &str) -> Option<u64> {
        None
    }

    fn start_timer(&mut self, _name: &str) {}

    fn reset_timer(&mut self, _name: &str) {}

    // === Scene ===

    /// Milliseconds since the current scene started.
    fn elapsed_time(&self) -> u64 {
        0
    }

    /// True on the first frame of a scene.
    fn is_scene_start(&self) -> bool {
        false
    }

    fn current_scene(&self) -> Option<String> {
        None
    }

    fn load_scene(&mut self, _name: &str) {}

    /// Reload the current scene.
    fn restart_scene(&mut self) {
        if let Some(name) = self.current_scene() {
            self.load_scene(&name);
        }
    }

    // === Collision, physics, animation ===

    fn is_colliding(&self, _a: EntityId, _b: EntityId) -> bool {
        false
    }

    fn is_grounded(&self, _id: EntityId) -> bool {
        false
    }

    fn velocity(&self, _id: EntityId) -> Option<Vec2> {
        None
    }

    fn set_velocity(&mut self, _id: EntityId, _velocity: Vec2) {}

    fn apply_force(&mut self, _id: EntityId, _force: Vec2) {}

    /// With `animation = None`, asks about whatever animation is current.
    fn is_animation_finished(&self, _id: EntityId, _animation: Option<&str>) -> bool {
        false
    }

    // === Input ===

    fn is_key_down(&self, _key: &str) -> bool {
        false
    }

    fn was_key_released(&self, _key: &str) -> bool {
        false
    }

    fn was_key_just_pressed(&self, _key: &str) -> bool {
        false
    }

    fn was_mouse_clicked(&self, _button: MouseButton) -> bool {
        false
    }

    // === Entity effects ===

    /// Spawn an entity. Returns its ID if the host created one.
    fn spawn_entity(&mut self, _kind: &str, _position: Vec2, _layer: &str) -> Option<EntityId> {
        None
    }

    fn destroy_entity(&mut self, _id: EntityId) {}

    fn destroy_all_of_kind(&mut self, kind: &str) {
        for entity in self.entities_of_kind(kind) {
            self.destroy_entity(entity.id);
        }
    }

    fn set_visible(&mut self, _id: EntityId, _visible: bool) {}

    fn set_kind_visible(&mut self, kind: &str, visible: bool) {
        for entity in self.entities_of_kind(kind) {
            self.set_visible(entity.id, visible);
        }
    }

    fn set_position(&mut self, _id: EntityId, _position: Vec2) {}

    fn set_rotation(&mut self, _id: EntityId, _degrees: f64) {}

    fn set_scale(&mut self, _id: EntityId, _scale: f64) {}

    // === Audio, camera, presentation ===

    fn play_sound(&mut self, _sound: &str, _options: SoundOptions) {}

    fn play_music(&mut self, _music: &str, _options: MusicOptions) {}

    fn stop_music(&mut self) {}

    fn show_message(&mut self, _text: &str, _duration_ms: u64) {}

    fn shake_camera(&mut self, _intensity: f64, _duration_ms: u64) {}

    fn pan_camera(&mut self, _target: Vec2, _duration_ms: u64) {}

    fn zoom_camera(&mut self, _zoom: f64, _duration_ms: u64) {}

    fn emit_particles(&mut self, _at: Vec2, _options: ParticleOptions) {}

    fn flash_screen(&mut self, _color: &str, _duration_ms: u64) {}

    /// Forward a rule log line to the host's in-game console.
    fn console_log(&mut self, _message: &str) {}

    // === Script escape hatch ===
    //
    // Sandboxing is the host's responsibility.

    /// Evaluate host-supplied predicate code.
    fn eval_script(&self, _code: &str) -> BehaviorResult<bool> {
        Err(BehaviorError::Unsupported("script evaluation"))
    }

    /// Run host-supplied effect code.
    fn run_script(&mut self, _code: &str) -> BehaviorResult<()> {
        Err(BehaviorError::Unsupported("script execution"))
    }
}
