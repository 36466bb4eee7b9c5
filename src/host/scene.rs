//! In-memory reference world.
//!
//! [`SceneState`] implements every [`GameWorld`] port over plain data and
//! records each effect-port call as a [`PortCall`]. Tests, benchmarks and
//! headless hosts (servers, replay tools) use it directly; game hosts use it
//! as a model for their own implementation.
//!
//! ## Checkpoints
//!
//! Entities and scene variables live in `im` persistent maps, so
//! [`SceneState::checkpoint`] is O(1). `restart_scene` restores the last
//! checkpoint; global variables survive restarts.
//!
//! ## Frames
//!
//! Per-frame input (just-pressed keys, released keys, mouse clicks) and the
//! scene-start flag hold until [`SceneState::end_frame`].

use im::{HashMap as ImHashMap, HashSet as ImHashSet, OrdMap, Vector};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::context::{
    EntityView, GameWorld, MouseButton, MusicOptions, ParticleOptions, SoundOptions, Vec2,
};
use crate::core::{BehaviorError, BehaviorResult, EntityId, ParamValue};

/// A recorded effect-port call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PortCall {
    Spawn { id: EntityId, kind: String, position: Vec2, layer: String },
    Destroy(EntityId),
    SetVisible { id: EntityId, visible: bool },
    SetPosition { id: EntityId, position: Vec2 },
    SetRotation { id: EntityId, degrees: f64 },
    SetScale { id: EntityId, scale: f64 },
    SetVelocity { id: EntityId, velocity: Vec2 },
    ApplyForce { id: EntityId, force: Vec2 },
    PlaySound { sound: String, volume: f64 },
    PlayMusic { music: String, looped: bool, volume: f64 },
    StopMusic,
    ShowMessage { text: String, duration_ms: u64 },
    ShakeCamera { intensity: f64, duration_ms: u64 },
    PanCamera { target: Vec2, duration_ms: u64 },
    ZoomCamera { zoom: f64, duration_ms: u64 },
    EmitParticles { at: Vec2, count: u32, color: String },
    FlashScreen { color: String, duration_ms: u64 },
    StartTimer(String),
    ResetTimer(String),
    LoadScene(String),
    ConsoleLog(String),
    RunScript(String),
}

/// State restored by `restart_scene`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Checkpoint {
    entities: OrdMap<EntityId, EntityView>,
    variables: ImHashMap<String, ParamValue>,
    next_id: EntityId,
}

/// Headless world with every port implemented in memory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneState {
    // === Scene content ===
    entities: OrdMap<EntityId, EntityView>,
    next_id: EntityId,
    variables: ImHashMap<String, ParamValue>,
    globals: FxHashMap<String, ParamValue>,

    // === Simulation state ===
    collisions: ImHashSet<(EntityId, EntityId)>,
    grounded: FxHashSet<EntityId>,
    velocities: FxHashMap<EntityId, Vec2>,
    finished_current: FxHashSet<EntityId>,
    finished_named: FxHashSet<(EntityId, String)>,
    timers: FxHashMap<String, u64>,

    // === Input ===
    keys_down: FxHashSet<String>,
    keys_just_pressed: FxHashSet<String>,
    keys_released: FxHashSet<String>,
    mouse_clicks: FxHashSet<MouseButton>,

    // === Scene clock ===
    scene: Option<String>,
    scene_start: bool,
    elapsed_ms: u64,

    // === Bookkeeping ===
    calls: Vector<PortCall>,
    checkpoint: Option<Checkpoint>,
    scripts_enabled: bool,
}

fn pair_key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl SceneState {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the current scene and flag its first frame (builder pattern).
    #[must_use]
    pub fn with_scene(mut self, name: impl Into<String>) -> Self {
        self.scene = Some(name.into());
        self.scene_start = true;
        self
    }

    /// Accept script ports, recording them instead of failing (builder pattern).
    #[must_use]
    pub fn with_scripts(mut self) -> Self {
        self.scripts_enabled = true;
        self
    }

    // === Scene setup (not recorded) ===

    /// Add an entity at a position. Returns its ID.
    pub fn spawn(&mut self, kind: impl Into<String>, position: Vec2) -> EntityId {
        let id = self.next_id;
        self.next_id = id.next();
        self.entities.insert(id, EntityView::new(id, kind, position));
        id
    }

    /// Add a fully specified entity, replacing any entity with the same ID.
    pub fn insert_entity(&mut self, view: EntityView) {
        if view.id >= self.next_id {
            self.next_id = view.id.next();
        }
        self.entities.insert(view.id, view);
    }

    /// Number of entities in the scene.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Declare whether two entities touch.
    pub fn set_colliding(&mut self, a: EntityId, b: EntityId, colliding: bool) {
        if colliding {
            self.collisions.insert(pair_key(a, b));
        } else {
            self.collisions.remove(&pair_key(a, b));
        }
    }

    /// Declare whether an entity stands on the ground.
    pub fn set_grounded(&mut self, id: EntityId, grounded: bool) {
        if grounded {
            self.grounded.insert(id);
        } else {
            self.grounded.remove(&id);
        }
    }

    /// Mark an animation as finished. `None` marks the current animation.
    pub fn finish_animation(&mut self, id: EntityId, animation: Option<&str>) {
        match animation {
            Some(name) => {
                self.finished_named.insert((id, name.to_string()));
            }
            None => {
                self.finished_current.insert(id);
            }
        }
    }

    /// Press a key: it is down, and just pressed until the frame ends.
    pub fn press_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.keys_just_pressed.insert(key.clone());
        self.keys_down.insert(key);
    }

    /// Release a key: no longer down, and released until the frame ends.
    pub fn release_key(&mut self, key: &str) {
        self.keys_down.remove(key);
        self.keys_released.insert(key.to_string());
    }

    /// Register a mouse click for this frame.
    pub fn click(&mut self, button: MouseButton) {
        self.mouse_clicks.insert(button);
    }

    /// Advance the scene clock.
    pub fn advance(&mut self, ms: u64) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
    }

    /// Clear per-frame input and the scene-start flag.
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_released.clear();
        self.mouse_clicks.clear();
        self.scene_start = false;
    }

    // === Checkpoints ===

    /// Remember the current entities and variables for `restart_scene`.
    pub fn checkpoint(&mut self) {
        self.checkpoint = Some(Checkpoint {
            entities: self.entities.clone(),
            variables: self.variables.clone(),
            next_id: self.next_id,
        });
    }

    // === Call log ===

    /// Every effect-port call so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &Vector<PortCall> {
        &self.calls
    }

    /// Take the call log, leaving it empty.
    pub fn take_calls(&mut self) -> Vec<PortCall> {
        std::mem::take(&mut self.calls).into_iter().collect()
    }

    fn record(&mut self, call: PortCall) {
        self.calls.push_back(call);
    }

    fn update_entity(&mut self, id: EntityId, f: impl FnOnce(&mut EntityView)) {
        if let Some(view) = self.entities.get_mut(&id) {
            f(view);
        }
    }
}

impl GameWorld for SceneState {
    fn entities_of_kind(&self, kind: &str) -> Vec<EntityView> {
        self.entities.values().filter(|e| e.kind == kind).cloned().collect()
    }

    fn entity(&self, id: EntityId) -> Option<EntityView> {
        self.entities.get(&id).cloned()
    }

    fn entity_exists(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    fn count_of_kind(&self, kind: &str) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    fn variable(&self, name: &str) -> Option<ParamValue> {
        self.variables.get(name).cloned()
    }

    fn set_variable(&mut self, name: &str, value: ParamValue) {
        self.variables.insert(name.to_string(), value);
    }

    fn global_variable(&self, name: &str) -> Option<ParamValue> {
        self.globals.get(name).cloned()
    }

    fn set_global_variable(&mut self, name: &str, value: ParamValue) {
        self.globals.insert(name.to_string(), value);
    }

    fn timer_elapsed(&self, name: &str) -> Option<u64> {
        self.timers.get(name).map(|start| self.elapsed_ms.saturating_sub(*start))
    }

    fn start_timer(&mut self, name: &str) {
        self.timers.insert(name.to_string(), self.elapsed_ms);
        self.record(PortCall::StartTimer(name.to_string()));
    }

    fn reset_timer(&mut self, name: &str) {
        self.timers.insert(name.to_string(), self.elapsed_ms);
        self.record(PortCall::ResetTimer(name.to_string()));
    }

    fn elapsed_time(&self) -> u64 {
        self.elapsed_ms
    }

    fn is_scene_start(&self) -> bool {
        self.scene_start
    }

    fn current_scene(&self) -> Option<String> {
        self.scene.clone()
    }

    /// Switches the scene name and restarts the clock. Entities are left to
    /// the host to repopulate.
    fn load_scene(&mut self, name: &str) {
        self.scene = Some(name.to_string());
        self.scene_start = true;
        self.elapsed_ms = 0;
        self.timers.clear();
        self.record(PortCall::LoadScene(name.to_string()));
    }

    fn restart_scene(&mut self) {
        if let Some(checkpoint) = self.checkpoint.clone() {
            self.entities = checkpoint.entities;
            self.variables = checkpoint.variables;
            self.next_id = checkpoint.next_id;
        }
        self.collisions.clear();
        self.velocities.clear();
        let name = self.scene.clone().unwrap_or_default();
        self.load_scene(&name);
    }

    fn is_colliding(&self, a: EntityId, b: EntityId) -> bool {
        self.collisions.contains(&pair_key(a, b))
    }

    fn is_grounded(&self, id: EntityId) -> bool {
        self.grounded.contains(&id)
    }

    fn velocity(&self, id: EntityId) -> Option<Vec2> {
        self.velocities.get(&id).copied()
    }

    fn set_velocity(&mut self, id: EntityId, velocity: Vec2) {
        self.velocities.insert(id, velocity);
        self.record(PortCall::SetVelocity { id, velocity });
    }

    fn apply_force(&mut self, id: EntityId, force: Vec2) {
        let velocity = self.velocities.entry(id).or_default();
        velocity.x += force.x;
        velocity.y += force.y;
        self.record(PortCall::ApplyForce { id, force });
    }

    fn is_animation_finished(&self, id: EntityId, animation: Option<&str>) -> bool {
        match animation {
            Some(name) => self.finished_named.contains(&(id, name.to_string())),
            None => self.finished_current.contains(&id),
        }
    }

    fn is_key_down(&self, key: &str) -> bool {
        self.keys_down.contains(key)
    }

    fn was_key_released(&self, key: &str) -> bool {
        self.keys_released.contains(key)
    }

    fn was_key_just_pressed(&self, key: &str) -> bool {
        self.keys_just_pressed.contains(key)
    }

    fn was_mouse_clicked(&self, button: MouseButton) -> bool {
        self.mouse_clicks.contains(&button)
    }

    fn spawn_entity(&mut self, kind: &str, position: Vec2, layer: &str) -> Option<EntityId> {
        let id = self.spawn(kind, position);
        self.record(PortCall::Spawn {
            id,
            kind: kind.to_string(),
            position,
            layer: layer.to_string(),
        });
        Some(id)
    }

    fn destroy_entity(&mut self, id: EntityId) {
        self.entities.remove(&id);
        self.velocities.remove(&id);
        self.grounded.remove(&id);
        self.record(PortCall::Destroy(id));
    }

    fn set_visible(&mut self, id: EntityId, visible: bool) {
        self.update_entity(id, |e| e.visible = visible);
        self.record(PortCall::SetVisible { id, visible });
    }

    fn set_position(&mut self, id: EntityId, position: Vec2) {
        self.update_entity(id, |e| e.position = position);
        self.record(PortCall::SetPosition { id, position });
    }

    fn set_rotation(&mut self, id: EntityId, degrees: f64) {
        self.update_entity(id, |e| e.rotation = degrees);
        self.record(PortCall::SetRotation { id, degrees });
    }

    fn set_scale(&mut self, id: EntityId, scale: f64) {
        self.update_entity(id, |e| e.scale = scale);
        self.record(PortCall::SetScale { id, scale });
    }

    fn play_sound(&mut self, sound: &str, options: SoundOptions) {
        self.record(PortCall::PlaySound {
            sound: sound.to_string(),
            volume: options.volume,
        });
    }

    fn play_music(&mut self, music: &str, options: MusicOptions) {
        self.record(PortCall::PlayMusic {
            music: music.to_string(),
            looped: options.looped,
            volume: options.volume,
        });
    }

    fn stop_music(&mut self) {
        self.record(PortCall::StopMusic);
    }

    fn show_message(&mut self, text: &str, duration_ms: u64) {
        self.record(PortCall::ShowMessage {
            text: text.to_string(),
            duration_ms,
        });
    }

    fn shake_camera(&mut self, intensity: f64, duration_ms: u64) {
        self.record(PortCall::ShakeCamera { intensity, duration_ms });
    }

    fn pan_camera(&mut self, target: Vec2, duration_ms: u64) {
        self.record(PortCall::PanCamera { target, duration_ms });
    }

    fn zoom_camera(&mut self, zoom: f64, duration_ms: u64) {
        self.record(PortCall::ZoomCamera { zoom, duration_ms });
    }

    fn emit_particles(&mut self, at: Vec2, options: ParticleOptions) {
        self.record(PortCall::EmitParticles {
            at,
            count: options.count,
            color: options.color,
        });
    }

    fn flash_screen(&mut self, color: &str, duration_ms: u64) {
        self.record(PortCall::FlashScreen {
            color: color.to_string(),
            duration_ms,
        });
    }

    fn console_log(&mut self, message: &str) {
        self.record(PortCall::ConsoleLog(message.to_string()));
    }

    /// With scripts enabled, any non-empty code is truthy.
    fn eval_script(&self, code: &str) -> BehaviorResult<bool> {
        if !self.scripts_enabled {
            return Err(BehaviorError::Unsupported("script evaluation"));
        }
        Ok(!code.trim().is_empty())
    }

    fn run_script(&mut self, code: &str) -> BehaviorResult<()> {
        if !self.scripts_enabled {
            return Err(BehaviorError::Unsupported("script execution"));
        }
        self.record(PortCall::RunScript(code.to_string()));
        Ok(())
    }
}
