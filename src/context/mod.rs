//! The context adapter between rules and the host game.
//!
//! - [`GameWorld`]: host-implemented world accessors and effect ports
//! - [`RuleContext`]: what every predicate and effect receives
//! - [`ContextSnapshot`]: bindings captured for delayed actions

#[allow(clippy::module_inception)]
mod context;
mod world;

pub use context::{ContextSnapshot, EventBinding, RuleContext};
pub use world::{
    CollisionPair, EntityView, GameWorld, MouseButton, MusicOptions, ParticleOptions,
    SoundOptions, Vec2,
};
