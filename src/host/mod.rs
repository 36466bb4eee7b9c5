//! Reference host world.
//!
//! - [`SceneState`]: every [`GameWorld`](crate::context::GameWorld) port in
//!   memory, with O(1) checkpoints
//! - [`PortCall`]: the log entry for one effect-port invocation

mod scene;

pub use scene::{PortCall, SceneState};
