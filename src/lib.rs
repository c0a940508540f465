// src/lib.rs
//! Arbor scenegraph viewer core
//!
//! Loads text meshes, assembles them into a named node hierarchy described by
//! a JSON scene document, keeps every node's world transform consistent with
//! its ancestors, and hands per-node draw calls to a rendering backend.

pub mod app;
pub mod error;
pub mod gfx;
pub mod input;

// Re-export main types for convenience
pub use app::{ManipulationMode, Viewer, ViewerSettings};
pub use error::{SceneError, SceneResult};
pub use gfx::mesh::Mesh;
pub use gfx::scene::{DrawMode, NodeId, SceneBuilder, SceneGraph, SceneNode};
pub use input::{InputDelta, InputState};

/// Initializes `env_logger` for hosts that do not install their own logger.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
