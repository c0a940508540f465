//! # Graphics Module
//!
//! Everything between a scene document on disk and the draw calls a backend
//! issues each frame.
//!
//! ## Architecture Overview
//!
//! - **Meshes** ([`mesh`]) - Text mesh parsing and normalization
//! - **Scene Management** ([`scene`]) - Node hierarchy, world transforms, scene building
//! - **Camera System** ([`camera`]) - Free camera and input-driven controller
//!
//! ## Usage
//!
//! ```no_run
//! use arbor::gfx::scene::{DrawLog, DrawMode, SceneBuilder};
//!
//! let graph = SceneBuilder::load("assets/scene.json", DrawMode::Triangles)?;
//! let mut draws = DrawLog::default();
//! graph.render(&mut draws);
//! # Ok::<(), arbor::SceneError>(())
//! ```

pub mod camera;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use camera::FreeCamera;
pub use scene::SceneGraph;
