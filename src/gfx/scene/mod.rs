//! # Scene Management Module
//!
//! The scenegraph: a tree of named nodes, each with a local transform and a
//! cached world transform, plus the shared mesh table that model nodes draw.
//!
//! ## Key Components
//!
//! - [`SceneGraph`] - Node arena, lookup, traversal and transform propagation
//! - [`SceneNode`] - A generic or model node in the hierarchy
//! - [`SceneBuilder`] - Builds a graph from a JSON [`SceneConfig`]
//! - [`Renderable`] - Per-model-node draw state (mesh, world placement, draw mode)
//! - [`transform`] - Decoding of declarative translation/rotation/scale blocks
//!
//! ## Usage
//!
//! ```no_run
//! use arbor::gfx::scene::{DrawLog, DrawMode, SceneBuilder};
//!
//! let mut graph = SceneBuilder::load("assets/scene.json", DrawMode::Triangles)?;
//! let arm = graph.get_node("arm")?;
//! graph.set_transformation(arm, cgmath::Matrix4::from_angle_z(cgmath::Deg(30.0)));
//!
//! let mut draws = DrawLog::default();
//! graph.render(&mut draws);
//! # Ok::<(), arbor::SceneError>(())
//! ```

pub mod builder;
pub mod config;
pub mod graph;
pub mod node;
pub mod renderable;
pub mod transform;

// Re-export main types
pub use builder::SceneBuilder;
pub use config::{ModelConfig, NodeConfig, SceneConfig};
pub use graph::{SceneGraph, SceneStatistics};
pub use node::{NodeContent, NodeId, NodeKind, SceneNode};
pub use renderable::{
    transform_bind_group_layout, DrawCall, DrawLog, DrawMode, DrawRenderable, RecordedDraw,
    RenderPassTarget, RenderTarget, Renderable,
};
pub use transform::TransformDesc;
