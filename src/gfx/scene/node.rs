use std::fmt;

use cgmath::{Matrix4, SquareMatrix};
use serde::{Deserialize, Serialize};

use super::renderable::Renderable;

/// Stable index of a node inside its [`SceneGraph`](super::SceneGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node type discriminant, as written in the scene document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Organizational node with no geometry (`"node"` in the document).
    #[serde(rename = "node")]
    Generic,
    Model,
}

/// What a node carries besides its transform.
pub enum NodeContent {
    Generic,
    Model {
        /// Key into the graph's model table.
        model: String,
        renderable: Renderable,
    },
}

/// A named node in the scene hierarchy.
///
/// `world` is a cache owned by the graph: it is refreshed whenever this node's
/// or an ancestor's local transform changes, and is never set directly.
pub struct SceneNode {
    name: String,
    pub(crate) local: Matrix4<f32>,
    pub(crate) world: Matrix4<f32>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) content: NodeContent,
}

impl SceneNode {
    pub fn generic(name: impl Into<String>, local: Matrix4<f32>) -> Self {
        Self::with_content(name, local, NodeContent::Generic)
    }

    pub fn model(
        name: impl Into<String>,
        local: Matrix4<f32>,
        model: impl Into<String>,
        renderable: Renderable,
    ) -> Self {
        Self::with_content(
            name,
            local,
            NodeContent::Model {
                model: model.into(),
                renderable,
            },
        )
    }

    fn with_content(name: impl Into<String>, local: Matrix4<f32>, content: NodeContent) -> Self {
        Self {
            name: name.into(),
            local,
            world: Matrix4::identity(),
            parent: None,
            children: Vec::new(),
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        match self.content {
            NodeContent::Generic => NodeKind::Generic,
            NodeContent::Model { .. } => NodeKind::Model,
        }
    }

    pub fn is_model(&self) -> bool {
        self.kind() == NodeKind::Model
    }

    pub fn local_transform(&self) -> &Matrix4<f32> {
        &self.local
    }

    pub fn world_transform(&self) -> &Matrix4<f32> {
        &self.world
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Model table key for model nodes.
    pub fn model_name(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Model { model, .. } => Some(model),
            NodeContent::Generic => None,
        }
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        match &self.content {
            NodeContent::Model { renderable, .. } => Some(renderable),
            NodeContent::Generic => None,
        }
    }

    pub(crate) fn renderable_mut(&mut self) -> Option<&mut Renderable> {
        match &mut self.content {
            NodeContent::Model { renderable, .. } => Some(renderable),
            NodeContent::Generic => None,
        }
    }

    /// Stores a freshly computed world transform and mirrors it to the renderable.
    pub(crate) fn set_world(&mut self, world: Matrix4<f32>) {
        self.world = world;
        if let Some(renderable) = self.renderable_mut() {
            renderable.set_world_transform(world);
        }
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("model", &self.model_name())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish()
    }
}
