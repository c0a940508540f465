use std::collections::HashMap;
use std::rc::Rc;

use cgmath::{Matrix4, SquareMatrix};
use log::debug;

use super::node::{NodeId, SceneNode};
use super::renderable::{DrawCall, DrawMode, RenderTarget};
use crate::error::{SceneError, SceneResult};
use crate::gfx::mesh::Mesh;

/// Tree of named nodes with cached world transforms, plus the mesh table the
/// model nodes draw from.
///
/// Nodes live in a flat arena and refer to each other by [`NodeId`]. A
/// `NodeId` is only meaningful for the graph that issued it; passing a foreign
/// id panics on out-of-range access.
///
/// After every mutating call returns, each node's world transform equals its
/// parent's world transform times its own local transform (the root's world
/// transform is its local transform).
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root: NodeId,
    models: HashMap<String, Rc<Mesh>>,
}

impl SceneGraph {
    /// Creates a graph holding only `root`, which must be a generic node.
    pub fn new(root: SceneNode, models: HashMap<String, Rc<Mesh>>) -> SceneResult<Self> {
        if root.is_model() {
            return Err(SceneError::InvalidNode {
                node: root.name().to_string(),
                reason: "the scene root must be a generic node".to_string(),
            });
        }
        let mut graph = Self {
            nodes: vec![root],
            root: NodeId(0),
            models,
        };
        graph.update_world_transforms(graph.root);
        Ok(graph)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn model(&self, name: &str) -> Option<&Rc<Mesh>> {
        self.models.get(name)
    }

    pub fn models(&self) -> &HashMap<String, Rc<Mesh>> {
        &self.models
    }

    /// Adds a detached node to the arena. Attach it with [`SceneGraph::add_child`].
    pub fn insert(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Makes `child` the last child of `parent`, linking both directions, and
    /// refreshes the world transforms of `child`'s subtree.
    ///
    /// Fails if `child` is the root, already has a parent, or is an ancestor
    /// of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let reject = |graph: &Self, reason: &str| SceneError::InvalidNode {
            node: graph.node(child).name().to_string(),
            reason: reason.to_string(),
        };

        if child == self.root {
            return Err(reject(self, "the root node cannot be attached as a child"));
        }
        if self.node(child).parent.is_some() {
            return Err(reject(self, "node already has a parent"));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(reject(self, "attaching would create a cycle"));
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.update_world_transforms(child);
        Ok(())
    }

    /// True if `ancestor` is `node` or lies on the path from `node` to its root.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Replaces the local transform of `id` and refreshes the world
    /// transforms of `id` and all of its descendants.
    pub fn set_transformation(&mut self, id: NodeId, local: Matrix4<f32>) {
        self.nodes[id.0].local = local;
        self.update_world_transforms(id);
    }

    /// Recomputes world transforms top-down for the subtree rooted at `id`,
    /// starting from the parent's cached world transform.
    fn update_world_transforms(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let parent_world = match self.nodes[current.0].parent {
                Some(parent) => self.nodes[parent.0].world,
                None => Matrix4::identity(),
            };
            let node = &mut self.nodes[current.0];
            let world = parent_world * node.local;
            node.set_world(world);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    pub fn world_transform(&self, id: NodeId) -> &Matrix4<f32> {
        self.node(id).world_transform()
    }

    /// Computes the world transform of `id` from scratch by walking up to the
    /// root, ignoring every cached value.
    pub fn compute_world_from_ancestors(&self, id: NodeId) -> Matrix4<f32> {
        let mut world = *self.node(id).local_transform();
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            world = *self.node(parent).local_transform() * world;
            current = self.node(parent).parent;
        }
        world
    }

    /// All nodes reachable from the root in depth-first pre-order: every node
    /// before its children, children in declaration order.
    pub fn get_nodes(&self) -> Vec<NodeId> {
        self.descendants(self.root)
    }

    /// `id` and its descendants in depth-first pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.node(current).children.iter().rev().copied());
        }
        order
    }

    /// First node named `name` in depth-first pre-order.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.get_nodes()
            .into_iter()
            .find(|&id| self.node(id).name() == name)
    }

    /// Like [`SceneGraph::find_node`], but a missing name is an error.
    pub fn get_node(&self, name: &str) -> SceneResult<NodeId> {
        self.find_node(name)
            .ok_or_else(|| SceneError::NodeNotFound(name.to_string()))
    }

    /// Issues one draw call per model node, in depth-first pre-order.
    pub fn render(&self, target: &mut impl RenderTarget) {
        for id in self.get_nodes() {
            let node = self.node(id);
            if let Some(renderable) = node.renderable() {
                target.draw(DrawCall {
                    node: node.name(),
                    renderable,
                });
            }
        }
    }

    /// Sets the draw mode of one model node. Generic nodes are left alone.
    pub fn set_draw_mode(&mut self, id: NodeId, mode: DrawMode) {
        if let Some(renderable) = self.nodes[id.0].renderable_mut() {
            renderable.set_draw_mode(mode);
        }
    }

    /// Applies `mode` to every model node in the tree.
    pub fn set_draw_mode_all(&mut self, mode: DrawMode) {
        for id in self.get_nodes() {
            self.set_draw_mode(id, mode);
        }
        debug!("Draw mode set to {:?} for all model nodes", mode);
    }

    /// Uploads geometry and transforms of every model node.
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) {
        for node in self.nodes.iter_mut() {
            if let Some(renderable) = node.renderable_mut() {
                renderable.init_gpu_resources(device, layout);
            }
        }
    }

    /// Writes every model node's world transform to its GPU uniform.
    pub fn update_all_transforms(&self, queue: &wgpu::Queue) {
        for node in &self.nodes {
            if let Some(renderable) = node.renderable() {
                renderable.update_transform(queue);
            }
        }
    }

    pub fn statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics {
            node_count: 0,
            model_node_count: 0,
            model_count: self.models.len(),
            total_vertices: 0,
            total_triangles: 0,
        };

        for id in self.get_nodes() {
            stats.node_count += 1;
            if let Some(renderable) = self.node(id).renderable() {
                stats.model_node_count += 1;
                stats.total_vertices += renderable.mesh().vertex_count();
                stats.total_triangles += renderable.mesh().triangle_count();
            }
        }
        stats
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub model_node_count: usize,
    /// Distinct meshes in the model table.
    pub model_count: usize,
    /// Vertices drawn per frame, counting shared meshes once per node.
    pub total_vertices: usize,
    pub total_triangles: usize,
}
