use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use cgmath::Matrix4;
use log::{debug, info, warn};

use super::config::{ModelConfig, NodeConfig, SceneConfig};
use super::graph::SceneGraph;
use super::node::{NodeId, NodeKind, SceneNode};
use super::renderable::{DrawMode, Renderable};
use super::transform;
use crate::error::{SceneError, SceneResult};
use crate::gfx::mesh::{self, Mesh};

/// Builds a [`SceneGraph`] from a [`SceneConfig`].
///
/// Building is all-or-nothing: any error leaves nothing behind, so a caller
/// holding a previous scene can keep using it.
pub struct SceneBuilder {
    base_dir: PathBuf,
    draw_mode: DrawMode,
}

impl SceneBuilder {
    /// `base_dir` is the directory relative mesh paths are resolved against.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            draw_mode: DrawMode::default(),
        }
    }

    /// Draw mode given to every model node's renderable.
    pub fn with_draw_mode(mut self, draw_mode: DrawMode) -> Self {
        self.draw_mode = draw_mode;
        self
    }

    /// Reads a scene document and builds it, resolving mesh paths against the
    /// document's directory.
    pub fn load(path: impl AsRef<Path>, draw_mode: DrawMode) -> SceneResult<SceneGraph> {
        let path = path.as_ref();
        info!("Loading scene {}", path.display());

        let config = SceneConfig::from_path(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::new(base_dir).with_draw_mode(draw_mode).build(&config)
    }

    pub fn build(&self, config: &SceneConfig) -> SceneResult<SceneGraph> {
        let models = self.load_models(&config.models)?;
        self.build_with_models(&config.scenegraph, models)
    }

    /// Loads every declared mesh once. When two entries share a name the
    /// later one wins.
    pub fn load_models(&self, models: &[ModelConfig]) -> SceneResult<HashMap<String, Rc<Mesh>>> {
        let mut table = HashMap::with_capacity(models.len());
        for model in models {
            let path = self.resolve(&model.path);
            let mesh = mesh::load_file(&path)?;
            if table.insert(model.name.clone(), Rc::new(mesh)).is_some() {
                warn!(
                    "Model '{}' declared more than once, using {}",
                    model.name,
                    path.display()
                );
            }
        }
        Ok(table)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Builds the node tree rooted at `root` over an already loaded model table.
    pub fn build_with_models(
        &self,
        root: &NodeConfig,
        models: HashMap<String, Rc<Mesh>>,
    ) -> SceneResult<SceneGraph> {
        validate(root, &models)?;

        let root_local = transform::decode(&root.transformation)?;
        let mut graph = SceneGraph::new(SceneNode::generic(&root.name, root_local), models)?;
        let root_id = graph.root();

        for child in &root.children {
            self.build_node(&mut graph, root_id, child)?;
        }

        // Re-derive every world transform from the root once the tree is complete.
        graph.set_transformation(root_id, root_local);

        let stats = graph.statistics();
        info!(
            "Built scene '{}': {} nodes, {} model nodes, {} meshes",
            root.name, stats.node_count, stats.model_node_count, stats.model_count
        );
        Ok(graph)
    }

    fn build_node(
        &self,
        graph: &mut SceneGraph,
        parent: NodeId,
        desc: &NodeConfig,
    ) -> SceneResult<NodeId> {
        let local = transform::decode(&desc.transformation)?;
        let node = self.instantiate(graph, desc, local)?;

        let id = graph.insert(node);
        graph.add_child(parent, id)?;
        debug!("Added node '{}' ({:?}) under {}", desc.name, desc.kind, parent);

        for child in &desc.children {
            self.build_node(graph, id, child)?;
        }
        Ok(id)
    }

    fn instantiate(
        &self,
        graph: &SceneGraph,
        desc: &NodeConfig,
        local: Matrix4<f32>,
    ) -> SceneResult<SceneNode> {
        match (desc.kind, desc.content.as_deref()) {
            (NodeKind::Generic, _) => Ok(SceneNode::generic(&desc.name, local)),
            (NodeKind::Model, Some(model)) => {
                let mesh = graph
                    .model(model)
                    .ok_or_else(|| model_not_found(desc, model))?;
                let renderable = Renderable::new(Rc::clone(mesh), self.draw_mode);
                Ok(SceneNode::model(&desc.name, local, model, renderable))
            }
            (NodeKind::Model, None) => Err(missing_content(desc)),
        }
    }
}

/// Checks the whole description before any node is created.
fn validate(root: &NodeConfig, models: &HashMap<String, Rc<Mesh>>) -> SceneResult<()> {
    if root.kind != NodeKind::Generic {
        return Err(SceneError::InvalidNode {
            node: root.name.clone(),
            reason: "the scenegraph root must be of type \"node\"".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for node in root.walk() {
        match (node.kind, node.content.as_deref()) {
            (NodeKind::Model, Some(model)) if !models.contains_key(model) => {
                return Err(model_not_found(node, model));
            }
            (NodeKind::Model, None) => return Err(missing_content(node)),
            (NodeKind::Generic, Some(_)) => {
                return Err(SceneError::InvalidNode {
                    node: node.name.clone(),
                    reason: "only model nodes may have content".to_string(),
                });
            }
            _ => {}
        }

        if !seen.insert(node.name.as_str()) {
            warn!(
                "Duplicate node name '{}'; lookups return the first match",
                node.name
            );
        }
    }
    Ok(())
}

fn model_not_found(desc: &NodeConfig, model: &str) -> SceneError {
    SceneError::ModelNotFound {
        node: desc.name.clone(),
        model: model.to_string(),
    }
}

fn missing_content(desc: &NodeConfig) -> SceneError {
    SceneError::InvalidNode {
        node: desc.name.clone(),
        reason: "model node has no content".to_string(),
    }
}
