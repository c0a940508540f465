//! # Scene Configuration
//!
//! Serde model of the JSON scene document:
//!
//! ```json
//! {
//!   "models": [{ "name": "bunny", "path": "meshes/bunny.obj" }],
//!   "scenegraph": {
//!     "name": "root",
//!     "type": "node",
//!     "transformation": { "translation": [0, 0, 0], "rotation": [0, 0, 0], "scale": [1, 1, 1] },
//!     "children": [
//!       { "name": "left", "type": "model", "content": "bunny",
//!         "transformation": { "translation": [-2, 0, 0] } }
//!     ]
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::node::NodeKind;
use super::transform::TransformDesc;
use crate::error::{SceneError, SceneResult};

/// Root of a scene document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SceneConfig {
    #[serde(default)]
    pub models: Vec<ModelConfig>,
    pub scenegraph: NodeConfig,
}

/// A named mesh file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub name: String,
    /// Mesh file path, relative to the scene document's directory unless absolute.
    #[serde(alias = "mesh", alias = "file")]
    pub path: PathBuf,
}

/// A node description, with its subtree.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NodeConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, alias = "transform")]
    pub transformation: TransformDesc,
    /// Model name; required for model nodes and rejected on generic ones.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeConfig>,
}

impl NodeConfig {
    pub fn generic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Generic,
            transformation: TransformDesc::default(),
            content: None,
            children: Vec::new(),
        }
    }

    pub fn model(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Model,
            content: Some(content.into()),
            ..Self::generic(name)
        }
    }

    pub fn with_transformation(mut self, transformation: TransformDesc) -> Self {
        self.transformation = transformation;
        self
    }

    pub fn with_child(mut self, child: NodeConfig) -> Self {
        self.children.push(child);
        self
    }

    /// This node and its descendants in depth-first pre-order.
    pub fn walk(&self) -> Vec<&NodeConfig> {
        let mut order = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(node.children.iter().rev());
        }
        order
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        serde_json::from_str(json).map_err(|e| SceneError::json("scene", e))
    }

    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|e| SceneError::json(path.display().to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let json = r#"{
            "models": [{ "name": "cube", "path": "cube.obj" }],
            "scenegraph": {
                "name": "root",
                "type": "node",
                "transformation": { "translation": [1, 2, 3], "rotation": [0, 90, 0], "scale": [1, 1, 1] },
                "children": [
                    { "name": "c", "type": "model", "content": "cube", "children": [] }
                ]
            }
        }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.models[0].path, PathBuf::from("cube.obj"));
        assert_eq!(config.scenegraph.kind, NodeKind::Generic);
        assert_eq!(config.scenegraph.transformation.translation, [1.0, 2.0, 3.0]);
        let child = &config.scenegraph.children[0];
        assert_eq!(child.kind, NodeKind::Model);
        assert_eq!(child.content.as_deref(), Some("cube"));
        assert_eq!(child.transformation, TransformDesc::default());
    }

    #[test]
    fn test_optional_fields_default() {
        let config =
            SceneConfig::from_json(r#"{ "scenegraph": { "name": "root", "type": "node" } }"#)
                .unwrap();
        assert!(config.models.is_empty());
        assert!(config.scenegraph.children.is_empty());
        assert!(config.scenegraph.content.is_none());
    }

    #[test]
    fn test_unknown_node_type_rejected() {
        let err = SceneConfig::from_json(r#"{ "scenegraph": { "name": "r", "type": "light" } }"#)
            .unwrap_err();
        assert!(matches!(err, SceneError::Parse { .. }));
    }

    #[test]
    fn test_malformed_transform_number_rejected() {
        let json = r#"{ "scenegraph": { "name": "r", "type": "node",
            "transformation": { "translation": [0, "x", 0] } } }"#;
        assert!(matches!(SceneConfig::from_json(json), Err(SceneError::Parse { .. })));
    }

    #[test]
    fn test_walk_is_pre_order() {
        let tree = NodeConfig::generic("root")
            .with_child(NodeConfig::generic("a").with_child(NodeConfig::model("a1", "m")))
            .with_child(NodeConfig::model("b", "m"));
        let names: Vec<&str> = tree.walk().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["root", "a", "a1", "b"]);
    }
}
