//! # Error Types
//!
//! Every fallible operation in the crate returns [`SceneResult`]. Load-time
//! errors (mesh parsing, transform decoding, scene building) abort the whole
//! scene construction; [`SceneError::NodeNotFound`] is reported to the caller
//! of a runtime lookup and leaves the loaded scene alone.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for mesh loading, scene building and node lookup.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Malformed numeric or structural token in mesh, transform or config data.
    #[error("Parse error in {context} at line {line}: {message}")]
    Parse {
        /// What was being parsed (a file path, "mesh", "transformation", ...).
        context: String,
        /// 1-based line number, or 0 when no line applies.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A face record with a vertex count other than 3 or 4.
    #[error("Unsupported face format at line {line}: {arity} vertices (only triangles and quads are supported)")]
    UnsupportedFaceFormat {
        /// 1-based line number of the face record.
        line: usize,
        /// Number of vertex references on the face.
        arity: usize,
    },

    /// A model node references a mesh name that was never declared.
    #[error("Node '{node}' references undeclared model '{model}'")]
    ModelNotFound {
        /// Name of the offending node.
        node: String,
        /// The missing model name.
        model: String,
    },

    /// Lookup by name found no node.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Structurally invalid node description.
    #[error("Invalid node '{node}': {reason}")]
    InvalidNode {
        /// Name of the offending node.
        node: String,
        /// Why it was rejected.
        reason: String,
    },

    /// IO error while reading a mesh or scene file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl SceneError {
    pub(crate) fn parse(context: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            line,
            message: message.into(),
        }
    }

    /// Wraps a JSON error from reading a scene document or transform block.
    pub(crate) fn json(context: impl Into<String>, error: serde_json::Error) -> Self {
        Self::parse(context, error.line(), error.to_string())
    }

    /// True for errors raised while loading or building a scene.
    pub fn is_load_error(&self) -> bool {
        !matches!(self, Self::NodeNotFound(_))
    }
}

/// Result type alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_classification() {
        assert!(!SceneError::NodeNotFound("arm".to_string()).is_load_error());
        assert!(SceneError::UnsupportedFaceFormat { line: 3, arity: 5 }.is_load_error());
        assert!(SceneError::ModelNotFound {
            node: "n".to_string(),
            model: "m".to_string(),
        }
        .is_load_error());
        assert!(SceneError::parse("mesh", 1, "bad").is_load_error());
    }

    #[test]
    fn test_json_error_keeps_line() {
        let err = serde_json::from_str::<Vec<u32>>("[1,\n2,\nx]").unwrap_err();
        match SceneError::json("scene.json", err) {
            SceneError::Parse { context, line, .. } => {
                assert_eq!(context, "scene.json");
                assert_eq!(line, 3);
            }
            other => panic!("expected Parse, got {}", other),
        }
    }
}
