//! # Viewer
//!
//! Host-facing state of the scene viewer: the active scene, the free camera,
//! what the user is currently manipulating, and the draw mode. A windowing
//! host feeds it one [`InputDelta`] per frame and hands it a render target.

use std::path::Path;

use log::{error, info};
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::error::{SceneError, SceneResult};
use crate::gfx::camera::{CameraController, ControlSettings, FreeCamera};
use crate::gfx::scene::{DrawMode, NodeId, RenderTarget, SceneBuilder, SceneGraph};
use crate::input::InputDelta;

/// Viewer options, deserializable so hosts can keep them in a settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub controls: ControlSettings,
    pub draw_mode: DrawMode,
}

/// What per-frame input is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationMode {
    Camera,
    Node(NodeId),
}

pub struct Viewer {
    scene: Option<SceneGraph>,
    pub camera: FreeCamera,
    controller: CameraController,
    mode: ManipulationMode,
    draw_mode: DrawMode,
}

impl Viewer {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            scene: None,
            camera: FreeCamera::default(),
            controller: CameraController::new(settings.controls),
            mode: ManipulationMode::Camera,
            draw_mode: settings.draw_mode,
        }
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut SceneGraph> {
        self.scene.as_mut()
    }

    pub fn mode(&self) -> ManipulationMode {
        self.mode
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Loads a scene document and makes it the active scene.
    ///
    /// On failure the error is returned and the previously active scene (if
    /// any) stays in place untouched.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> SceneResult<()> {
        let path = path.as_ref();
        match SceneBuilder::load(path, self.draw_mode) {
            Ok(graph) => {
                self.install_scene(graph);
                Ok(())
            }
            Err(e) => {
                error!("Failed to load scene {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Replaces the active scene, dropping the old one and its renderables.
    /// Manipulation falls back to the camera.
    pub fn install_scene(&mut self, mut graph: SceneGraph) {
        graph.set_draw_mode_all(self.draw_mode);
        self.scene = Some(graph);
        self.mode = ManipulationMode::Camera;
        info!("Scene installed");
    }

    /// Routes subsequent input to the node called `name`.
    ///
    /// A missing node (or no loaded scene) is reported as `NodeNotFound` and
    /// leaves the current mode unchanged.
    pub fn select_node(&mut self, name: &str) -> SceneResult<NodeId> {
        let id = match &self.scene {
            Some(scene) => scene.get_node(name)?,
            None => return Err(SceneError::NodeNotFound(name.to_string())),
        };
        self.mode = ManipulationMode::Node(id);
        info!("Manipulating node '{}'", name);
        Ok(id)
    }

    pub fn select_camera(&mut self) {
        self.mode = ManipulationMode::Camera;
    }

    /// Applies `mode` to every model node of the active scene.
    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
        if let Some(scene) = self.scene.as_mut() {
            scene.set_draw_mode_all(mode);
        }
    }

    /// Processes one frame of input.
    ///
    /// `P` toggles points/triangles and `Escape` returns control to the
    /// camera; everything else goes to the camera or the selected node.
    pub fn update(&mut self, input: &InputDelta) {
        if input.key_pressed(KeyCode::KeyP) {
            self.set_draw_mode(self.draw_mode.toggled());
        }
        if input.key_pressed(KeyCode::Escape) {
            self.select_camera();
        }

        match self.mode {
            ManipulationMode::Camera => self.controller.update_camera(&mut self.camera, input),
            ManipulationMode::Node(id) => {
                let (Some(scene), Some(delta)) =
                    (self.scene.as_mut(), self.controller.node_delta(input))
                else {
                    return;
                };
                let local = *scene.node(id).local_transform() * delta;
                scene.set_transformation(id, local);
            }
        }
    }

    /// Sends the active scene's draw calls to `target`.
    pub fn render(&self, target: &mut impl RenderTarget) {
        if let Some(scene) = &self.scene {
            scene.render(target);
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::mesh::{self, Mesh};
    use crate::gfx::scene::{DrawLog, NodeConfig};
    use cgmath::{Vector2, Vector3};
    use std::collections::HashMap;
    use std::rc::Rc;

    fn scene() -> SceneGraph {
        let mesh: Mesh = mesh::load("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let models = HashMap::from([("tri".to_string(), Rc::new(mesh))]);
        let tree = NodeConfig::generic("root").with_child(
            NodeConfig::generic("arm").with_child(NodeConfig::model("hand", "tri")),
        );
        SceneBuilder::new(".").build_with_models(&tree, models).unwrap()
    }

    #[test]
    fn test_select_missing_node_keeps_mode() {
        let mut viewer = Viewer::default();
        viewer.install_scene(scene());
        assert!(matches!(
            viewer.select_node("leg"),
            Err(SceneError::NodeNotFound(_))
        ));
        assert_eq!(viewer.mode(), ManipulationMode::Camera);
        assert!(viewer.scene().is_some());
    }

    #[test]
    fn test_node_manipulation_propagates_to_children() {
        let mut viewer = Viewer::default();
        viewer.install_scene(scene());
        let arm = viewer.select_node("arm").unwrap();

        let input = InputDelta {
            mouse_delta: Vector2::new(10.0, 0.0),
            right_button: true,
            ..Default::default()
        };
        viewer.update(&input);

        let scene = viewer.scene().unwrap();
        let hand = scene.get_node("hand").unwrap();
        let shift = 10.0 * ControlSettings::default().pan_speed;
        assert!((scene.world_transform(arm).w.x - shift).abs() < 1e-6);
        assert!((scene.world_transform(hand).w.x - shift).abs() < 1e-6);
        assert_eq!(
            scene.node(hand).renderable().unwrap().world_transform(),
            scene.world_transform(hand)
        );
    }

    #[test]
    fn test_camera_mode_leaves_scene_alone() {
        let mut viewer = Viewer::default();
        viewer.install_scene(scene());
        let input = InputDelta {
            mouse_delta: Vector2::new(10.0, 0.0),
            right_button: true,
            ..Default::default()
        };
        viewer.update(&input);
        let scene = viewer.scene().unwrap();
        let hand = scene.get_node("hand").unwrap();
        assert_eq!(scene.world_transform(hand).w.truncate(), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_draw_mode_toggle_key() {
        let mut viewer = Viewer::default();
        viewer.install_scene(scene());
        let mut input = InputDelta::default();
        input.keys_pressed.insert(KeyCode::KeyP);
        viewer.update(&input);

        assert_eq!(viewer.draw_mode(), DrawMode::Points);
        let mut log = DrawLog::default();
        viewer.render(&mut log);
        assert!(log.calls.iter().all(|c| c.mode == DrawMode::Points));
    }

    #[test]
    fn test_escape_returns_to_camera() {
        let mut viewer = Viewer::default();
        viewer.install_scene(scene());
        viewer.select_node("arm").unwrap();
        let mut input = InputDelta::default();
        input.keys_pressed.insert(KeyCode::Escape);
        viewer.update(&input);
        assert_eq!(viewer.mode(), ManipulationMode::Camera);
    }

    #[test]
    fn test_failed_load_keeps_scene() {
        let mut viewer = Viewer::default();
        viewer.install_scene(scene());
        assert!(viewer.load_scene("/nonexistent/scene.json").is_err());
        assert_eq!(viewer.scene().unwrap().len(), 3);
    }
}
