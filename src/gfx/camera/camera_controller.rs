use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use log::info;
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use super::free_camera::FreeCamera;
use crate::input::InputDelta;

/// Sensitivities for turning per-frame input into motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Radians per pixel of mouse drag (camera look).
    pub rotate_speed: f32,
    /// Degrees per pixel of mouse drag (node rotation).
    pub node_rotate_speed: f32,
    /// World units per frame while a movement key is held.
    pub move_speed: f32,
    /// World units per pixel of right-drag.
    pub pan_speed: f32,
    /// World units per scroll line.
    pub zoom_speed: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            node_rotate_speed: 0.5,
            move_speed: 0.05,
            pan_speed: 0.01,
            zoom_speed: 0.5,
        }
    }
}

/// Turns an [`InputDelta`] into camera motion or a node transform change.
///
/// Camera: left-drag looks around, WASD moves, Q/E moves down/up, the wheel
/// moves along the view direction, Shift+C resets.
///
/// Node: left-drag rotates about the node's local Y (horizontal drag) and X
/// (vertical drag) axes, right-drag translates in the local XY plane, the
/// wheel translates along local Z.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraController {
    pub settings: ControlSettings,
}

impl CameraController {
    pub fn new(settings: ControlSettings) -> Self {
        Self { settings }
    }

    pub fn update_camera(&self, camera: &mut FreeCamera, input: &InputDelta) {
        let s = &self.settings;

        if input.shift_held() && input.key_pressed(KeyCode::KeyC) {
            info!("Resetting camera to default position");
            camera.reset_to_default();
            camera.update_view_proj();
            return;
        }

        if input.left_button {
            camera.add_yaw(input.mouse_delta.x * s.rotate_speed);
            camera.add_pitch(-input.mouse_delta.y * s.rotate_speed);
        }

        let forward = input.axis(KeyCode::KeyS, KeyCode::KeyW) * s.move_speed
            + input.scroll * s.zoom_speed;
        let right = input.axis(KeyCode::KeyA, KeyCode::KeyD) * s.move_speed;
        let up = input.axis(KeyCode::KeyQ, KeyCode::KeyE) * s.move_speed;
        if forward != 0.0 || right != 0.0 || up != 0.0 {
            camera.translate_local(forward, right, up);
        }

        camera.update_view_proj();
    }

    /// Local-space transform to post-multiply onto the selected node's local
    /// transform, or `None` when the input asks for no change.
    pub fn node_delta(&self, input: &InputDelta) -> Option<Matrix4<f32>> {
        let s = &self.settings;
        let mut delta = Matrix4::identity();
        let mut changed = false;

        if input.left_button && (input.mouse_delta.x != 0.0 || input.mouse_delta.y != 0.0) {
            delta = delta
                * Matrix4::from_angle_y(Deg(input.mouse_delta.x * s.node_rotate_speed))
                * Matrix4::from_angle_x(Deg(input.mouse_delta.y * s.node_rotate_speed));
            changed = true;
        }

        let mut offset = Vector3::new(0.0, 0.0, -input.scroll * s.zoom_speed);
        if input.right_button {
            offset.x += input.mouse_delta.x * s.pan_speed;
            offset.y -= input.mouse_delta.y * s.pan_speed;
        }
        if offset != Vector3::new(0.0, 0.0, 0.0) {
            delta = Matrix4::from_translation(offset) * delta;
            changed = true;
        }

        changed.then_some(delta)
    }
}
