use cgmath::*;

use super::camera_utils::{Camera, CameraUniform, OPENGL_TO_WGPU_MATRIX};

const DEFAULT_POSITION: [f32; 3] = [0.0, 0.0, 5.0];
/// Facing down -Z.
const DEFAULT_YAW: f32 = -std::f32::consts::FRAC_PI_2;
/// Keeps the view direction away from the poles where `up` becomes degenerate.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Free-flying camera: a position plus yaw/pitch look direction, Y up.
#[derive(Debug, Clone, Copy)]
pub struct FreeCamera {
    pub position: Vector3<f32>,
    /// Radians around +Y, measured from +X.
    pub yaw: f32,
    /// Radians above the horizon.
    pub pitch: f32,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for FreeCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl FreeCamera {
    pub fn new(position: Vector3<f32>, yaw: f32, pitch: f32, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.forward().cross(Vector3::unit_y()).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(Point3::from_vec(self.position), self.forward(), Vector3::unit_y())
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw += delta;
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Moves in camera space: `forward` along the view direction, `right`
    /// sideways, `up` along world +Y.
    pub fn translate_local(&mut self, forward: f32, right: f32, up: f32) {
        self.position += self.forward() * forward + self.right() * right + Vector3::unit_y() * up;
    }

    pub fn reset_to_default(&mut self) {
        self.position = Vector3::from(DEFAULT_POSITION);
        self.yaw = DEFAULT_YAW;
        self.pitch = 0.0;
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = self.position.extend(1.0).into();
        self.uniform.view_proj = self.build_view_projection_matrix().into();
    }
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self::new(Vector3::from(DEFAULT_POSITION), DEFAULT_YAW, 0.0, 16.0 / 9.0)
    }
}
