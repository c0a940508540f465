pub mod camera_controller;
pub mod camera_utils;
pub mod free_camera;

// Re-export main types
pub use camera_controller::{CameraController, ControlSettings};
pub use camera_utils::{Camera, CameraUniform};
pub use free_camera::FreeCamera;
