//! # Input
//!
//! Per-frame input snapshot handed to the camera and node controllers.
//!
//! [`InputState`] collects `winit` device and keyboard events as they arrive;
//! once per frame the host calls [`InputState::take_delta`] and passes the
//! resulting [`InputDelta`] to [`Viewer::update`](crate::app::Viewer::update).
//! Nothing in the crate reads input devices directly.

use std::collections::HashSet;

use cgmath::{Vector2, Zero};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

/// Raw button ids reported by `DeviceEvent::Button`.
const LEFT_BUTTON: u32 = 0;
const RIGHT_BUTTON: u32 = 1;

/// Pixel-delta scroll events are divided by this to match line-delta units.
const PIXELS_PER_LINE: f32 = 120.0;

/// Input accumulated over one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDelta {
    /// Mouse movement in pixels since the previous frame.
    pub mouse_delta: Vector2<f32>,
    /// Wheel movement in lines; positive scrolls away from the user.
    pub scroll: f32,
    pub left_button: bool,
    pub right_button: bool,
    /// Keys held at the end of the frame.
    pub keys_down: HashSet<KeyCode>,
    /// Keys that went down during the frame.
    pub keys_pressed: HashSet<KeyCode>,
}

impl Default for InputDelta {
    fn default() -> Self {
        Self {
            mouse_delta: Vector2::zero(),
            scroll: 0.0,
            left_button: false,
            right_button: false,
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
        }
    }
}

impl InputDelta {
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn shift_held(&self) -> bool {
        self.key_down(KeyCode::ShiftLeft) || self.key_down(KeyCode::ShiftRight)
    }

    /// -1, 0 or 1 depending on which of the two keys is held.
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.key_down(positive) {
            value += 1.0;
        }
        if self.key_down(negative) {
            value -= 1.0;
        }
        value
    }
}

/// Accumulates window-system events between frames.
#[derive(Debug, Default)]
pub struct InputState {
    current: InputDelta,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Button { button, state } => {
                self.handle_button(*button, *state == ElementState::Pressed)
            }
            DeviceEvent::MouseMotion { delta } => {
                self.current.mouse_delta += Vector2::new(delta.0 as f32, delta.1 as f32);
            }
            DeviceEvent::MouseWheel { delta } => {
                self.current.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                        *y as f32 / PIXELS_PER_LINE
                    }
                };
            }
            _ => (),
        }
    }

    pub fn process_key_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.handle_key(code, event.state);
        }
    }

    pub fn handle_button(&mut self, button: u32, pressed: bool) {
        match button {
            LEFT_BUTTON => self.current.left_button = pressed,
            RIGHT_BUTTON => self.current.right_button = pressed,
            _ => (),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.current.keys_down.insert(code) {
                    self.current.keys_pressed.insert(code);
                }
            }
            ElementState::Released => {
                self.current.keys_down.remove(&code);
            }
        }
    }

    /// Returns this frame's input and resets the per-frame parts (motion,
    /// scroll, fresh key presses). Held buttons and keys carry over.
    pub fn take_delta(&mut self) -> InputDelta {
        let delta = self.current.clone();
        self.current.mouse_delta = Vector2::zero();
        self.current.scroll = 0.0;
        self.current.keys_pressed.clear();
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_accumulates_and_resets() {
        let mut input = InputState::new();
        input.process_device_event(&DeviceEvent::MouseMotion { delta: (3.0, -1.0) });
        input.process_device_event(&DeviceEvent::MouseMotion { delta: (2.0, 4.0) });

        let delta = input.take_delta();
        assert_eq!(delta.mouse_delta, Vector2::new(5.0, 3.0));
        assert_eq!(input.take_delta().mouse_delta, Vector2::zero());
    }

    #[test]
    fn test_buttons_persist_across_frames() {
        let mut input = InputState::new();
        input.process_device_event(&DeviceEvent::Button {
            button: LEFT_BUTTON,
            state: ElementState::Pressed,
        });
        assert!(input.take_delta().left_button);
        assert!(input.take_delta().left_button);

        input.handle_button(LEFT_BUTTON, false);
        assert!(!input.take_delta().left_button);
    }

    #[test]
    fn test_key_pressed_only_on_first_frame() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed);
        input.handle_key(KeyCode::KeyW, ElementState::Pressed); // key repeat

        let first = input.take_delta();
        assert!(first.key_pressed(KeyCode::KeyW));
        assert!(first.key_down(KeyCode::KeyW));

        let second = input.take_delta();
        assert!(!second.key_pressed(KeyCode::KeyW));
        assert!(second.key_down(KeyCode::KeyW));

        input.handle_key(KeyCode::KeyW, ElementState::Released);
        assert!(!input.take_delta().key_down(KeyCode::KeyW));
    }

    #[test]
    fn test_scroll_units() {
        let mut input = InputState::new();
        input.process_device_event(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 2.0),
        });
        input.process_device_event(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 60.0)),
        });
        assert!((input.take_delta().scroll - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_axis() {
        let mut delta = InputDelta::default();
        delta.keys_down.insert(KeyCode::KeyD);
        assert_eq!(delta.axis(KeyCode::KeyA, KeyCode::KeyD), 1.0);
        delta.keys_down.insert(KeyCode::KeyA);
        assert_eq!(delta.axis(KeyCode::KeyA, KeyCode::KeyD), 0.0);
    }
}
