use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::first_person_camera::FirstPersonCamera;

/// World units moved per line of mouse wheel
const WHEEL_STEP: f32 = 0.5;
/// World units moved per pixel of precise scrolling
const PIXEL_SCROLL_STEP: f32 = 0.005;

/// Movement keys currently held down
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementKeys {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

pub struct CameraController {
    keys: MovementKeys,
    is_mouse_pressed: bool,
    is_shift_held: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            keys: MovementKeys::default(),
            is_mouse_pressed: false,
            is_shift_held: false,
        }
    }

    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut FirstPersonCamera,
    ) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let distance = match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => scroll * WHEEL_STEP,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 * PIXEL_SCROLL_STEP
                    }
                };
                camera.move_forward(distance);
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    self.rotate(camera, delta.0 as f32, delta.1 as f32);
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    /// Turns the camera by a mouse delta in pixels
    pub fn rotate(&self, camera: &mut FirstPersonCamera, dx: f32, dy: f32) {
        camera.add_yaw(dx * camera.rotation_speed);
        camera.add_pitch(-dy * camera.rotation_speed);
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut FirstPersonCamera) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        self.process_key(code, event.state, camera);
    }

    /// Key handling separated from `KeyEvent`, which cannot be built outside winit
    pub fn process_key(
        &mut self,
        code: KeyCode,
        state: ElementState,
        camera: &mut FirstPersonCamera,
    ) {
        let pressed = state == ElementState::Pressed;
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => self.keys.forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.keys.backward = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.keys.left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.keys.right = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.is_shift_held = pressed,
            KeyCode::KeyC if pressed && self.is_shift_held => {
                log::info!("Resetting camera to default position");
                camera.reset_to_default();
            }
            _ => (),
        }
    }

    /// Moves the camera according to the held keys
    pub fn update_camera(&self, camera: &mut FirstPersonCamera, dt: f32) {
        if !self.keys.any() {
            return;
        }
        let step = camera.movement_speed * dt;
        if self.keys.forward {
            camera.move_forward(step);
        }
        if self.keys.backward {
            camera.move_forward(-step);
        }
        if self.keys.right {
            camera.move_right(step);
        }
        if self.keys.left {
            camera.move_right(-step);
        }
    }

    pub fn keys(&self) -> MovementKeys {
        self.keys
    }

    /// Forget held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.keys = MovementKeys::default();
        self.is_mouse_pressed = false;
        self.is_shift_held = false;
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use cgmath::{InnerSpace, Vector3};

    fn level_camera() -> FirstPersonCamera {
        let mut camera = FirstPersonCamera::new(&CameraConfig::default(), 1.0);
        camera.pitch = 0.0;
        camera.yaw = 0.0;
        camera
    }

    #[test]
    fn test_held_keys_move_camera() {
        let mut controller = CameraController::new();
        let mut camera = level_camera();
        let start = camera.position;

        controller.process_key(KeyCode::KeyW, ElementState::Pressed, &mut camera);
        assert!(controller.keys().forward);
        controller.update_camera(&mut camera, 0.5);
        // movement speed 5 * 0.5s along +X
        assert!((camera.position.x - start.x - 2.5).abs() < 1e-5);

        controller.process_key(KeyCode::KeyW, ElementState::Released, &mut camera);
        let stopped = camera.position;
        controller.update_camera(&mut camera, 0.5);
        assert_eq!(camera.position, stopped);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut controller = CameraController::new();
        let mut camera = level_camera();
        let start = camera.position;

        controller.process_key(KeyCode::KeyA, ElementState::Pressed, &mut camera);
        controller.process_key(KeyCode::KeyD, ElementState::Pressed, &mut camera);
        controller.update_camera(&mut camera, 1.0);
        assert!((camera.position - start).magnitude() < 1e-5);
    }

    #[test]
    fn test_rotate_uses_rotation_speed() {
        let controller = CameraController::new();
        let mut camera = level_camera();

        controller.rotate(&mut camera, 10.0, 10.0);
        assert!((camera.yaw - 3.0).abs() < 1e-5);
        assert!((camera.pitch + 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_shift_c_resets() {
        let mut controller = CameraController::new();
        let mut camera = level_camera();
        camera.yaw = 45.0;
        camera.move_forward(10.0);

        controller.process_key(KeyCode::KeyC, ElementState::Pressed, &mut camera);
        assert_eq!(camera.pitch, 0.0);

        controller.process_key(KeyCode::ShiftLeft, ElementState::Pressed, &mut camera);
        controller.process_key(KeyCode::KeyC, ElementState::Pressed, &mut camera);
        assert_eq!(camera.pitch, -60.0);
        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.position, Vector3::new(-10.0, 15.0, -1.25));
    }
}
