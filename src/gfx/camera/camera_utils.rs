use cgmath::{Matrix4, Vector3};
use winit::{
    event::{DeviceEvent, KeyEvent},
    window::Window,
};

use super::{camera_controller::CameraController, first_person_camera::FirstPersonCamera};

pub struct CameraManager {
    pub camera: FirstPersonCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: FirstPersonCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn process_event(&mut self, event: &DeviceEvent, window: &Window) {
        self.controller
            .process_events(event, window, &mut self.camera);
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller
            .process_keyed_events(event, &mut self.camera);
    }

    /// Applies held movement keys for a frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.controller.update_camera(&mut self.camera, dt);
    }
}

pub trait Camera: Sized {
    fn view_matrix(&self) -> Matrix4<f32>;
    fn projection_matrix(&self) -> Matrix4<f32>;
    fn eye(&self) -> Vector3<f32>;
}
