use cgmath::*;

use crate::config::CameraConfig;

use super::camera_utils::Camera;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Pitch stays strictly inside (-90, 90) so the view basis never degenerates
pub const MAX_PITCH: f32 = 89.0;

/// Free-flying camera driven by pitch and yaw in degrees
#[derive(Debug, Clone, Copy)]
pub struct FirstPersonCamera {
    pub position: Vector3<f32>,
    pub pitch: f32,
    pub yaw: f32,
    pub movement_speed: f32,
    pub rotation_speed: f32,
    pub aspect: f32,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    default_pose: (Vector3<f32>, f32, f32),
}

impl Camera for FirstPersonCamera {
    fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(Point3::from_vec(self.position), self.front(), Vector3::unit_y())
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    fn eye(&self) -> Vector3<f32> {
        self.position
    }
}

impl FirstPersonCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let position = Vector3::from(config.position);
        let pitch = config.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        Self {
            position,
            pitch,
            yaw: config.yaw,
            movement_speed: config.movement_speed,
            rotation_speed: config.rotation_speed,
            aspect,
            fovy: Deg(config.fov_y),
            znear: config.z_near,
            zfar: config.z_far,
            default_pose: (position, pitch, config.yaw),
        }
    }

    /// Unit view direction
    pub fn front(&self) -> Vector3<f32> {
        let pitch = Rad::from(Deg(self.pitch));
        let yaw = Rad::from(Deg(self.yaw));
        Vector3::new(
            pitch.0.cos() * yaw.0.cos(),
            pitch.0.sin(),
            pitch.0.cos() * yaw.0.sin(),
        )
        .normalize()
    }

    /// Unit vector to the camera's right, parallel to the ground
    pub fn right(&self) -> Vector3<f32> {
        self.front().cross(Vector3::unit_y()).normalize()
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta) % 360.0;
    }

    /// Moves along the view direction (negative moves backwards)
    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.front() * distance;
    }

    /// Strafes sideways (negative moves left)
    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn reset_to_default(&mut self) {
        let (position, pitch, yaw) = self.default_pose;
        self.position = position;
        self.pitch = pitch;
        self.yaw = yaw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn camera() -> FirstPersonCamera {
        FirstPersonCamera::new(&CameraConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn test_front_from_angles() {
        let mut cam = camera();
        cam.pitch = 0.0;
        cam.yaw = 0.0;
        assert!((cam.front() - Vector3::unit_x()).magnitude() < EPS);

        cam.yaw = 90.0;
        assert!((cam.front() - Vector3::unit_z()).magnitude() < EPS);

        // Default pose looks down onto the grid
        let cam = camera();
        let front = cam.front();
        assert!(front.y < -0.8);
        assert!(front.x > 0.4);
        assert!(front.z.abs() < EPS);
    }

    #[test]
    fn test_default_pose_sees_grid_centre() {
        let cam = camera();
        let front = cam.front();
        // Intersect the view ray with the ground plane
        let t = -cam.position.y / front.y;
        let hit = cam.position + front * t;
        assert!((hit.x + 1.25).abs() < 0.2);
        assert!((hit.z + 1.25).abs() < 0.1);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = camera();
        cam.add_pitch(-500.0);
        assert_eq!(cam.pitch, -MAX_PITCH);
        cam.set_pitch(120.0);
        assert_eq!(cam.pitch, MAX_PITCH);
    }

    #[test]
    fn test_movement() {
        let mut cam = camera();
        cam.pitch = 0.0;
        cam.yaw = 0.0;
        let start = cam.position;

        cam.move_forward(2.0);
        assert!((cam.position - (start + Vector3::new(2.0, 0.0, 0.0))).magnitude() < EPS);

        // Looking along +X, right is +Z in a right-handed Y-up frame
        cam.move_right(1.0);
        assert!((cam.position - (start + Vector3::new(2.0, 0.0, 1.0))).magnitude() < EPS);

        cam.reset_to_default();
        assert_eq!(cam.position, start);
        assert_eq!(cam.pitch, -60.0);
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut cam = camera();
        cam.resize_projection(800, 400);
        assert_eq!(cam.aspect, 2.0);
        cam.resize_projection(0, 400);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn test_view_places_eye_at_origin() {
        let cam = camera();
        let eye = cam.view_matrix() * cam.position.extend(1.0);
        assert!(eye.truncate().magnitude() < 1e-4);
    }
}
