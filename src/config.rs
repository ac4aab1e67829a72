//! Scene configuration
//!
//! [`ShowcaseConfig`] gathers every tunable of the showcase: window, camera, asset
//! location, grid shape, light animation timer and presentation. Defaults reproduce
//! the reference scene; a handful of environment variables override them at startup.

use std::path::{Path, PathBuf};

use crate::error::{Result, ShowcaseError};

/// Overrides the asset directory (expects a `models/` subdirectory)
pub const ENV_ASSET_DIR: &str = "PBRBASIC_ASSET_DIR";
/// `1`/`true` enables vsync (`Fifo`), `0`/`false` presents immediately
pub const ENV_VSYNC: &str = "PBRBASIC_VSYNC";
/// `1`/`true` starts with the light animation running
pub const ENV_ANIMATE_LIGHTS: &str = "PBRBASIC_ANIMATE_LIGHTS";

/// Starting pose and projection of the first-person camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Eye position in world space
    pub position: [f32; 3],
    /// Pitch in degrees, negative looks down
    pub pitch: f32,
    /// Yaw in degrees, 0 looks along +X, 90 along +Z
    pub yaw: f32,
    /// Units per second for keyboard movement
    pub movement_speed: f32,
    /// Degrees per pixel of mouse drag
    pub rotation_speed: f32,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-10.0, 15.0, -1.25],
            pitch: -60.0,
            yaw: 0.0,
            movement_speed: 5.0,
            rotation_speed: 0.3,
            fov_y: 60.0,
            z_near: 0.1,
            z_far: 256.0,
        }
    }
}

/// Shape of the material grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Cells per side
    pub field: u32,
    /// Distance between neighbouring cell centres
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            field: 7,
            spacing: 2.5,
        }
    }
}

/// Complete configuration of the showcase
#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseConfig {
    pub title: String,
    pub window_size: (u32, u32),
    pub camera: CameraConfig,
    pub asset_dir: PathBuf,
    pub grid: GridConfig,
    /// Whether the light animation starts paused
    pub paused: bool,
    /// Timer cycles per second
    pub timer_speed: f32,
    pub clear_color: wgpu::Color,
    pub vsync: bool,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            title: "Physically Based Rendering".to_string(),
            window_size: (1280, 720),
            camera: CameraConfig::default(),
            asset_dir: PathBuf::from("assets"),
            grid: GridConfig::default(),
            paused: true,
            timer_speed: 0.25 * 0.3,
            clear_color: wgpu::Color {
                r: 0.025,
                g: 0.025,
                b: 0.025,
                a: 1.0,
            },
            vsync: true,
        }
    }
}

impl ShowcaseConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup
    ///
    /// Unparseable boolean values are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_ASSET_DIR) {
            self.asset_dir = PathBuf::from(dir);
        }
        if let Some(vsync) = lookup(ENV_VSYNC).and_then(|v| parse_flag(ENV_VSYNC, &v)) {
            self.vsync = vsync;
        }
        if let Some(animate) =
            lookup(ENV_ANIMATE_LIGHTS).and_then(|v| parse_flag(ENV_ANIMATE_LIGHTS, &v))
        {
            self.paused = !animate;
        }
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Directory holding the mesh files
    pub fn models_dir(&self) -> PathBuf {
        self.asset_dir.join("models")
    }

    /// Full path of a model file inside [`Self::models_dir`]
    pub fn model_path(&self, file: impl AsRef<Path>) -> PathBuf {
        self.models_dir().join(file)
    }

    /// Rejects values the renderer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.grid.field < 2 {
            return Err(ShowcaseError::Config(format!(
                "grid field must be at least 2, got {}",
                self.grid.field
            )));
        }
        if !(self.grid.spacing > 0.0) {
            return Err(ShowcaseError::Config(format!(
                "grid spacing must be positive, got {}",
                self.grid.spacing
            )));
        }
        let (width, height) = self.window_size;
        if width == 0 || height == 0 {
            return Err(ShowcaseError::Config(format!(
                "window size must be non-zero, got {}x{}",
                width, height
            )));
        }
        let camera = &self.camera;
        if !(camera.z_near > 0.0 && camera.z_far > camera.z_near) {
            return Err(ShowcaseError::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got {} / {}",
                camera.z_near, camera.z_far
            )));
        }
        if !(camera.fov_y > 0.0 && camera.fov_y < 180.0) {
            return Err(ShowcaseError::Config(format!(
                "camera field of view must be in (0, 180), got {}",
                camera.fov_y
            )));
        }
        if self.timer_speed < 0.0 {
            return Err(ShowcaseError::Config(format!(
                "timer speed must not be negative, got {}",
                self.timer_speed
            )));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            log::warn!("Ignoring {}={:?}: expected a boolean", key, other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = ShowcaseConfig::default();
        assert_eq!(config.title, "Physically Based Rendering");
        assert_eq!(config.grid.field, 7);
        assert_eq!(config.grid.spacing, 2.5);
        assert!(config.paused);
        assert!((config.timer_speed - 0.075).abs() < 1e-6);
        assert_eq!(config.camera.position, [-10.0, 15.0, -1.25]);
        assert_eq!(config.camera.yaw, 0.0);
        assert_eq!(config.camera.fov_y, 60.0);
        assert_eq!(config.camera.z_near, 0.1);
        assert_eq!(config.camera.z_far, 256.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = ShowcaseConfig::default().with_overrides(lookup(&[
            (ENV_ASSET_DIR, "/opt/pbr"),
            (ENV_VSYNC, "off"),
            (ENV_ANIMATE_LIGHTS, "1"),
        ]));
        assert_eq!(config.asset_dir, PathBuf::from("/opt/pbr"));
        assert_eq!(config.model_path("deer.obj"), PathBuf::from("/opt/pbr/models/deer.obj"));
        assert!(!config.vsync);
        assert!(!config.paused);
    }

    #[test]
    fn test_bad_flag_is_ignored() {
        let config = ShowcaseConfig::default().with_overrides(lookup(&[(ENV_VSYNC, "maybe")]));
        assert!(config.vsync);
    }

    #[test]
    fn test_validate_rejects_degenerate_grid() {
        let config = ShowcaseConfig::default().with_grid(GridConfig {
            field: 1,
            spacing: 2.5,
        });
        assert!(matches!(config.validate(), Err(ShowcaseError::Config(_))));

        let config = ShowcaseConfig::default().with_grid(GridConfig {
            field: 7,
            spacing: 0.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_clip_planes() {
        let camera = CameraConfig {
            z_near: 10.0,
            z_far: 1.0,
            ..Default::default()
        };
        let config = ShowcaseConfig::default().with_camera(camera);
        assert!(config.validate().is_err());
    }
}
