use cgmath::{Deg, Matrix4};

use crate::{
    config::{GridConfig, ShowcaseConfig},
    error::{Result, ShowcaseError},
    gfx::{
        camera::{Camera, CameraController, CameraManager, FirstPersonCamera},
        rendering::material_grid::MaterialGridDrawList,
        resources::{
            global_bindings::{LightBlock, TransformBlock},
            material::{MaterialLibrary, MaterialPreset},
        },
    },
};

use super::{
    mesh::{default_mesh_assets, MeshAsset},
    timer::AnimationTimer,
};

/// A quarter turn brings a mesh's +Z front round to -X, facing the default camera
const BASE_MODEL_YAW: f32 = -90.0;

/// Showcase state: selection, camera, lights and the cached draw list
///
/// The scene never touches the GPU; the render engine reads the blocks and the draw
/// list it exposes.
pub struct Scene {
    pub camera_manager: CameraManager,
    materials: MaterialLibrary,
    mesh_assets: Vec<MeshAsset>,
    mesh_titles: Vec<String>,
    selected_mesh: usize,
    grid: GridConfig,
    timer: AnimationTimer,
    lights: LightBlock,
    draw_list: MaterialGridDrawList,
    draw_list_stale: bool,
}

impl Scene {
    /// Creates the scene with built-in materials and meshes
    pub fn new(config: &ShowcaseConfig, aspect: f32) -> Self {
        Self::with_content(
            config,
            aspect,
            MaterialLibrary::default(),
            default_mesh_assets(),
        )
    }

    /// Creates the scene over custom material and mesh lists
    ///
    /// # Panics
    /// Panics if `mesh_assets` is empty
    pub fn with_content(
        config: &ShowcaseConfig,
        aspect: f32,
        materials: MaterialLibrary,
        mesh_assets: Vec<MeshAsset>,
    ) -> Self {
        assert!(!mesh_assets.is_empty(), "Scene needs at least one mesh");

        let camera = FirstPersonCamera::new(&config.camera, aspect);
        let camera_manager = CameraManager::new(camera, CameraController::new());
        let mesh_titles = mesh_assets.iter().map(|m| m.title.clone()).collect();
        let draw_list = MaterialGridDrawList::build(
            &config.grid,
            &materials.selected().props,
            materials.selected_index(),
            0,
        );

        Self {
            camera_manager,
            materials,
            mesh_assets,
            mesh_titles,
            selected_mesh: 0,
            grid: config.grid,
            timer: AnimationTimer::new(config.timer_speed, config.paused),
            lights: LightBlock::fixed(),
            draw_list,
            draw_list_stale: false,
        }
    }

    /// Advances camera movement and the light animation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.camera_manager.update(dt);

        if self.timer.advance(dt) {
            self.lights = LightBlock::orbiting(self.timer.value());
        }
    }

    pub fn material_titles(&self) -> &[String] {
        self.materials.titles()
    }

    pub fn mesh_titles(&self) -> &[String] {
        &self.mesh_titles
    }

    pub fn mesh_assets(&self) -> &[MeshAsset] {
        &self.mesh_assets
    }

    pub fn selected_material_index(&self) -> usize {
        self.materials.selected_index()
    }

    pub fn selected_material(&self) -> &MaterialPreset {
        self.materials.selected()
    }

    pub fn selected_mesh_index(&self) -> usize {
        self.selected_mesh
    }

    pub fn selected_mesh(&self) -> &MeshAsset {
        &self.mesh_assets[self.selected_mesh]
    }

    /// Selects a material preset, returns whether anything changed
    pub fn select_material(&mut self, index: usize) -> Result<bool> {
        let changed = self.materials.select(index)?;
        if changed {
            log::info!("Material: {}", self.materials.selected().name);
            self.draw_list_stale = true;
        }
        Ok(changed)
    }

    /// Selects a mesh, returns whether anything changed
    pub fn select_mesh(&mut self, index: usize) -> Result<bool> {
        if index >= self.mesh_assets.len() {
            return Err(ShowcaseError::SelectionOutOfRange {
                kind: "mesh",
                index,
                len: self.mesh_assets.len(),
            });
        }
        let changed = self.selected_mesh != index;
        if changed {
            self.selected_mesh = index;
            log::info!("Mesh: {}", self.mesh_assets[index].title);
            self.draw_list_stale = true;
        }
        Ok(changed)
    }

    pub fn is_draw_list_stale(&self) -> bool {
        self.draw_list_stale
    }

    /// Rebuilds the draw list if a selection changed since the last build
    ///
    /// Returns whether a rebuild happened.
    pub fn refresh_draw_list(&mut self) -> bool {
        if !self.draw_list_stale {
            return false;
        }
        self.draw_list = MaterialGridDrawList::build(
            &self.grid,
            &self.materials.selected().props,
            self.materials.selected_index(),
            self.selected_mesh,
        );
        self.draw_list_stale = false;
        log::debug!("Rebuilt draw list with {} cells", self.draw_list.len());
        true
    }

    /// Last built draw list, call [`Scene::refresh_draw_list`] first
    pub fn draw_list(&self) -> &MaterialGridDrawList {
        &self.draw_list
    }

    /// Resting orientation of the selected mesh
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_y(Deg(BASE_MODEL_YAW + self.selected_mesh().yaw_offset))
    }

    pub fn transform_block(&self) -> TransformBlock {
        let camera = &self.camera_manager.camera;
        TransformBlock::new(
            camera.projection_matrix(),
            self.model_matrix(),
            camera.view_matrix(),
            camera.eye(),
        )
    }

    pub fn light_block(&self) -> LightBlock {
        self.lights
    }

    pub fn is_paused(&self) -> bool {
        self.timer.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.timer.set_paused(paused);
    }

    /// Toggles the light animation, returns the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.timer.toggle_pause();
        log::info!("Light animation {}", if paused { "paused" } else { "running" });
        paused
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera_manager.camera.resize_projection(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Vector4};

    fn scene() -> Scene {
        Scene::new(&ShowcaseConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn test_initial_state() {
        let scene = scene();
        assert_eq!(scene.selected_material().name, "Iron");
        assert_eq!(scene.selected_mesh().title, "Sphere");
        assert_eq!(scene.material_titles().len(), 6);
        assert_eq!(scene.mesh_titles().len(), 4);
        assert!(!scene.is_draw_list_stale());
        assert_eq!(scene.draw_list().len(), 49);
        assert!(scene.is_paused());
    }

    #[test]
    fn test_material_change_rebuilds_draw_list() {
        let mut scene = scene();
        assert!(scene.select_material(2).unwrap());
        assert!(scene.is_draw_list_stale());
        // Old list is still what would be drawn until refreshed
        assert_eq!(scene.draw_list().material_index(), 0);

        assert!(scene.refresh_draw_list());
        assert!(!scene.is_draw_list_stale());
        assert_eq!(scene.draw_list().material_index(), 2);
        assert_eq!(scene.draw_list().cells()[0].material.color(), [1.0, 0.71, 0.29]);

        assert!(!scene.refresh_draw_list());
    }

    #[test]
    fn test_reselecting_same_entry_is_a_no_op() {
        let mut scene = scene();
        assert!(!scene.select_material(0).unwrap());
        assert!(!scene.select_mesh(0).unwrap());
        assert!(!scene.is_draw_list_stale());
    }

    #[test]
    fn test_out_of_range_selection() {
        let mut scene = scene();
        assert!(matches!(
            scene.select_mesh(4),
            Err(ShowcaseError::SelectionOutOfRange { kind: "mesh", .. })
        ));
        assert!(scene.select_material(99).is_err());
        assert_eq!(scene.selected_mesh_index(), 0);
    }

    #[test]
    fn test_mesh_change_updates_model_matrix() {
        let mut scene = scene();
        let sphere_model = scene.model_matrix();
        let expected = Matrix4::from_angle_y(Deg(-90.0));
        assert_eq!(sphere_model, expected);

        assert!(scene.select_mesh(1).unwrap());
        assert!(scene.is_draw_list_stale());
        let teapot_model = scene.model_matrix();
        assert_eq!(teapot_model, Matrix4::from_angle_y(Deg(-45.0)));
        let sphere_columns: [[f32; 4]; 4] = sphere_model.into();
        assert_ne!(scene.transform_block().model, sphere_columns);

        scene.refresh_draw_list();
        assert_eq!(scene.draw_list().mesh_index(), 1);
    }

    #[test]
    fn test_transform_block_tracks_camera() {
        let mut scene = scene();
        let before = scene.transform_block();
        assert_eq!(
            before.camera_position,
            [-10.0, 15.0, -1.25, 1.0]
        );

        scene.camera_manager.camera.move_forward(1.0);
        let after = scene.transform_block();
        assert_ne!(before.view, after.view);
        assert_eq!(before.projection, after.projection);
        assert_eq!(before.model, after.model);
    }

    #[test]
    fn test_model_matrix_rotates_about_y() {
        let scene = scene();
        // -90 degrees about +Y maps +X onto +Z
        let turned = scene.model_matrix() * Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert!((turned.z - 1.0).abs() < 1e-6);
        assert!(turned.x.abs() < 1e-6);
    }

    #[test]
    fn test_mesh_front_faces_default_camera() {
        let mut scene = scene();
        let front = scene.camera_manager.camera.front();
        let towards_camera = -Vector3::new(front.x, 0.0, front.z).normalize();

        // Meshes without an extra turn show their +Z side to the camera
        for index in 0..scene.mesh_titles().len() {
            scene.select_mesh(index).unwrap();
            if scene.selected_mesh().yaw_offset != 0.0 {
                continue;
            }
            let mesh_front = (scene.model_matrix() * Vector4::unit_z()).truncate();
            assert!((mesh_front.dot(towards_camera) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_lights_stay_fixed_while_paused() {
        let mut scene = scene();
        scene.update(5.0);
        assert_eq!(scene.light_block(), LightBlock::fixed());
    }

    #[test]
    fn test_lights_orbit_and_freeze_on_pause() {
        let mut scene = scene();
        scene.set_paused(false);
        scene.update(2.0);
        let moving = scene.light_block();
        assert_ne!(moving, LightBlock::fixed());

        assert!(scene.toggle_pause());
        scene.update(2.0);
        assert_eq!(scene.light_block(), moving);
    }

    #[test]
    fn test_resize_changes_projection() {
        let mut scene = scene();
        let before = scene.transform_block().projection;
        scene.resize(1000, 1000);
        assert_ne!(scene.transform_block().projection, before);
    }
}
