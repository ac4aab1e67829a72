//! Scene uniform blocks and their bindings
//!
//! Two uniform buffers feed the PBR shader:
//! - binding 0, the transform block (vertex + fragment): projection, model, view and the
//!   camera position
//! - binding 1, the light block (fragment): four point light positions
//!
//! Both live in bind group 0. The layouts MUST match `Transforms` and `Lights` in
//! `pbr.wgsl` exactly.

use cgmath::{Deg, Matrix4, Vector3};

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

pub const LIGHT_COUNT: usize = 4;

/// Distance of the fixed lights from the grid centre along X and Z
const LIGHT_DISTANCE: f32 = 15.0;
/// Radius of the animated light paths
const LIGHT_ORBIT_RADIUS: f32 = 20.0;

/// Per-frame transform block
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformBlock {
    pub projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    /// Eye position, w is padding for the 16 byte alignment of `vec3<f32>`
    pub camera_position: [f32; 4],
}
// 3 * 64 + 16 = 208 bytes

impl TransformBlock {
    pub fn new(
        projection: Matrix4<f32>,
        model: Matrix4<f32>,
        view: Matrix4<f32>,
        camera_position: Vector3<f32>,
    ) -> Self {
        Self {
            projection: projection.into(),
            model: model.into(),
            view: view.into(),
            camera_position: [camera_position.x, camera_position.y, camera_position.z, 1.0],
        }
    }
}

/// Point light positions
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightBlock {
    pub positions: [[f32; 4]; LIGHT_COUNT],
}
// 4 * 16 = 64 bytes

impl LightBlock {
    /// Four lights at the corners of a square above the grid
    pub fn fixed() -> Self {
        let p = LIGHT_DISTANCE;
        let h = p * 0.5;
        Self {
            positions: [
                [-p, h, -p, 1.0],
                [-p, h, p, 1.0],
                [p, h, p, 1.0],
                [p, h, -p, 1.0],
            ],
        }
    }

    /// Fixed layout with the first two lights moved along circular paths
    ///
    /// `timer` is the animation phase in `[0, 1)`, one unit per full revolution.
    pub fn orbiting(timer: f32) -> Self {
        let angle: cgmath::Rad<f32> = Deg(timer * 360.0).into();
        let (sin, cos) = (angle.0.sin(), angle.0.cos());
        let r = LIGHT_ORBIT_RADIUS;

        let mut block = Self::fixed();
        block.positions[0][0] = sin * r;
        block.positions[0][2] = cos * r;
        block.positions[1][0] = cos * r;
        block.positions[1][1] = sin * r;
        block
    }
}

impl Default for LightBlock {
    fn default() -> Self {
        Self::fixed()
    }
}

pub type TransformUBO = UniformBuffer<TransformBlock>;
pub type LightUBO = UniformBuffer<LightBlock>;

/// Bind group 0 of the PBR pipeline
///
/// Created once both uniform buffers exist and never changes afterwards; only buffer
/// contents are rewritten.
pub struct SceneBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl SceneBindings {
    pub fn new(device: &wgpu::Device, transforms: &TransformUBO, lights: &LightUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // transforms
            .next_binding_fragment(binding_types::uniform()) // lights
            .create(device, "Scene Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(transforms.binding_resource())
            .resource(lights.binding_resource())
            .create(device, "Scene Bind Group");

        SceneBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
