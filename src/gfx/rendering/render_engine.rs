//! WGPU-based rendering engine for the material showcase
//!
//! Owns the surface, device and every GPU resource of the PBR pass: depth buffer,
//! scene uniforms, the pipeline and the uploaded meshes. Each frame draws the
//! scene's material grid followed by an optional UI overlay.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    config::ShowcaseConfig,
    error::{Result, ShowcaseError},
    gfx::{
        resources::{
            global_bindings::{LightBlock, LightUBO, SceneBindings, TransformBlock, TransformUBO},
            material::GridPushConstants,
            texture_resource::TextureResource,
        },
        scene::{
            mesh::{GpuMesh, MeshData},
            scene::Scene,
        },
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const PBR_PIPELINE: &str = "PBR";
const PBR_SHADER: &str = "pbr";

/// What happened to a frame handed to [`RenderEngine::render_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// The surface was lost or outdated and has been reconfigured
    Reconfigured,
    /// No surface texture became available in time
    Skipped,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    adapter_name: String,
    clear_color: wgpu::Color,
    pipeline_manager: PipelineManager,
    transform_ubo: TransformUBO,
    light_ubo: LightUBO,
    scene_bindings: SceneBindings,
    meshes: Vec<GpuMesh>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Requests a device with push constants, configures the surface with a linear
    /// (non-sRGB) format since the shader applies its own gamma, and builds the PBR
    /// pipeline.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `showcase` - Present mode and clear colour come from here
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        showcase: &ShowcaseConfig,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_name = adapter.get_info().name;
        log::info!("Using adapter: {}", adapter_name);

        if !adapter.features().contains(wgpu::Features::PUSH_CONSTANTS) {
            return Err(ShowcaseError::PushConstantsUnsupported {
                adapter: adapter_name,
            });
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::PUSH_CONSTANTS,
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    max_push_constant_size: 128,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| ShowcaseError::Config("surface reports no formats".to_string()))?;

        let (width, height) =
            clamp_surface_size(width, height, device.limits().max_texture_dimension_2d);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: present_mode(showcase.vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::debug!("Surface configured: {:?} {}x{}", format, config.width, config.height);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        // Transforms are written before the first frame
        let transform_ubo = TransformUBO::new_with_data(&device, &bytemuck::Zeroable::zeroed());
        let light_ubo = LightUBO::new_with_data(&device, &LightBlock::fixed());
        let scene_bindings = SceneBindings::new(&device, &transform_ubo, &light_ubo);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader(PBR_SHADER, include_str!("pbr.wgsl"));
        pipeline_manager.register_pipeline(
            PBR_PIPELINE,
            PipelineConfig::default()
                .with_label(PBR_PIPELINE)
                .with_shader(PBR_SHADER)
                .with_depth(TextureResource::DEPTH_FORMAT, wgpu::CompareFunction::LessEqual)
                .with_bind_group_layouts(vec![scene_bindings.bind_group_layout().clone()])
                .with_push_constant_ranges(vec![wgpu::PushConstantRange {
                    stages: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    range: 0..GridPushConstants::SIZE,
                }])
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );
        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            adapter_name,
            clear_color: showcase.clear_color,
            pipeline_manager,
            transform_ubo,
            light_ubo,
            scene_bindings,
            meshes: Vec::new(),
        })
    }

    /// Uploads the mesh list, replacing any previous one
    ///
    /// Index `i` here is mesh selection index `i` of the scene.
    pub fn upload_meshes(&mut self, meshes: &[(String, MeshData)]) {
        self.meshes = meshes
            .iter()
            .map(|(title, data)| GpuMesh::upload(&self.device, data, title))
            .collect();
        log::info!("Uploaded {} meshes", self.meshes.len());
    }

    /// Writes the per-frame uniforms, skipping blocks that did not change
    pub fn update(&mut self, transforms: &TransformBlock, lights: &LightBlock) {
        self.transform_ubo.update_content(&self.queue, *transforms);
        self.light_ubo.update_content(&self.queue, *lights);
    }

    /// Renders the scene's draw list and an optional UI overlay
    ///
    /// Lost or outdated surfaces are reconfigured and the frame is dropped, timeouts
    /// skip the frame. Any other surface error is returned.
    ///
    /// # Arguments
    /// * `scene` - Scene whose draw list is replayed, refresh it first
    /// * `ui_callback` - Optional function that renders UI elements on top
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>) -> Result<FrameOutcome>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(FrameOutcome::Reconfigured);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for a surface texture");
                return Ok(FrameOutcome::Skipped);
            }
            Err(e) => return Err(e.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let draw_list = scene.draw_list();
            let pipeline = self.pipeline_manager.pipeline(PBR_PIPELINE);
            let mesh = self.meshes.get(draw_list.mesh_index());

            match (pipeline, mesh) {
                (Some(pipeline), Some(mesh)) => {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, self.scene_bindings.bind_group(), &[]);
                    draw_list.record(&mut render_pass, mesh);
                }
                (None, _) => log::error!("Pipeline '{}' is missing", PBR_PIPELINE),
                (_, None) => log::warn!(
                    "Mesh {} has not been uploaded, drawing nothing",
                    draw_list.mesh_index()
                ),
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(FrameOutcome::Presented)
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimised windows) are ignored. Sizes beyond the device's
    /// texture limit are clamped to it.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let (width, height) =
            clamp_surface_size(width, height, self.device.limits().max_texture_dimension_2d);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }
}

/// Keeps both sides within `1..=max_dimension`
fn clamp_surface_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let clamped = (width.clamp(1, max_dimension), height.clamp(1, max_dimension));
    if clamped != (width, height) {
        log::warn!(
            "Surface size {}x{} exceeds the device limit, using {}x{}",
            width,
            height,
            clamped.0,
            clamped.1
        );
    }
    clamped
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::Immediate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_mode_follows_vsync() {
        assert_eq!(present_mode(true), wgpu::PresentMode::Fifo);
        assert_eq!(present_mode(false), wgpu::PresentMode::Immediate);
    }

    #[test]
    fn test_surface_size_stays_within_texture_limit() {
        assert_eq!(clamp_surface_size(1280, 720, 4096), (1280, 720));
        assert_eq!(clamp_surface_size(5120, 1440, 4096), (4096, 1440));
        assert_eq!(clamp_surface_size(7680, 4320, 4096), (4096, 4096));
        assert_eq!(clamp_surface_size(0, 720, 4096), (1, 720));
    }
}
