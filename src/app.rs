use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::ShowcaseConfig,
    error::{Result, ShowcaseError},
    gfx::{
        rendering::render_engine::{FrameOutcome, RenderEngine},
        scene::{
            mesh::{MeshAsset, MeshData},
            scene::Scene,
            timer::FrameClock,
        },
    },
    ui::{settings_panel, OverlayStats, Selection, SettingsChange, UiManager},
};

/// The material showcase application
///
/// Owns the event loop until [`PbrApp::run`] hands it to winit.
pub struct PbrApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ShowcaseConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    clock: FrameClock,
    show_overlay: bool,
    /// First error that stopped the event loop
    fatal: Option<ShowcaseError>,
}

impl PbrApp {
    /// Creates the application; nothing touches the GPU until the window exists
    pub fn new(config: ShowcaseConfig) -> Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new()?;

        let (width, height) = config.window_size;
        let scene = Scene::new(&config, width as f32 / height as f32);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                clock: FrameClock::new(),
                show_overlay: true,
                fatal: None,
            },
        })
    }

    /// Runs until the window closes, returns the error that ended the loop if any
    pub fn run(mut self) -> Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| ShowcaseError::Config("event loop already consumed".to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Reads every mesh in selection order; the first failure aborts
fn load_meshes(config: &ShowcaseConfig, assets: &[MeshAsset]) -> Result<Vec<(String, MeshData)>> {
    assets
        .iter()
        .map(|asset| {
            let path = config.model_path(&asset.file);
            log::info!("Loading mesh '{}' from {}", asset.title, path.display());
            MeshData::from_obj(&path).map(|data| (asset.title.clone(), data))
        })
        .collect()
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop.create_window(
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_inner_size(PhysicalSize::new(width, height)),
        )?;
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let meshes = load_meshes(&self.config, self.scene.mesh_assets())?;

        let (width, height) = window_handle.inner_size().into();
        let mut renderer = pollster::block_on(RenderEngine::new(
            window_handle.clone(),
            width,
            height,
            &self.config,
        ))?;
        renderer.upload_meshes(&meshes);
        self.scene.resize(width, height);

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.clock = FrameClock::new();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ShowcaseError) {
        log::error!("{}", error);
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
        event_loop.exit();
    }

    /// Handles the showcase's own keys, returns whether the key was consumed
    fn handle_app_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return false;
        };
        if event.state != ElementState::Pressed {
            return false;
        }

        match key_code {
            KeyCode::Escape => {
                event_loop.exit();
                true
            }
            KeyCode::KeyP if !event.repeat => {
                self.scene.toggle_pause();
                true
            }
            KeyCode::F1 if !event.repeat => {
                self.show_overlay = !self.show_overlay;
                true
            }
            _ => false,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.clone())
        else {
            return;
        };

        let dt = self.clock.tick();
        self.scene.update(dt);

        // UI first so selection changes land in this frame's draw list
        let mut change = SettingsChange::default();
        let ui_manager = match self.ui_manager.as_mut() {
            Some(ui_manager) if self.show_overlay => {
                let mut selection = Selection {
                    material: self.scene.selected_material_index(),
                    mesh: self.scene.selected_mesh_index(),
                };
                let stats = OverlayStats {
                    fps: self.clock.fps(),
                    adapter: render_engine.adapter_name().to_string(),
                    paused: self.scene.is_paused(),
                };
                let scene = &self.scene;
                ui_manager.update_logic(&window, |ui| {
                    change = settings_panel(
                        ui,
                        scene.material_titles(),
                        scene.mesh_titles(),
                        &mut selection,
                        &stats,
                    );
                });
                Some(ui_manager)
            }
            _ => None,
        };

        if let Some(index) = change.material {
            if let Err(e) = self.scene.select_material(index) {
                log::warn!("{}", e);
            }
        }
        if let Some(index) = change.mesh {
            if let Err(e) = self.scene.select_mesh(index) {
                log::warn!("{}", e);
            }
        }
        self.scene.refresh_draw_list();

        render_engine.update(&self.scene.transform_block(), &self.scene.light_block());

        let outcome = match ui_manager {
            Some(ui_manager) => render_engine.render_frame(
                &self.scene,
                Some(|device: &wgpu::Device,
                      queue: &wgpu::Queue,
                      encoder: &mut wgpu::CommandEncoder,
                      color_attachment: &wgpu::TextureView| {
                    ui_manager.render_display_only(device, queue, encoder, color_attachment);
                }),
            ),
            None => render_engine.render_frame(
                &self.scene,
                None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
            ),
        };

        match outcome {
            Ok(FrameOutcome::Presented) => {}
            Ok(other) => log::debug!("Frame not presented: {:?}", other),
            Err(e) => self.fail(event_loop, e),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first
        let ui_captured = match self.ui_manager.as_mut() {
            Some(ui_manager) if self.show_overlay => ui_manager.handle_input(&window, window_id, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if !self.handle_app_key(event_loop, &key_event) && !ui_captured {
                    self.scene.camera_manager.process_keyboard_event(&key_event);
                }
            }
            WindowEvent::Focused(false) => {
                self.scene.camera_manager.controller.release_all();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Don't steer the camera while the overlay has the mouse
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if self.show_overlay && ui_manager.wants_mouse() {
                return;
            }
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
