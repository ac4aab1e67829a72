//! Error types for the showcase
//!
//! Everything that can fail during setup funnels into [`ShowcaseError`]. Per-frame
//! work does not return errors except for unrecoverable surface failures.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ShowcaseError>;

#[derive(Debug, Error)]
pub enum ShowcaseError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("adapter '{adapter}' does not support push constants")]
    PushConstantsUnsupported { adapter: String },

    #[error("failed to create pipeline '{name}': {reason}")]
    Pipeline { name: String, reason: String },

    #[error("surface error while acquiring frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("failed to load mesh '{}': {source}", path.display())]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("mesh '{}' contains no triangles", path.display())]
    EmptyMesh { path: PathBuf },

    #[error("mesh '{}' references vertex {index} but only has {vertex_count}", path.display())]
    InvalidIndex {
        path: PathBuf,
        index: u32,
        vertex_count: usize,
    },

    #[error("{kind} index {index} is out of range (have {len})")]
    SelectionOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
