//! Core rendering functionality
//!
//! Handles the PBR pipeline, the material grid draw list and frame rendering.

pub mod material_grid;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use material_grid::MaterialGridDrawList;
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{FrameOutcome, RenderEngine};
