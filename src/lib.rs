// src/lib.rs
//! PBR Basic
//!
//! A physically based rendering showcase built on wgpu and winit. A 7x7 grid of one
//! mesh sweeps metallic along X and roughness along Z for a selectable metal preset,
//! lit by four point lights that can orbit the grid.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::PbrApp;
pub use config::ShowcaseConfig;
pub use error::{Result, ShowcaseError};
