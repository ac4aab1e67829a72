// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Uniform blocks, material presets and push-constant layouts, and the depth texture.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{LightBlock, SceneBindings, TransformBlock};
pub use material::{GridPushConstants, MaterialLibrary, MaterialPreset, MaterialPushConstants};
pub use texture_resource::TextureResource;
