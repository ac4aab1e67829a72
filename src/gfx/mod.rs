//! # Graphics Module
//!
//! Camera, rendering, scene state and GPU resources of the material showcase.
//!
//! - **Camera** ([`camera`]) - first-person camera driven by keyboard and mouse
//! - **Rendering** ([`rendering`]) - PBR pipeline and the material grid draw list
//! - **Scene** ([`scene`]) - material/mesh selection, animated lights, meshes
//! - **Resources** ([`resources`]) - uniform blocks, push constants, depth texture
//!
//! The [`RenderEngine`] never mutates the [`Scene`]; the application refreshes the
//! scene's draw list and uniforms before handing it over each frame.
//!
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::first_person_camera::FirstPersonCamera;
pub use rendering::render_engine::RenderEngine;
