//! # Scene Management Module
//!
//! Everything the showcase knows about what to draw, independent of the GPU:
//!
//! - [`Scene`] - selection state, camera, lights and the cached draw list
//! - [`mesh`] - OBJ loading and GPU mesh buffers
//! - [`Vertex3D`] - position + normal vertex format
//! - [`timer`] - light animation phase and frame clock

pub mod mesh;
pub mod scene;
pub mod timer;
pub mod vertex;

// Re-export main types
pub use mesh::{DrawMesh, GpuMesh, MeshAsset, MeshData};
pub use scene::Scene;
pub use timer::{AnimationTimer, FrameClock};
pub use vertex::Vertex3D;
