//! Whitted Core - scene description, loading and textures.
//!
//! This crate provides:
//!
//! - **Scene records**: the flat list of shapes, camera, lights and global
//!   coefficients that the renderer consumes (`RenderData`)
//! - **Scene files**: JSON scene graphs flattened into `RenderData` by
//!   accumulating transforms depth-first
//! - **Textures**: decoded RGBA images shared through a `TextureCache`
//!
//! # Example
//!
//! ```ignore
//! use whitted_core::load_scene;
//!
//! let data = load_scene("scenes/mirror_spheres.json")?;
//! println!("Loaded {} shapes, {} lights", data.shapes.len(), data.lights.len());
//! ```

pub mod loader;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_from_str, SceneError, SceneResult, MAX_RECURSION_DEPTH};
pub use scene::{
    CameraRecord, Color, GlobalCoefficients, LightKind, LightRecord, Material, PrimitiveKind,
    PrimitiveRecord, RenderData, RenderSettings, SceneFile, SceneNode, ShapeRecord, TextureMap,
    TransformOp,
};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
