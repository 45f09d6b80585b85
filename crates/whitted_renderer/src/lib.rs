//! Whitted Renderer - recursive ray tracing of implicit primitives
//!
//! A Whitted-style ray tracer: one ray per pixel, Phong shading with hard
//! shadows, and mirror reflection up to a fixed depth.
//!
//! Scenes are assembled from the flattened records produced by
//! `whitted_core` and are read-only while rendering.

mod camera;
mod light;
mod primitive;
mod renderer;
mod scene;
mod shape;

pub use camera::Camera;
pub use light::Light;
pub use primitive::{Primitive, TextureBinding};
pub use renderer::{
    color_to_rgba, render, rgba_to_color, Hit, ImageBuffer, RayStats, RenderConfig, Trace,
    TraceMode, Tracer, REFLECTION_EPSILON, SHADOW_EPSILON,
};
pub use scene::Scene;
pub use shape::{Shape, HALF_HEIGHT, PATCH_EPSILON, RADIUS};

/// Re-export Color from whitted_core and common math types from whitted_math
pub use whitted_core::Color;
pub use whitted_math::{Interval, Ray, Vec3};
