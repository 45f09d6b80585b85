//! Render-ready scene assembled from flattened scene records.

use whitted_core::{GlobalCoefficients, RenderData, TextureCache, TextureResult};

use crate::{Camera, Light, Primitive, Shape, TextureBinding};

/// Immutable snapshot of everything a render reads.
///
/// Primitive order is the scene-graph traversal order and decides ties in
/// the nearest-hit search.
#[derive(Debug, Clone)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    pub primitives: Vec<Primitive>,
    pub lights: Vec<Light>,
    pub globals: GlobalCoefficients,
}

impl Scene {
    /// Assemble a scene for a `width` x `height` image, loading every
    /// referenced texture through `textures`.
    pub fn build(
        data: &RenderData,
        width: u32,
        height: u32,
        textures: &mut TextureCache,
    ) -> TextureResult<Self> {
        let mut primitives = Vec::with_capacity(data.shapes.len());
        for shape in &data.shapes {
            let texture = match &shape.material.texture {
                Some(map) => Some(TextureBinding {
                    texture: textures.load(&map.filename)?,
                    repeat_u: map.repeat_u,
                    repeat_v: map.repeat_v,
                }),
                None => None,
            };

            primitives.push(Primitive::new(
                Shape::from(shape.kind),
                shape.object_to_world,
                shape.material.clone(),
                texture,
            ));
        }

        let lights: Vec<Light> = data.lights.iter().map(Light::from).collect();

        log::debug!(
            "Built scene: {} primitives, {} lights, {} textures",
            primitives.len(),
            lights.len(),
            textures.len()
        );

        Ok(Self {
            width,
            height,
            camera: Camera::from_record(&data.camera, width, height),
            primitives,
            lights,
            globals: data.globals,
        })
    }

    /// Assemble a scene at the resolution stored in the scene settings.
    pub fn from_render_data(data: &RenderData, textures: &mut TextureCache) -> TextureResult<Self> {
        Self::build(data, data.settings.width, data.settings.height, textures)
    }
}
