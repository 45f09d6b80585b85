//! Scene primitives: a canonical [`Shape`] placed in the world.

use std::sync::Arc;

use whitted_core::{Color, Material, Texture};
use whitted_math::{Interval, Mat3, Mat4, Mat4Ext, Ray, Vec2, Vec3};

use crate::shape::Shape;

/// A texture shared with other primitives, plus this primitive's tiling.
#[derive(Debug, Clone)]
pub struct TextureBinding {
    pub texture: Arc<Texture>,
    pub repeat_u: f32,
    pub repeat_v: f32,
}

/// A shape with its object-to-world transform, material and optional texture.
///
/// The inverse transform and normal matrix are derived once at construction
/// and never change afterwards.
#[derive(Debug, Clone)]
pub struct Primitive {
    shape: Shape,
    object_to_world: Mat4,
    world_to_object: Mat4,
    normal_matrix: Mat3,
    material: Material,
    texture: Option<TextureBinding>,
}

impl Primitive {
    /// Create a new primitive.
    pub fn new(
        shape: Shape,
        object_to_world: Mat4,
        material: Material,
        texture: Option<TextureBinding>,
    ) -> Self {
        Self {
            shape,
            object_to_world,
            world_to_object: object_to_world.inverse(),
            normal_matrix: object_to_world.normal_matrix(),
            material,
            texture,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn texture(&self) -> Option<&TextureBinding> {
        self.texture.as_ref()
    }

    pub fn object_to_world(&self) -> Mat4 {
        self.object_to_world
    }

    /// Intersect a world-space ray, returning the parametric distance and
    /// the object-space hit point.
    ///
    /// The distance is measured along the world-space ray since the
    /// transform is affine.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        let local = ray.transform(&self.world_to_object);
        let t = self.shape.intersect(&local);
        t.is_finite().then(|| (t, local.at(t)))
    }

    /// Map an object-space point (w=1) or vector (w=0) to world space.
    pub fn apply_transform(&self, value: Vec3, is_vector: bool) -> Vec3 {
        if is_vector {
            self.object_to_world.transform_vector3(value)
        } else {
            self.object_to_world.transform_point3(value)
        }
    }

    /// Map a world-space point (w=1) or vector (w=0) to object space.
    pub fn apply_inverse_transform(&self, value: Vec3, is_vector: bool) -> Vec3 {
        if is_vector {
            self.world_to_object.transform_vector3(value)
        } else {
            self.world_to_object.transform_point3(value)
        }
    }

    /// Unit world-space normal at an object-space surface point.
    pub fn world_normal(&self, object_point: Vec3) -> Vec3 {
        (self.normal_matrix * self.shape.normal(object_point)).normalize_or_zero()
    }

    /// Clamped texture coordinates at an object-space surface point.
    pub fn uv(&self, object_point: Vec3) -> Vec2 {
        let uv = self.shape.uv(object_point);
        Vec2::new(Interval::UNIT.clamp(uv.x), Interval::UNIT.clamp(uv.y))
    }

    /// Texture color at an object-space surface point, black when no texture
    /// is bound.
    pub fn sample_texture(&self, object_point: Vec3) -> Color {
        let Some(binding) = &self.texture else {
            return Color::ZERO;
        };

        let uv = self.uv(object_point);
        let [r, g, b, _] = binding
            .texture
            .texel_at_uv(uv.x, uv.y, binding.repeat_u, binding.repeat_v);
        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}
