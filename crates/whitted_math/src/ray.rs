use crate::{Mat4, Vec3};

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be unit length. A ray does not know which
/// space it lives in; callers track whether it is in world or object space and
/// use [`Ray::transform`] to move between them. Parametric distances are
/// preserved by affine transforms, so a `t` found in object space is valid
/// for the world-space ray it came from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray whose origin is nudged `epsilon` along `direction` away from `point`.
    ///
    /// Used for secondary rays leaving a surface so they do not re-hit it.
    pub fn offset_from(point: Vec3, direction: Vec3, epsilon: f32) -> Self {
        Self::new(point + epsilon * direction, direction)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Map this ray through `matrix`: the origin as a point (w=1), the
    /// direction as a vector (w=0).
    pub fn transform(&self, matrix: &Mat4) -> Ray {
        Ray::new(
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }
}
