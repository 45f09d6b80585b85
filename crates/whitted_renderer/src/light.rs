//! Light sources for the Phong shading model.
//!
//! Spot falloff uses the angle from the spot axis: full color inside
//! `angle - penumbra`, a smoothstep ramp down to zero at `angle`, and nothing
//! outside the cone.

use whitted_core::{Color, LightKind, LightRecord};
use whitted_math::Vec3;

/// A light in world space.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Point {
        position: Vec3,
        color: Color,
        /// Constant, linear and quadratic coefficients
        attenuation: Vec3,
    },
    Directional {
        /// Direction the light travels in
        direction: Vec3,
        color: Color,
    },
    Spot {
        position: Vec3,
        /// Direction the spot points in
        direction: Vec3,
        color: Color,
        attenuation: Vec3,
        /// Outer cone half-angle in radians
        angle: f32,
        /// Width of the falloff band in radians
        penumbra: f32,
    },
}

impl From<&LightRecord> for Light {
    fn from(record: &LightRecord) -> Self {
        match record.kind {
            LightKind::Point => Light::Point {
                position: record.position,
                color: record.color,
                attenuation: record.attenuation,
            },
            LightKind::Directional => Light::Directional {
                direction: record.direction,
                color: record.color,
            },
            LightKind::Spot => Light::Spot {
                position: record.position,
                direction: record.direction,
                color: record.color,
                attenuation: record.attenuation,
                angle: record.angle,
                penumbra: record.penumbra,
            },
        }
    }
}

impl Light {
    /// Unit vector from `point` toward the light.
    pub fn direction_to_light(&self, point: Vec3) -> Vec3 {
        match self {
            Light::Point { position, .. } | Light::Spot { position, .. } => {
                (*position - point).normalize_or_zero()
            }
            Light::Directional { direction, .. } => (-*direction).normalize_or_zero(),
        }
    }

    /// Distance from `point` to the light, infinite for directional lights.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        match self {
            Light::Point { position, .. } | Light::Spot { position, .. } => {
                position.distance(point)
            }
            Light::Directional { .. } => f32::INFINITY,
        }
    }

    /// Distance attenuation factor in [0, 1].
    pub fn attenuation(&self, distance: f32) -> f32 {
        let coefficients = match self {
            Light::Point { attenuation, .. } | Light::Spot { attenuation, .. } => *attenuation,
            Light::Directional { .. } => return 1.0,
        };

        let denominator =
            coefficients.x + coefficients.y * distance + coefficients.z * distance * distance;
        if denominator <= 0.0 {
            // No usable falloff, treat the light as unattenuated
            return 1.0;
        }
        (1.0 / denominator).min(1.0)
    }

    /// Light color arriving at `point`, including the spot cone falloff.
    pub fn color_at(&self, point: Vec3) -> Color {
        match self {
            Light::Point { color, .. } | Light::Directional { color, .. } => *color,
            Light::Spot {
                position,
                direction,
                color,
                angle,
                penumbra,
                ..
            } => *color * (1.0 - spot_falloff(point - *position, *direction, *angle, *penumbra)),
        }
    }
}

/// Fraction of a spot light's color removed at `offset` from the light:
/// 0 in the inner cone, 1 outside the outer cone.
fn spot_falloff(offset: Vec3, axis: Vec3, angle: f32, penumbra: f32) -> f32 {
    let theta = angle_from_axis(offset, axis);
    let (inner, outer) = (angle - penumbra, angle);

    if theta > outer {
        1.0
    } else if theta <= inner {
        0.0
    } else {
        smoothstep((theta - inner) / (outer - inner))
    }
}

/// Angle between `offset` and `axis` in radians.
///
/// A zero offset lies at the light itself and counts as on-axis.
fn angle_from_axis(offset: Vec3, axis: Vec3) -> f32 {
    let distance = offset.length();
    if distance == 0.0 {
        return 0.0;
    }
    let cos_theta = offset.dot(axis.normalize_or_zero()) / distance;
    cos_theta.clamp(-1.0, 1.0).acos()
}

fn smoothstep(s: f32) -> f32 {
    -2.0 * s * s * s + 3.0 * s * s
}
