//! Canonical implicit shapes.
//!
//! Every shape is unit-sized and centered at the object-space origin, with
//! its axis along +Y where it has one. Intersection, normal and UV queries
//! all take object-space quantities; [`crate::Primitive`] handles the
//! transforms.
//!
//! Intersections are parametric distances along the ray. Misses, roots
//! behind the origin and roots outside a patch's bounds are reported as
//! `f32::INFINITY`, so a shape's hit is simply the minimum over its patches.

use std::f32::consts::PI;

use whitted_core::PrimitiveKind;
use whitted_math::{Interval, Ray, Vec2, Vec3};

/// Radius of the sphere, and of the cone base and cylinder.
pub const RADIUS: f32 = 0.5;

/// Half the height of the cube, cone and cylinder.
pub const HALF_HEIGHT: f32 = 0.5;

/// How close a point must be to a cap plane to count as lying on the cap.
pub const PATCH_EPSILON: f32 = 1e-4;

/// Bounds of a unit cube face, and the height range of the cone and cylinder.
const HALF_EXTENT: Interval = Interval::centered(HALF_HEIGHT);

/// The closed set of shapes the tracer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Sphere,
    Cube,
    Cone,
    Cylinder,
}

impl From<PrimitiveKind> for Shape {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Sphere => Shape::Sphere,
            PrimitiveKind::Cube => Shape::Cube,
            PrimitiveKind::Cone => Shape::Cone,
            PrimitiveKind::Cylinder => Shape::Cylinder,
        }
    }
}

impl Shape {
    /// Smallest strictly positive `t` at which the object-space ray meets
    /// the surface, or `f32::INFINITY` if it never does.
    pub fn intersect(&self, ray: &Ray) -> f32 {
        match self {
            Shape::Sphere => intersect_sphere(ray),
            Shape::Cube => intersect_cube(ray),
            Shape::Cone => intersect_cone(ray),
            Shape::Cylinder => intersect_cylinder(ray),
        }
    }

    /// Unnormalized outward normal at an object-space surface point.
    ///
    /// Curved patches return the gradient of their implicit function, flat
    /// patches their constant axis.
    pub fn normal(&self, p: Vec3) -> Vec3 {
        match self {
            Shape::Sphere => 2.0 * p,
            Shape::Cube => {
                let (axis, sign) = cube_face(p);
                sign * Vec3::AXES[axis]
            }
            Shape::Cone => {
                if on_plane(p.y, -HALF_HEIGHT) {
                    Vec3::NEG_Y
                } else {
                    Vec3::new(2.0 * p.x, 0.25 - 0.5 * p.y, 2.0 * p.z)
                }
            }
            Shape::Cylinder => {
                if on_plane(p.y, HALF_HEIGHT) {
                    Vec3::Y
                } else if on_plane(p.y, -HALF_HEIGHT) {
                    Vec3::NEG_Y
                } else {
                    Vec3::new(2.0 * p.x, 0.0, 2.0 * p.z)
                }
            }
        }
    }

    /// Texture coordinates of an object-space surface point.
    ///
    /// Results are nominally in [0, 1]^2; callers clamp to absorb float error
    /// at patch boundaries.
    pub fn uv(&self, p: Vec3) -> Vec2 {
        match self {
            Shape::Sphere => {
                let latitude = (p.y / RADIUS).clamp(-1.0, 1.0).asin();
                Vec2::new(circle_u(p.x, p.z), latitude / PI + 0.5)
            }
            Shape::Cube => {
                let planar = match cube_face(p) {
                    (0, s) if s > 0.0 => Vec2::new(-p.z, p.y),
                    (0, _) => Vec2::new(p.z, p.y),
                    (1, s) if s > 0.0 => Vec2::new(p.x, -p.z),
                    (1, _) => Vec2::new(p.x, p.z),
                    (_, s) if s > 0.0 => Vec2::new(p.x, p.y),
                    _ => Vec2::new(-p.x, p.y),
                };
                planar + 0.5
            }
            Shape::Cone => {
                if on_plane(p.y, -HALF_HEIGHT) {
                    Vec2::new(p.x, p.z) + 0.5
                } else {
                    Vec2::new(circle_u(p.x, p.z), p.y + 0.5)
                }
            }
            Shape::Cylinder => {
                if on_plane(p.y, HALF_HEIGHT) {
                    Vec2::new(p.x, -p.z) + 0.5
                } else if on_plane(p.y, -HALF_HEIGHT) {
                    Vec2::new(p.x, p.z) + 0.5
                } else {
                    Vec2::new(circle_u(p.x, p.z), p.y + 0.5)
                }
            }
        }
    }
}

fn intersect_sphere(ray: &Ray) -> f32 {
    let (o, d) = (ray.origin, ray.direction);
    let roots = solve_quadratic(d.dot(d), 2.0 * o.dot(d), o.dot(o) - RADIUS * RADIUS);
    nearest_root(roots, ray, |_| true)
}

fn intersect_cube(ray: &Ray) -> f32 {
    let mut nearest = f32::INFINITY;
    for axis in 0..3 {
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        for offset in [-HALF_HEIGHT, HALF_HEIGHT] {
            let t = intersect_plane(ray, axis, offset, |p| {
                HALF_EXTENT.contains(p[a]) && HALF_EXTENT.contains(p[b])
            });
            nearest = nearest.min(t);
        }
    }
    nearest
}

fn intersect_cone(ray: &Ray) -> f32 {
    let (o, d) = (ray.origin, ray.direction);

    // x^2 + z^2 = (0.25 - 0.5y)^2, radius shrinking from 0.5 at the base to 0 at the apex
    let a = d.x * d.x + d.z * d.z - 0.25 * d.y * d.y;
    let b = 2.0 * (o.x * d.x + o.z * d.z) - 0.5 * o.y * d.y + 0.25 * d.y;
    let c = o.x * o.x + o.z * o.z - 0.25 * o.y * o.y + 0.25 * o.y - 0.0625;

    // The height bound also rejects the mirrored nappe above the apex
    let lateral = nearest_root(solve_quadratic(a, b, c), ray, |p| HALF_EXTENT.contains(p.y));
    let base = intersect_plane(ray, 1, -HALF_HEIGHT, in_disk);
    lateral.min(base)
}

fn intersect_cylinder(ray: &Ray) -> f32 {
    let (o, d) = (ray.origin, ray.direction);

    let a = d.x * d.x + d.z * d.z;
    let b = 2.0 * (o.x * d.x + o.z * d.z);
    let c = o.x * o.x + o.z * o.z - RADIUS * RADIUS;

    let lateral = nearest_root(solve_quadratic(a, b, c), ray, |p| HALF_EXTENT.contains(p.y));
    let top = intersect_plane(ray, 1, HALF_HEIGHT, in_disk);
    let bottom = intersect_plane(ray, 1, -HALF_HEIGHT, in_disk);
    lateral.min(top).min(bottom)
}

/// Real roots of `a t^2 + b t + c = 0` in ascending order.
///
/// A zero leading coefficient falls back to the linear equation, which
/// happens for rays parallel to a cone's surface.
pub(crate) fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    if a == 0.0 {
        if b == 0.0 {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    // Stable form, avoids cancellation when b^2 >> 4ac
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        return Some((0.0, 0.0));
    }
    let (t0, t1) = (q / a, c / q);
    Some((t0.min(t1), t0.max(t1)))
}

/// Smallest strictly positive root whose hit point passes `in_bounds`.
fn nearest_root(roots: Option<(f32, f32)>, ray: &Ray, in_bounds: impl Fn(Vec3) -> bool) -> f32 {
    let Some((t0, t1)) = roots else {
        return f32::INFINITY;
    };

    [t0, t1]
        .into_iter()
        .filter(|&t| Interval::POSITIVE.surrounds(t) && in_bounds(ray.at(t)))
        .fold(f32::INFINITY, f32::min)
}

/// Hit on the axis-aligned plane `p[axis] = offset`, kept only if positive
/// and inside the patch.
fn intersect_plane(ray: &Ray, axis: usize, offset: f32, in_bounds: impl Fn(Vec3) -> bool) -> f32 {
    // Parallel rays divide by zero and produce inf or NaN, both rejected below
    let t = (offset - ray.origin[axis]) / ray.direction[axis];
    if Interval::POSITIVE.surrounds(t) && in_bounds(ray.at(t)) {
        t
    } else {
        f32::INFINITY
    }
}

fn in_disk(p: Vec3) -> bool {
    p.x * p.x + p.z * p.z <= RADIUS * RADIUS
}

fn on_plane(coordinate: f32, offset: f32) -> bool {
    (coordinate - offset).abs() < PATCH_EPSILON
}

/// Face of the cube a surface point lies on, as (axis, sign).
///
/// The face is the one whose plane the point is closest to, i.e. the axis
/// with the largest magnitude. Edges resolve to the earliest axis (x, y, z).
fn cube_face(p: Vec3) -> (usize, f32) {
    let magnitude = p.abs();
    let axis = if magnitude.x >= magnitude.y && magnitude.x >= magnitude.z {
        0
    } else if magnitude.y >= magnitude.z {
        1
    } else {
        2
    };
    let sign = if p[axis] >= 0.0 { 1.0 } else { -1.0 };
    (axis, sign)
}

/// Fraction of the perimeter swept to reach (a, b) on a circle.
///
/// `a` is the horizontal axis and `b` the downward vertical axis seen from
/// above. The seam sits at theta = 0. The center of the circle (an apex or
/// a pole) has no angle and maps to 0.5.
fn circle_u(a: f32, b: f32) -> f32 {
    if a.hypot(b) <= f32::EPSILON {
        return 0.5;
    }
    let theta = b.atan2(a);
    if theta < 0.0 {
        -theta / (2.0 * PI)
    } else {
        1.0 - theta / (2.0 * PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Shape; 4] = [Shape::Sphere, Shape::Cube, Shape::Cone, Shape::Cylinder];

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    /// Implicit surface and bounds check for a point on `shape`.
    fn on_surface(shape: Shape, p: Vec3) -> bool {
        let tol = 1e-4;
        let within_height = p.y.abs() <= HALF_HEIGHT + tol;
        let in_cap = p.x * p.x + p.z * p.z <= RADIUS * RADIUS + tol;
        match shape {
            Shape::Sphere => approx(p.length_squared(), RADIUS * RADIUS),
            Shape::Cube => {
                let m = p.abs();
                approx(m.max_element(), HALF_HEIGHT)
            }
            Shape::Cone => {
                let r = 0.25 - 0.5 * p.y;
                let lateral = approx(p.x * p.x + p.z * p.z, r * r) && within_height;
                let base = approx(p.y, -HALF_HEIGHT) && in_cap;
                lateral || base
            }
            Shape::Cylinder => {
                let lateral = approx(p.x * p.x + p.z * p.z, RADIUS * RADIUS) && within_height;
                let caps = approx(p.y.abs(), HALF_HEIGHT) && in_cap;
                lateral || caps
            }
        }
    }

    /// Deterministic rays from a shell around the origin toward points inside
    /// every shape, so each ray hits.
    fn probe_rays() -> Vec<Ray> {
        let golden = PI * (3.0 - 5.0_f32.sqrt());
        (0..200)
            .map(|i| {
                let y = 1.0 - 2.0 * (i as f32 + 0.5) / 200.0;
                let r = (1.0 - y * y).sqrt();
                let phi = golden * i as f32;
                let origin = 3.0 * Vec3::new(r * phi.cos(), y, r * phi.sin());
                let target = 0.1 * Vec3::new((phi * 1.7).sin(), (phi * 0.3).cos(), (phi * 2.3).sin());
                Ray::new(origin, target - origin)
            })
            .collect()
    }

    #[test]
    fn test_solve_quadratic_two_roots() {
        // (t - 1)(t - 3)
        let (t0, t1) = solve_quadratic(1.0, -4.0, 3.0).unwrap();
        assert!(approx(t0, 1.0));
        assert!(approx(t1, 3.0));
    }

    #[test]
    fn test_solve_quadratic_no_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_none());
        assert!(solve_quadratic(0.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_solve_quadratic_linear_fallback() {
        let (t0, t1) = solve_quadratic(0.0, 2.0, -4.0).unwrap();
        assert_eq!((t0, t1), (2.0, 2.0));
    }

    #[test]
    fn test_sphere_hit_from_outside() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = Shape::Sphere.intersect(&ray);
        assert!(approx(t, 4.5));
        assert!((Shape::Sphere.normal(ray.at(t)).normalize() - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_sphere_hit_from_inside_takes_positive_root() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(approx(Shape::Sphere.intersect(&ray), 0.5));
    }

    #[test]
    fn test_sphere_behind_ray_is_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(Shape::Sphere.intersect(&ray), f32::INFINITY);
    }

    #[test]
    fn test_cube_face_hit() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_X);
        let t = Shape::Cube.intersect(&ray);
        assert!(approx(t, 1.5));

        let p = ray.at(t);
        assert!((p - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(Shape::Cube.normal(p), Vec3::X);
    }

    #[test]
    fn test_cube_miss_outside_face() {
        let ray = Ray::new(Vec3::new(2.0, 0.6, 0.0), Vec3::NEG_X);
        assert_eq!(Shape::Cube.intersect(&ray), f32::INFINITY);
    }

    #[test]
    fn test_cube_normals_per_face() {
        assert_eq!(Shape::Cube.normal(Vec3::new(-0.5, 0.1, 0.2)), Vec3::NEG_X);
        assert_eq!(Shape::Cube.normal(Vec3::new(0.1, 0.5, -0.2)), Vec3::Y);
        assert_eq!(Shape::Cube.normal(Vec3::new(0.1, -0.5, 0.2)), Vec3::NEG_Y);
        assert_eq!(Shape::Cube.normal(Vec3::new(0.1, 0.2, 0.5)), Vec3::Z);
        assert_eq!(Shape::Cube.normal(Vec3::new(0.1, 0.2, -0.5)), Vec3::NEG_Z);
    }

    #[test]
    fn test_cylinder_cap_and_side() {
        let down = Ray::new(Vec3::new(0.1, 2.0, 0.0), Vec3::NEG_Y);
        let t = Shape::Cylinder.intersect(&down);
        assert!(approx(t, 1.5));
        assert_eq!(Shape::Cylinder.normal(down.at(t)), Vec3::Y);

        let side = Ray::new(Vec3::new(0.0, 0.2, -3.0), Vec3::Z);
        let t = Shape::Cylinder.intersect(&side);
        assert!(approx(t, 2.5));
        let n = Shape::Cylinder.normal(side.at(t)).normalize();
        assert!((n - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_cylinder_misses() {
        // Passes above the top cap
        let above = Ray::new(Vec3::new(-3.0, 0.7, 0.0), Vec3::X);
        assert_eq!(Shape::Cylinder.intersect(&above), f32::INFINITY);

        // Parallel to the axis, outside the radius
        let parallel = Ray::new(Vec3::new(0.6, 3.0, 0.0), Vec3::NEG_Y);
        assert_eq!(Shape::Cylinder.intersect(&parallel), f32::INFINITY);
    }

    #[test]
    fn test_cone_base_and_side() {
        let up = Ray::new(Vec3::new(0.0, -2.0, 0.1), Vec3::Y);
        let t = Shape::Cone.intersect(&up);
        assert!(approx(t, 1.5));
        assert_eq!(Shape::Cone.normal(up.at(t)), Vec3::NEG_Y);

        // Radius is 0.25 at mid height
        let side = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_X);
        assert!(approx(Shape::Cone.intersect(&side), 1.75));
    }

    #[test]
    fn test_cone_rejects_mirrored_nappe() {
        // Would hit the double cone's upper half at y=0.75
        let ray = Ray::new(Vec3::new(2.0, 0.75, 0.0), Vec3::NEG_X);
        assert_eq!(Shape::Cone.intersect(&ray), f32::INFINITY);
    }

    #[test]
    fn test_cone_ray_parallel_to_surface() {
        // Direction along a generator line makes the leading coefficient zero;
        // starts inside the cone and leaves through the side at mid height
        let ray = Ray::new(Vec3::new(-0.05, -0.4, 0.0), Vec3::new(-0.5, 1.0, 0.0));
        let t = Shape::Cone.intersect(&ray);
        assert!(approx(t, 0.4));
        assert!((ray.at(t) - Vec3::new(-0.25, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_intersections_lie_on_surface() {
        for shape in ALL {
            for ray in probe_rays() {
                let t = shape.intersect(&ray);
                assert!(t > 0.0 && t.is_finite(), "{:?} returned t {}", shape, t);
                let p = ray.at(t);
                assert!(on_surface(shape, p), "{:?} hit {:?} is off the surface", shape, p);
            }
        }
    }

    #[test]
    fn test_curved_normals_are_orthogonal_to_tangents() {
        for i in 0..16 {
            let phi = i as f32 * PI / 8.0;
            let around = Vec3::new(-phi.sin(), 0.0, phi.cos());

            // Cylinder side at y = 0.2
            let p = Vec3::new(RADIUS * phi.cos(), 0.2, RADIUS * phi.sin());
            let n = Shape::Cylinder.normal(p);
            assert!(n.dot(around).abs() < 1e-5);
            assert!(n.dot(Vec3::Y).abs() < 1e-5);

            // Cone side at y = 0.1, second tangent runs toward the apex
            let y = 0.1;
            let r = 0.25 - 0.5 * y;
            let p = Vec3::new(r * phi.cos(), y, r * phi.sin());
            let n = Shape::Cone.normal(p);
            let toward_apex = Vec3::new(0.0, HALF_HEIGHT, 0.0) - p;
            assert!(n.dot(around).abs() < 1e-5);
            assert!(n.dot(toward_apex).abs() < 1e-5);

            // Sphere on a latitude circle
            let lat = 0.3_f32;
            let p = RADIUS * Vec3::new(lat.cos() * phi.cos(), lat.sin(), lat.cos() * phi.sin());
            let n = Shape::Sphere.normal(p);
            assert!(n.dot(around).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_uv() {
        let uv = Shape::Sphere.uv(Vec3::new(0.0, 0.0, 0.5));
        assert!(approx(uv.x, 0.75) && approx(uv.y, 0.5));

        let uv = Shape::Sphere.uv(Vec3::new(0.0, 0.0, -0.5));
        assert!(approx(uv.x, 0.25) && approx(uv.y, 0.5));

        // Poles have no longitude
        let uv = Shape::Sphere.uv(Vec3::new(0.0, 0.5, 0.0));
        assert!(approx(uv.x, 0.5) && approx(uv.y, 1.0));
        let uv = Shape::Sphere.uv(Vec3::new(0.0, -0.5, 0.0));
        assert!(approx(uv.x, 0.5) && approx(uv.y, 0.0));
    }

    #[test]
    fn test_cone_apex_uv() {
        let uv = Shape::Cone.uv(Vec3::new(0.0, HALF_HEIGHT, 0.0));
        assert!(approx(uv.x, 0.5) && approx(uv.y, 1.0));
    }

    #[test]
    fn test_cylinder_cap_uv() {
        // Top cap is seen from above with v running toward -z
        let uv = Shape::Cylinder.uv(Vec3::new(0.2, HALF_HEIGHT, 0.1));
        assert!(approx(uv.x, 0.7) && approx(uv.y, 0.4), "{:?}", uv);

        let uv = Shape::Cylinder.uv(Vec3::new(0.2, -HALF_HEIGHT, 0.1));
        assert!(approx(uv.x, 0.7) && approx(uv.y, 0.6), "{:?}", uv);
    }

    #[test]
    fn test_cone_base_uv() {
        let uv = Shape::Cone.uv(Vec3::new(-0.1, -HALF_HEIGHT, 0.3));
        assert!(approx(uv.x, 0.4) && approx(uv.y, 0.8), "{:?}", uv);
    }

    #[test]
    fn test_curved_side_uv() {
        // u sweeps clockwise seen from above: +z is a quarter from the end
        let uv = Shape::Cylinder.uv(Vec3::new(0.0, 0.25, 0.5));
        assert!(approx(uv.x, 0.75) && approx(uv.y, 0.75), "{:?}", uv);

        let uv = Shape::Cylinder.uv(Vec3::new(0.0, -0.25, -0.5));
        assert!(approx(uv.x, 0.25) && approx(uv.y, 0.25), "{:?}", uv);

        // Halfway up the cone the radius is 0.25
        let uv = Shape::Cone.uv(Vec3::new(0.0, 0.0, -0.25));
        assert!(approx(uv.x, 0.25) && approx(uv.y, 0.5), "{:?}", uv);

        let uv = Shape::Cone.uv(Vec3::new(-0.25, 0.0, 0.0));
        assert!(approx(uv.x, 0.5) && approx(uv.y, 0.5), "{:?}", uv);
    }

    #[test]
    fn test_cube_uv_per_face() {
        let uv = Shape::Cube.uv(Vec3::new(0.5, 0.25, -0.25));
        assert!(approx(uv.x, 0.75) && approx(uv.y, 0.75));

        let uv = Shape::Cube.uv(Vec3::new(0.25, 0.25, -0.5));
        assert!(approx(uv.x, 0.25) && approx(uv.y, 0.75));
    }

    #[test]
    fn test_uv_in_unit_square() {
        for shape in ALL {
            for ray in probe_rays() {
                let t = shape.intersect(&ray);
                if t.is_finite() {
                    let uv = shape.uv(ray.at(t));
                    assert!(uv.x > -1e-3 && uv.x < 1.0 + 1e-3, "{:?} u={}", shape, uv.x);
                    assert!(uv.y > -1e-3 && uv.y < 1.0 + 1e-3, "{:?} v={}", shape, uv.y);
                }
            }
        }
    }
}
