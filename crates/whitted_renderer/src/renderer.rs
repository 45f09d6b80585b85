//! Recursive Whitted ray tracer.
//!
//! Implements:
//! - One primary ray per pixel center
//! - Linear nearest-hit search over the scene primitives
//! - Phong shading (ambient, diffuse, specular) with hard shadows
//! - Mirror reflection up to a fixed recursion depth

use std::cell::Cell;
use std::time::Instant;

use whitted_core::{Color, RenderSettings};
use whitted_math::{Interval, Ray, Vec3};

use crate::{Primitive, Scene};

/// Offset along the light direction for shadow probe origins.
pub const SHADOW_EPSILON: f32 = 0.001;

/// Offset along the mirror direction for reflection ray origins.
pub const REFLECTION_EPSILON: f32 = 0.0001;

const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 255];

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Maximum number of reflection bounces
    pub max_depth: u32,
    /// Cast shadow probes toward each light
    pub shadows: bool,
    /// Follow mirror reflections
    pub reflections: bool,
    /// Sample bound textures; when off every primitive shades as untextured
    pub texture_mapping: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            shadows: true,
            reflections: true,
            texture_mapping: true,
        }
    }
}

impl From<&RenderSettings> for RenderConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            max_depth: settings.max_depth,
            shadows: settings.shadows,
            reflections: settings.reflections,
            texture_mapping: settings.texture_mapping,
        }
    }
}

/// How a traced ray is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    /// Camera or reflection ray, shaded at the given bounce depth
    Primary { depth: u32 },
    /// Occlusion query toward a light, never shaded
    ShadowProbe,
}

/// Nearest intersection found along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the primitive in the scene
    pub index: usize,
    /// Parametric distance along the world-space ray
    pub t: f32,
    /// Hit point in the primitive's object space
    pub object_point: Vec3,
}

/// Result of tracing a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trace {
    pub color: [u8; 4],
    /// Distance to the nearest hit, +inf on a miss
    pub nearest_t: f32,
}

/// Ray counts accumulated over a render.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RayStats {
    pub primary: u64,
    pub shadow: u64,
    pub reflection: u64,
}

impl RayStats {
    pub fn total(&self) -> u64 {
        self.primary + self.shadow + self.reflection
    }
}

/// Clamp a color to [0, 1] and quantize it to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * Interval::UNIT.clamp(color.x)) as u8;
    let g = (255.0 * Interval::UNIT.clamp(color.y)) as u8;
    let b = (255.0 * Interval::UNIT.clamp(color.z)) as u8;
    [r, g, b, 255]
}

/// Convert an 8-bit RGBA value back to a normalized color.
pub fn rgba_to_color(rgba: [u8; 4]) -> Color {
    Color::new(rgba[0] as f32, rgba[1] as f32, rgba[2] as f32) / 255.0
}

/// Mirror `v` about the unit normal `n`.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Traces rays through a read-only scene.
pub struct Tracer<'a> {
    scene: &'a Scene,
    config: RenderConfig,
    stats: Cell<RayStats>,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, config: RenderConfig) -> Self {
        Self {
            scene,
            config,
            stats: Cell::new(RayStats::default()),
        }
    }

    /// Ray counts so far.
    pub fn stats(&self) -> RayStats {
        self.stats.get()
    }

    fn count(&self, update: impl FnOnce(&mut RayStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Nearest primitive hit along a world-space ray.
    ///
    /// A later primitive replaces the current best only when strictly
    /// closer, so the first primitive wins ties.
    pub fn find_nearest_hit(&self, ray: &Ray) -> Option<Hit> {
        let mut nearest: Option<Hit> = None;
        for (index, primitive) in self.scene.primitives.iter().enumerate() {
            let Some((t, object_point)) = primitive.intersect(ray) else {
                continue;
            };
            if t > 0.0 && nearest.map_or(true, |best| t < best.t) {
                nearest = Some(Hit {
                    index,
                    t,
                    object_point,
                });
            }
        }
        nearest
    }

    /// Trace a ray, shading the nearest hit unless this is a shadow probe.
    pub fn trace(&self, ray: &Ray, mode: TraceMode) -> Trace {
        let hit = self.find_nearest_hit(ray);
        let nearest_t = hit.map_or(f32::INFINITY, |hit| hit.t);

        let color = match (mode, hit) {
            (TraceMode::Primary { depth }, Some(hit)) => self.shade(ray, &hit, depth),
            _ => OPAQUE_BLACK,
        };

        Trace { color, nearest_t }
    }

    /// Trace the primary ray through the center of pixel (row, col).
    pub fn render_pixel(&self, row: u32, col: u32) -> [u8; 4] {
        let scene = self.scene;
        let ray = scene
            .camera
            .ray_for_pixel(row, col, scene.width, scene.height);
        self.count(|stats| stats.primary += 1);
        self.trace(&ray, TraceMode::Primary { depth: 0 }).color
    }

    fn shade(&self, ray: &Ray, hit: &Hit, depth: u32) -> [u8; 4] {
        let primitive = &self.scene.primitives[hit.index];
        let hit_point = primitive.apply_transform(hit.object_point, false);
        let normal = primitive.world_normal(hit.object_point);

        let texture_color = if self.config.texture_mapping {
            primitive.sample_texture(hit.object_point)
        } else {
            Color::ZERO
        };

        self.phong(hit_point, normal, -ray.direction, primitive, texture_color, depth)
    }

    /// Phong illumination at a world-space surface point, plus the mirror
    /// reflection continuation.
    fn phong(
        &self,
        hit_point: Vec3,
        normal: Vec3,
        dir_to_camera: Vec3,
        primitive: &Primitive,
        texture_color: Color,
        depth: u32,
    ) -> [u8; 4] {
        let globals = self.scene.globals;
        let material = primitive.material();
        let normal = normal.normalize_or_zero();
        let dir_to_camera = dir_to_camera.normalize_or_zero();

        let mut color = globals.ka * material.ambient;

        let surface = material.blend * texture_color
            + (1.0 - material.blend) * (globals.kd * material.diffuse);

        for light in &self.scene.lights {
            let dir_to_light = light.direction_to_light(hit_point);
            let dist_to_light = light.distance_to(hit_point);

            if self.config.shadows {
                let probe = Ray::offset_from(hit_point, dir_to_light, SHADOW_EPSILON);
                self.count(|stats| stats.shadow += 1);
                if self.trace(&probe, TraceMode::ShadowProbe).nearest_t < dist_to_light {
                    continue;
                }
            }

            let n_dot_l = normal.dot(dir_to_light);
            if n_dot_l <= 0.0 {
                continue;
            }

            let radiance = light.attenuation(dist_to_light) * light.color_at(hit_point);
            color += radiance * surface * n_dot_l;

            let r_dot_v = reflect(-dir_to_light, normal).dot(dir_to_camera).max(0.0);
            color += radiance * globals.ks * material.specular * r_dot_v.powf(material.shininess);
        }

        let mirror = globals.ks * material.reflective;
        if self.config.reflections && depth < self.config.max_depth && mirror != Color::ZERO {
            let direction = reflect(-dir_to_camera, normal);
            let ray = Ray::offset_from(hit_point, direction, REFLECTION_EPSILON);
            self.count(|stats| stats.reflection += 1);
            let reflected = self.trace(&ray, TraceMode::Primary { depth: depth + 1 });
            color += mirror * rgba_to_color(reflected.color);
        }

        color_to_rgba(color)
    }
}

/// 8-bit RGBA framebuffer, row-major with row 0 at the top.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![OPAQUE_BLACK; (width as usize) * (height as usize)],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Get the pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at column `x`, row `y`.
    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let index = self.index(x, y);
        self.pixels[index] = rgba;
    }

    /// Flatten to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Render the entire scene to an image buffer, one ray per pixel.
pub fn render(scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    log::info!(
        "Rendering {}x{}: {} primitives, {} lights, max depth {}",
        scene.width,
        scene.height,
        scene.primitives.len(),
        scene.lights.len(),
        config.max_depth
    );

    let start = Instant::now();
    let tracer = Tracer::new(scene, config.clone());
    let mut image = ImageBuffer::new(scene.width, scene.height);

    for row in 0..scene.height {
        for col in 0..scene.width {
            image.set(col, row, tracer.render_pixel(row, col));
        }
    }

    let stats = tracer.stats();
    log::info!(
        "Render finished in {:.2?}: {} rays ({} primary, {} shadow, {} reflection)",
        start.elapsed(),
        stats.total(),
        stats.primary,
        stats.shadow,
        stats.reflection
    );

    image
}
