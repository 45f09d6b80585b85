//! Pinhole camera for primary ray generation.

use whitted_core::CameraRecord;
use whitted_math::{Mat4, Ray, Vec3};

/// Camera with an orthonormal basis derived from look and up vectors.
///
/// `w` points backwards (opposite the look direction), `v` is up and `u`
/// right, so (u, v, w) is right-handed and the camera looks down -w.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,

    /// Vertical field of view in radians
    height_angle: f32,
    aspect_ratio: f32,

    // Carried through from the scene, a pinhole camera ignores them
    pub aperture: f32,
    pub focal_length: f32,
}

impl Camera {
    /// Create a camera at `position` looking along `look`.
    pub fn new(position: Vec3, look: Vec3, up: Vec3, height_angle: f32, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            height_angle,
            aspect_ratio,
            aperture: 0.0,
            focal_length: 0.0,
        };
        camera.set_orientation(look, up);
        camera
    }

    /// Build the camera for an image of `width` x `height` pixels.
    pub fn from_record(record: &CameraRecord, width: u32, height: u32) -> Self {
        let aspect_ratio = width as f32 / height.max(1) as f32;
        let mut camera = Self::new(
            record.position,
            record.look,
            record.up,
            record.height_angle,
            aspect_ratio,
        );
        camera.aperture = record.aperture;
        camera.focal_length = record.focal_length;
        camera
    }

    /// Recompute the basis from new look and up vectors.
    pub fn set_orientation(&mut self, look: Vec3, up: Vec3) {
        self.w = (-look).normalize_or_zero();
        self.v = (up - up.dot(self.w) * self.w).normalize_or_zero();
        self.u = self.v.cross(self.w);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Basis vectors (u, v, w).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn height_angle(&self) -> f32 {
        self.height_angle
    }

    /// Horizontal field of view matching the aspect ratio with square pixels.
    pub fn width_angle(&self) -> f32 {
        2.0 * (self.aspect_ratio * (self.height_angle / 2.0).tan()).atan()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Matrix taking camera-space points and vectors to world space.
    pub fn camera_to_world_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.u.extend(0.0),
            self.v.extend(0.0),
            self.w.extend(0.0),
            self.position.extend(1.0),
        )
    }

    /// World-to-camera matrix, the inverse of [`Self::camera_to_world_matrix`].
    pub fn view_matrix(&self) -> Mat4 {
        self.camera_to_world_matrix().inverse()
    }

    /// Camera-space point on the view plane at `depth` through the center of
    /// pixel (row, col). Row 0 is the top of the image.
    pub fn view_plane_coord(&self, row: u32, col: u32, width: u32, height: u32, depth: f32) -> Vec3 {
        let plane_height = 2.0 * depth * (self.height_angle / 2.0).tan();
        let plane_width = 2.0 * depth * (self.width_angle() / 2.0).tan();

        let x = (col as f32 + 0.5) / width as f32 - 0.5;
        let y = (height as f32 - row as f32 - 0.5) / height as f32 - 0.5;
        Vec3::new(x * plane_width, y * plane_height, -depth)
    }

    /// World-space primary ray through the center of pixel (row, col).
    pub fn ray_for_pixel(&self, row: u32, col: u32, width: u32, height: u32) -> Ray {
        let direction = self.view_plane_coord(row, col, width, height, 1.0);
        Ray::new(
            self.position,
            self.camera_to_world_matrix().transform_vector3(direction),
        )
    }
}
