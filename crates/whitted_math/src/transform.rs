// Transform utilities for Mat4
//
// Extends glam::Mat4 with the normal transform the tracer needs.
// Note: glam::Mat4 already provides transform_point3(), transform_vector3()
// (w=0, translation ignored) and inverse()

use glam::{Mat3, Mat4};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Matrix that carries object-space normals to world space:
    /// transpose(inverse(upper-left 3x3)).
    fn normal_matrix(&self) -> Mat3;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(*self).inverse().transpose()
    }
}
