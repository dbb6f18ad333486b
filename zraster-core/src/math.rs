//! Vector and matrix types used throughout the pipeline
//!
//! All matrices are applied to column vectors on the right, so a chain
//! `c * b * a` applies `a` first. Element access is `m[(row, col)]`.

use nalgebra as na;

pub type Vector3 = na::Vector3<f32>;
pub type Vector4 = na::Vector4<f32>;
pub type Matrix3 = na::Matrix3<f32>;
pub type Matrix4 = na::Matrix4<f32>;

/// Conversions between homogeneous and Cartesian coordinates
pub trait Homogeneous {
    /// Build a homogeneous point `(x, y, z, 1)`.
    fn point(x: f32, y: f32, z: f32) -> Self;

    /// Divide x, y, z by w. Returns `None` for points at infinity (`w == 0`).
    fn from_homogeneous(&self) -> Option<Vector3>;
}

impl Homogeneous for Vector4 {
    fn point(x: f32, y: f32, z: f32) -> Self {
        Vector4::new(x, y, z, 1.0)
    }

    fn from_homogeneous(&self) -> Option<Vector3> {
        if self.w == 0.0 {
            return None;
        }
        Some(Vector3::new(self.x / self.w, self.y / self.w, self.z / self.w))
    }
}

/// Normalize `v`, or `None` if it has zero length.
pub fn try_normalized(v: &Vector3) -> Option<Vector3> {
    v.try_normalize(f32::EPSILON)
}
