//! Elementary affine transforms and rotation state
//!
//! Every builder writes one elementary transform into an identity matrix and
//! returns it pre-multiplied onto the accumulated matrix: `new * existing`.
//! With column vectors on the right, calling `rotate_x` and then `translate`
//! rotates first and translates second.

use crate::math::{Matrix4, Vector3};

/// Converts degrees to radians.
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Rotation state around three axes (in degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x = (self.x + dx) % 360.0;
        self.y = (self.y + dy) % 360.0;
        self.z = (self.z + dz) % 360.0;
    }

    /// Apply X, then Y, then Z rotation on top of `mat`.
    pub fn apply(&self, mat: &Matrix4) -> Matrix4 {
        let m = Transform::rotate_x(mat, self.x);
        let m = Transform::rotate_y(&m, self.y);
        Transform::rotate_z(&m, self.z)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Moves the object by `offset`.
    pub fn translate(mat: &Matrix4, offset: &Vector3) -> Matrix4 {
        let mut t = Matrix4::identity();
        t[(0, 3)] = offset.x;
        t[(1, 3)] = offset.y;
        t[(2, 3)] = offset.z;
        t * mat
    }

    pub fn rotate_x(mat: &Matrix4, degrees: f32) -> Matrix4 {
        let (sin, cos) = deg_to_rad(degrees).sin_cos();
        let mut r = Matrix4::identity();
        r[(1, 1)] = cos;
        r[(1, 2)] = -sin;
        r[(2, 1)] = sin;
        r[(2, 2)] = cos;
        r * mat
    }

    pub fn rotate_y(mat: &Matrix4, degrees: f32) -> Matrix4 {
        let (sin, cos) = deg_to_rad(degrees).sin_cos();
        let mut r = Matrix4::identity();
        r[(0, 0)] = cos;
        r[(0, 2)] = sin;
        r[(2, 0)] = -sin;
        r[(2, 2)] = cos;
        r * mat
    }

    pub fn rotate_z(mat: &Matrix4, degrees: f32) -> Matrix4 {
        let (sin, cos) = deg_to_rad(degrees).sin_cos();
        let mut r = Matrix4::identity();
        r[(0, 0)] = cos;
        r[(0, 1)] = -sin;
        r[(1, 0)] = sin;
        r[(1, 1)] = cos;
        r * mat
    }

    /// Reflects across the XY plane (negates z).
    pub fn reflect_xy(mat: &Matrix4) -> Matrix4 {
        Self::flip_axis(mat, 2)
    }

    /// Reflects across the XZ plane (negates y).
    pub fn reflect_xz(mat: &Matrix4) -> Matrix4 {
        Self::flip_axis(mat, 1)
    }

    /// Reflects across the YZ plane (negates x).
    pub fn reflect_yz(mat: &Matrix4) -> Matrix4 {
        Self::flip_axis(mat, 0)
    }

    pub fn scale(mat: &Matrix4, magnitude: &Vector3) -> Matrix4 {
        let mut s = Matrix4::identity();
        s[(0, 0)] = magnitude.x;
        s[(1, 1)] = magnitude.y;
        s[(2, 2)] = magnitude.z;
        s * mat
    }

    fn flip_axis(mat: &Matrix4, axis: usize) -> Matrix4 {
        let mut r = Matrix4::identity();
        r[(axis, axis)] = -1.0;
        r * mat
    }
}
