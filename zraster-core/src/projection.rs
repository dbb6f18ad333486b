//! Camera and projection utilities
//!
//! Projections are right-handed: the camera looks down -z and the near/far
//! planes map to NDC z = -1 and z = +1 after the homogeneous divide.

use crate::error::ProjectionError;
use crate::math::{try_normalized, Matrix4, Vector3};
use crate::transform::deg_to_rad;

/// Returns the view matrix for a camera at `position` looking at `target`.
///
/// The basis rows are `right`, `up` and the reversed view direction, and the
/// result is `rotation * translation`, so world points are first moved by
/// `-position` and then rotated into camera space.
pub fn look_at(
    position: &Vector3,
    target: &Vector3,
    up: &Vector3,
) -> Result<Matrix4, ProjectionError> {
    let direction = try_normalized(&(position - target))
        .ok_or(ProjectionError::DegenerateCamera("position equals target"))?;
    let up = try_normalized(up).ok_or(ProjectionError::DegenerateCamera("zero up vector"))?;
    let right = try_normalized(&up.cross(&direction))
        .ok_or(ProjectionError::DegenerateCamera("up is parallel to view direction"))?;
    let camera_up = direction.cross(&right);

    #[rustfmt::skip]
    let rotational = Matrix4::new(
        right.x,     right.y,     right.z,     0.0,
        camera_up.x, camera_up.y, camera_up.z, 0.0,
        direction.x, direction.y, direction.z, 0.0,
        0.0,         0.0,         0.0,         1.0,
    );
    #[rustfmt::skip]
    let positional = Matrix4::new(
        1.0, 0.0, 0.0, -position.x,
        0.0, 1.0, 0.0, -position.y,
        0.0, 0.0, 1.0, -position.z,
        0.0, 0.0, 0.0, 1.0,
    );

    Ok(rotational * positional)
}

/// Symmetric-frustum perspective projection; `fov` is vertical, in degrees.
pub fn perspective(
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
) -> Result<Matrix4, ProjectionError> {
    if ![fov, aspect, near, far].iter().all(|v| v.is_finite()) {
        return Err(ProjectionError::DegenerateFrustum("non-finite parameter"));
    }
    if far == near {
        return Err(ProjectionError::DegenerateFrustum("near == far"));
    }

    let top = near * (deg_to_rad(fov) / 2.0).tan();
    let bottom = -top;
    let right = top * aspect;
    let left = -right;
    if top == bottom {
        return Err(ProjectionError::DegenerateFrustum("zero frustum height"));
    }
    if right == left {
        return Err(ProjectionError::DegenerateFrustum("zero frustum width"));
    }

    let mut proj = Matrix4::identity();
    proj[(0, 0)] = 2.0 * near / (right - left);
    proj[(0, 2)] = (right + left) / (right - left);
    proj[(1, 1)] = 2.0 * near / (top - bottom);
    proj[(2, 2)] = -(far + near) / (far - near);
    proj[(2, 3)] = -2.0 * far * near / (far - near);
    proj[(3, 2)] = -1.0;
    proj[(3, 3)] = 0.0;
    Ok(proj)
}

/// Symmetric orthographic projection from half-extents.
pub fn orthographic(
    top: f32,
    right: f32,
    near: f32,
    far: f32,
) -> Result<Matrix4, ProjectionError> {
    let left = -right;
    let bottom = -top;
    if top == bottom {
        return Err(ProjectionError::DegenerateFrustum("zero frustum height"));
    }
    if right == left {
        return Err(ProjectionError::DegenerateFrustum("zero frustum width"));
    }
    if far == near {
        return Err(ProjectionError::DegenerateFrustum("near == far"));
    }

    let mut ortho = Matrix4::identity();
    ortho[(0, 0)] = 2.0 / (right - left);
    ortho[(1, 1)] = 2.0 / (top - bottom);
    ortho[(2, 2)] = -2.0 / (far - near);
    ortho[(0, 3)] = -(right + left) / (right - left);
    ortho[(1, 3)] = -(top + bottom) / (top - bottom);
    ortho[(2, 3)] = -(far + near) / (far - near);
    Ok(ortho)
}

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 5.0),
            target: Vector3::zeros(),
            up: Vector3::y(),
            fov: 45.0,
            aspect,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn view_matrix(&self) -> Result<Matrix4, ProjectionError> {
        look_at(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Result<Matrix4, ProjectionError> {
        match self.mode {
            ProjectionMode::Perspective => perspective(self.fov, self.aspect, self.near, self.far),
            ProjectionMode::Orthographic => {
                // Frame the target the way the perspective view would at its distance.
                let distance = (self.position - self.target).norm();
                let top = distance * (deg_to_rad(self.fov) / 2.0).tan();
                orthographic(top, top * self.aspect, self.near, self.far)
            }
        }
    }

    /// `projection * view`, ready to be composed with a model matrix.
    pub fn view_projection(&self) -> Result<Matrix4, ProjectionError> {
        Ok(self.projection_matrix()? * self.view_matrix()?)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(4.0 / 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Homogeneous, Vector4};
    use approx::assert_relative_eq;

    fn ndc(m: &Matrix4, x: f32, y: f32, z: f32) -> Vector3 {
        (m * Vector4::point(x, y, z)).from_homogeneous().unwrap()
    }

    #[test]
    fn test_perspective_maps_near_and_far_planes() {
        for &(fov, aspect, near, far) in &[
            (45.0, 4.0 / 3.0, 0.1, 100.0),
            (90.0, 1.0, 1.0, 10.0),
            (60.0, 16.0 / 9.0, 0.5, 2.0),
        ] {
            let proj = perspective(fov, aspect, near, far).unwrap();
            assert_relative_eq!(ndc(&proj, 0.0, 0.0, -near).z, -1.0, epsilon = 1e-4);
            assert_relative_eq!(ndc(&proj, 0.0, 0.0, -far).z, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_perspective_maps_frustum_edge_to_ndc_edge() {
        let proj = perspective(90.0, 2.0, 1.0, 10.0).unwrap();
        // At depth 1 with a 90 degree fov the top edge is y = 1, right edge x = 2.
        let p = ndc(&proj, 2.0, 1.0, -1.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_perspective_rejects_degenerate_frustum() {
        assert!(matches!(
            perspective(45.0, 1.0, 1.0, 1.0),
            Err(ProjectionError::DegenerateFrustum(_))
        ));
        assert!(perspective(45.0, 0.0, 0.1, 10.0).is_err());
        assert!(perspective(0.0, 1.0, 0.1, 10.0).is_err());
        assert!(perspective(45.0, 1.0, 0.0, 10.0).is_err());
        assert!(perspective(f32::NAN, 1.0, 0.1, 10.0).is_err());
    }

    #[test]
    fn test_orthographic() {
        let ortho = orthographic(2.0, 4.0, 1.0, 11.0).unwrap();
        let p = ndc(&ortho, 4.0, -2.0, -1.0);
        assert_relative_eq!(p, Vector3::new(1.0, -1.0, -1.0), epsilon = 1e-6);
        let p = ndc(&ortho, 0.0, 0.0, -11.0);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-6);

        assert!(orthographic(0.0, 1.0, 1.0, 2.0).is_err());
        assert!(orthographic(1.0, 0.0, 1.0, 2.0).is_err());
        assert!(orthographic(1.0, 1.0, 2.0, 2.0).is_err());
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let pos = Vector3::new(3.0, -2.0, 7.5);
        let forward = Vector3::new(0.3, 0.1, -1.0);
        let view = look_at(&pos, &(pos + forward), &Vector3::y()).unwrap();
        let eye = view * Vector4::point(pos.x, pos.y, pos.z);
        assert_relative_eq!(eye.xyz(), Vector3::zeros(), epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_target_lies_on_negative_z() {
        let view = look_at(&Vector3::new(0.0, 0.0, 5.0), &Vector3::zeros(), &Vector3::y()).unwrap();
        let t = view * Vector4::point(0.0, 0.0, 0.0);
        assert_relative_eq!(t.xyz(), Vector3::new(0.0, 0.0, -5.0), epsilon = 1e-6);
    }

    #[test]
    fn test_look_at_rejects_degenerate_basis() {
        let p = Vector3::new(1.0, 1.0, 1.0);
        assert!(look_at(&p, &p, &Vector3::y()).is_err());
        assert!(look_at(&Vector3::new(0.0, 5.0, 0.0), &Vector3::zeros(), &Vector3::y()).is_err());
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800.0 / 600.0);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);
        assert!(camera.view_projection().is_ok());
    }

    #[test]
    fn test_camera_orthographic_frames_target() {
        let mut camera = Camera::new(1.0);
        camera.mode = ProjectionMode::Orthographic;
        let vp = camera.view_projection().unwrap();
        let center = ndc(&vp, 0.0, 0.0, 0.0);
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-6);
    }
}
