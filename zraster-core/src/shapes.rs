//! Predefined solids centered on the origin
//!
//! Every solid fits inside a sphere of the given radius and winds its
//! triangles counter-clockwise when seen from outside.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::geometry::{Polygon, SceneObject};
use crate::math::{Homogeneous, Vector3, Vector4};

pub const DEFAULT_RADIUS: f32 = 2.0;
pub const DEFAULT_PRECISION: u32 = 3;
/// Each sphere subdivision level quadruples the triangle count.
pub const MAX_PRECISION: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    #[default]
    Cube,
    Pyramid,
    Sphere,
    Octahedron,
    Tetrahedron,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Cube,
        Shape::Pyramid,
        Shape::Sphere,
        Shape::Octahedron,
        Shape::Tetrahedron,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Cube => "cube",
            Shape::Pyramid => "pyramid",
            Shape::Sphere => "sphere",
            Shape::Octahedron => "octahedron",
            Shape::Tetrahedron => "tetrahedron",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownShape(s.to_string()))
    }
}

impl SceneObject {
    /// Builds `shape` with `DEFAULT_RADIUS`.
    ///
    /// `precision` is the number of sphere subdivision levels, capped at
    /// `MAX_PRECISION`. The flat-faced solids ignore it.
    pub fn generate(shape: Shape, precision: u32) -> Self {
        Self::generate_with_radius(shape, precision, DEFAULT_RADIUS)
    }

    pub fn generate_with_radius(shape: Shape, precision: u32, radius: f32) -> Self {
        match shape {
            Shape::Cube => Self::cube(2.0 * radius / 3f32.sqrt()),
            Shape::Pyramid => pyramid(radius),
            Shape::Sphere => sphere(radius, precision.min(MAX_PRECISION)),
            Shape::Octahedron => from_faces(octahedron_faces(radius)),
            Shape::Tetrahedron => tetrahedron(radius),
        }
    }
}

fn from_faces(faces: impl IntoIterator<Item = [Vector3; 3]>) -> SceneObject {
    let mut object = SceneObject::new();
    for face in faces {
        let [a, b, c] = outward(face);
        object.add_polygon(Polygon::from_points(a, b, c));
    }
    object
}

/// Reorders a face of a solid that contains the origin so that its winding
/// normal points away from the origin.
fn outward([a, b, c]: [Vector3; 3]) -> [Vector3; 3] {
    let normal = (b - a).cross(&(c - a));
    if normal.dot(&(a + b + c)) < 0.0 {
        [a, c, b]
    } else {
        [a, b, c]
    }
}

fn octahedron_faces(radius: f32) -> Vec<[Vector3; 3]> {
    let mut faces = Vec::with_capacity(8);
    for sx in [1.0, -1.0] {
        for sy in [1.0, -1.0] {
            for sz in [1.0, -1.0] {
                faces.push([
                    Vector3::new(sx * radius, 0.0, 0.0),
                    Vector3::new(0.0, sy * radius, 0.0),
                    Vector3::new(0.0, 0.0, sz * radius),
                ]);
            }
        }
    }
    faces
}

fn tetrahedron(radius: f32) -> SceneObject {
    let s = radius / 3f32.sqrt();
    let v = [
        (1.0, 1.0, 1.0),
        (1.0, -1.0, -1.0),
        (-1.0, 1.0, -1.0),
        (-1.0, -1.0, 1.0),
    ]
    .map(|(x, y, z)| Vector3::new(x * s, y * s, z * s));
    from_faces([
        [v[0], v[1], v[2]],
        [v[0], v[1], v[3]],
        [v[0], v[2], v[3]],
        [v[1], v[2], v[3]],
    ])
}

/// Square base below the origin, apex on +y.
fn pyramid(radius: f32) -> SceneObject {
    let s = radius / 3f32.sqrt();
    let apex = Vector3::new(0.0, radius, 0.0);
    let base = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
        .map(|(x, z)| Vector3::new(x * s, -s, z * s));

    let mut faces = Vec::with_capacity(6);
    for i in 0..4 {
        faces.push([apex, base[i], base[(i + 1) % 4]]);
    }
    faces.push([base[0], base[1], base[2]]);
    faces.push([base[0], base[2], base[3]]);
    from_faces(faces)
}

/// Octahedron subdivided `precision` times and pushed onto the sphere.
/// Normals are per vertex.
fn sphere(radius: f32, precision: u32) -> SceneObject {
    let mut faces = octahedron_faces(1.0);
    for _ in 0..precision {
        faces = faces
            .iter()
            .flat_map(|&[a, b, c]| {
                let ab = (a + b).normalize();
                let bc = (b + c).normalize();
                let ca = (c + a).normalize();
                [[a, ab, ca], [ab, b, bc], [ca, bc, c], [ab, bc, ca]]
            })
            .collect();
    }

    let mut object = SceneObject::with_capacity(faces.len());
    for face in faces {
        let face = outward(face);
        let vertices = face.map(|n| Vector4::point(n.x * radius, n.y * radius, n.z * radius));
        object.add_polygon(Polygon::new(vertices, face));
    }
    object
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn centroid(poly: &Polygon) -> Vector3 {
        poly.vertices.iter().fold(Vector3::zeros(), |acc, v| acc + v.xyz()) / 3.0
    }

    #[test]
    fn test_triangle_counts() {
        assert_eq!(SceneObject::generate(Shape::Cube, 3).len(), 12);
        assert_eq!(SceneObject::generate(Shape::Pyramid, 3).len(), 6);
        assert_eq!(SceneObject::generate(Shape::Octahedron, 3).len(), 8);
        assert_eq!(SceneObject::generate(Shape::Tetrahedron, 3).len(), 4);
        assert_eq!(SceneObject::generate(Shape::Sphere, 0).len(), 8);
        assert_eq!(SceneObject::generate(Shape::Sphere, DEFAULT_PRECISION).len(), 512);
    }

    #[test]
    fn test_sphere_precision_is_capped() {
        let capped = SceneObject::generate(Shape::Sphere, u32::MAX);
        assert_eq!(capped.len(), 8 * 4usize.pow(MAX_PRECISION));
    }

    #[test]
    fn test_normals_point_outward() {
        for shape in Shape::ALL {
            let object = SceneObject::generate(shape, 2);
            for poly in &object.polygons {
                assert!(poly.normals[0].dot(&centroid(poly)) > 0.0, "{shape} has an inward face");
                let winding = (poly.vertices[1] - poly.vertices[0])
                    .xyz()
                    .cross(&(poly.vertices[2] - poly.vertices[0]).xyz());
                assert!(winding.dot(&centroid(poly)) > 0.0, "{shape} winds clockwise");
            }
        }
    }

    #[test]
    fn test_solids_fit_radius() {
        for shape in Shape::ALL {
            let object = SceneObject::generate_with_radius(shape, 2, 3.0);
            let farthest = object
                .polygons
                .iter()
                .flat_map(|p| p.vertices.iter())
                .map(|v| v.xyz().norm())
                .fold(0.0f32, f32::max);
            assert_relative_eq!(farthest, 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_sphere_vertices_on_surface_with_radial_normals() {
        let sphere = SceneObject::generate(Shape::Sphere, 2);
        for poly in &sphere.polygons {
            for (v, n) in poly.vertices.iter().zip(&poly.normals) {
                assert_relative_eq!(v.xyz().norm(), DEFAULT_RADIUS, epsilon = 1e-5);
                assert_relative_eq!(*n, v.xyz() / DEFAULT_RADIUS, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_parse_shape_names() {
        for shape in Shape::ALL {
            assert_eq!(shape.to_string().parse::<Shape>().unwrap(), shape);
        }
        assert_eq!("Sphere".parse::<Shape>().unwrap(), Shape::Sphere);
        assert!(matches!("blob".parse::<Shape>(), Err(Error::UnknownShape(name)) if name == "blob"));
    }
}
