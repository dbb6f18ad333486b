//! Geometry primitives consumed by the renderer

use crate::math::{Homogeneous, Matrix4, Vector3, Vector4};

/// A triangle with homogeneous vertices and one normal per vertex
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: [Vector4; 3],
    pub normals: [Vector3; 3],
}

impl Polygon {
    pub fn new(vertices: [Vector4; 3], normals: [Vector3; 3]) -> Self {
        Self { vertices, normals }
    }

    /// Build from Cartesian points (w = 1), using the winding normal for all three vertices.
    pub fn from_points(a: Vector3, b: Vector3, c: Vector3) -> Self {
        let normal = (b - a).cross(&(c - a)).try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        Self {
            vertices: [
                Vector4::point(a.x, a.y, a.z),
                Vector4::point(b.x, b.y, b.z),
                Vector4::point(c.x, c.y, c.z),
            ],
            normals: [normal; 3],
        }
    }

    /// Returns a copy with every vertex left-multiplied by `m`. Normals pass through unchanged.
    pub fn transformed(&self, m: &Matrix4) -> Self {
        Self {
            vertices: self.vertices.map(|v| m * v),
            normals: self.normals,
        }
    }
}

/// An ordered collection of polygons
#[derive(Debug, Clone, Default)]
pub struct SceneObject {
    pub polygons: Vec<Polygon>,
}

impl SceneObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            polygons: Vec::with_capacity(capacity),
        }
    }

    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Axis-aligned cube centered on the origin, two triangles per face,
    /// counter-clockwise when seen from outside.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corner = |x: f32, y: f32, z: f32| Vector3::new(x * h, y * h, z * h);
        // (a, b, c, d) quads in counter-clockwise order
        let faces = [
            // front (+z)
            [(-1.0, -1.0, 1.0), (1.0, -1.0, 1.0), (1.0, 1.0, 1.0), (-1.0, 1.0, 1.0)],
            // back (-z)
            [(1.0, -1.0, -1.0), (-1.0, -1.0, -1.0), (-1.0, 1.0, -1.0), (1.0, 1.0, -1.0)],
            // top (+y)
            [(-1.0, 1.0, 1.0), (1.0, 1.0, 1.0), (1.0, 1.0, -1.0), (-1.0, 1.0, -1.0)],
            // bottom (-y)
            [(-1.0, -1.0, -1.0), (1.0, -1.0, -1.0), (1.0, -1.0, 1.0), (-1.0, -1.0, 1.0)],
            // right (+x)
            [(1.0, -1.0, 1.0), (1.0, -1.0, -1.0), (1.0, 1.0, -1.0), (1.0, 1.0, 1.0)],
            // left (-x)
            [(-1.0, -1.0, -1.0), (-1.0, -1.0, 1.0), (-1.0, 1.0, 1.0), (-1.0, 1.0, -1.0)],
        ];

        let mut object = Self::with_capacity(12);
        for quad in faces {
            let [a, b, c, d] = quad.map(|(x, y, z)| corner(x, y, z));
            object.add_polygon(Polygon::from_points(a, b, c));
            object.add_polygon(Polygon::from_points(a, c, d));
        }
        object
    }
}

/// Barycentric weights `(u, v, w)` of `p` with respect to triangle `(a, b, c)`.
///
/// The triangle must have non-zero area; degenerate triangles yield NaN.
pub fn barycentric(p: &Vector3, a: &Vector3, b: &Vector3, c: &Vector3) -> Vector3 {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);
    let denom = d00 * d11 - d01 * d01;
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    Vector3::new(1.0 - v - w, v, w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use approx::assert_relative_eq;

    #[test]
    fn test_barycentric_centroid() {
        let triangles = [
            (Vector3::new(0.0, 0.0, 0.0), Vector3::new(4.0, 0.0, 0.0), Vector3::new(0.0, 4.0, 0.0)),
            (Vector3::new(-3.0, 2.0, 1.0), Vector3::new(5.0, 7.0, -2.0), Vector3::new(1.0, -6.0, 4.0)),
            (Vector3::new(10.0, 10.0, 0.0), Vector3::new(12.0, 30.0, 0.0), Vector3::new(40.0, 11.0, 0.0)),
        ];
        for (a, b, c) in triangles {
            let centroid = (a + b + c) / 3.0;
            let weights = barycentric(&centroid, &a, &b, &c);
            assert_relative_eq!(weights, Vector3::repeat(1.0 / 3.0), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(4.0, 0.0, 0.0);
        let c = Vector3::new(0.0, 4.0, 0.0);
        assert_relative_eq!(barycentric(&a, &a, &b, &c), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(barycentric(&b, &a, &b, &c), Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(barycentric(&c, &a, &b, &c), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_barycentric_degenerate_is_nan() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 1.0, 0.0);
        let c = Vector3::new(2.0, 2.0, 0.0);
        assert!(barycentric(&Vector3::new(1.0, 0.0, 0.0), &a, &b, &c).x.is_nan());
    }

    #[test]
    fn test_polygon_transformed_keeps_normals() {
        let poly = Polygon::from_points(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(poly.normals[0], Vector3::z());

        let m = Transform::translate(&Matrix4::identity(), &Vector3::new(0.0, 0.0, 2.0));
        let moved = poly.transformed(&m);
        assert_eq!(moved.vertices[1], Vector4::new(1.0, 0.0, 2.0, 1.0));
        assert_eq!(moved.normals, poly.normals);
        // the source polygon is untouched
        assert_eq!(poly.vertices[1], Vector4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = SceneObject::cube(2.0);
        assert_eq!(cube.len(), 12);
        for poly in &cube.polygons {
            let centroid = poly.vertices.iter().fold(Vector3::zeros(), |acc, v| acc + v.xyz()) / 3.0;
            assert!(poly.normals[0].dot(&centroid) > 0.0);
        }
    }
}
