//! STL file parser for binary and ASCII formats
//!
//! Each facet becomes one `Polygon` with w = 1 and the facet normal on all
//! three vertices.

use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Polygon, SceneObject};
use crate::math::{Homogeneous, Vector3, Vector4};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<SceneObject> {
    if data.len() < HEADER_LEN + 4 {
        return Err(Error::Stl("file too small to be a valid STL".to_string()));
    }

    let (body, count) = le_u32::<_, nom::error::Error<&[u8]>>(&data[HEADER_LEN..])
        .map_err(|e| Error::Stl(format!("bad triangle count: {e:?}")))?;
    let count = count as usize;
    if body.len() < count.saturating_mul(FACET_LEN) {
        return Err(Error::Stl(format!(
            "unexpected end of file: {count} facets need {} bytes, found {}",
            count.saturating_mul(FACET_LEN),
            body.len()
        )));
    }

    let mut object = SceneObject::with_capacity(count);
    let mut input = body;
    for _ in 0..count {
        let (rest, polygon) =
            binary_facet(input).map_err(|e| Error::Stl(format!("bad facet: {e:?}")))?;
        object.add_polygon(polygon);
        input = rest;
    }
    Ok(object)
}

fn binary_vector3(input: &[u8]) -> IResult<&[u8], Vector3> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Polygon> {
    let (input, normal) = binary_vector3(input)?;
    let (input, (a, b, c)) = tuple((binary_vector3, binary_vector3, binary_vector3))(input)?;
    // attribute byte count, unused
    let (input, _) = le_u16(input)?;
    Ok((input, facet(normal, [a, b, c])))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<SceneObject> {
    match parse_ascii_stl_impl(input) {
        Ok((_, object)) => Ok(object),
        Err(e) => Err(Error::Stl(format!("failed to parse ASCII STL: {e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, SceneObject> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // optional name
    let (input, polygons) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;

    Ok((input, SceneObject { polygons }))
}

fn parse_facet(input: &str) -> IResult<&str, Polygon> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = parse_vertex(input)?;
    let (input, b) = parse_vertex(input)?;
    let (input, c) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, facet(normal, [a, b, c])))
}

fn parse_vertex(input: &str) -> IResult<&str, Vector3> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, Vector3> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn facet(normal: Vector3, corners: [Vector3; 3]) -> Polygon {
    Polygon::new(corners.map(|v| Vector4::point(v.x, v.y, v.z)), [normal; 3])
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<SceneObject> {
    // Binary files may also start with "solid", so fall back on failure.
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(object) = parse_ascii_stl(text) {
                return Ok(object);
            }
        }
    }

    parse_binary_stl(data)
}

/// Read and parse an STL file from disk.
pub fn load_stl(path: impl AsRef<std::path::Path>) -> Result<SceneObject> {
    let data = std::fs::read(path)?;
    parse_stl(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tri
";

    fn binary(facets: &[[f32; 12]]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(facets.len() as u32).to_le_bytes());
        for f in facets {
            for v in f {
                data.extend_from_slice(&v.to_le_bytes());
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let data = binary(&[]);
        let object = parse_binary_stl(&data).unwrap();
        assert!(object.is_empty());
    }

    #[test]
    fn test_parse_binary_facet() {
        let data = binary(&[[0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0, 0.0]]);
        let object = parse_stl(&data).unwrap();
        assert_eq!(object.len(), 1);
        let poly = &object.polygons[0];
        assert_eq!(poly.vertices[1], Vector4::new(2.0, 0.0, 0.0, 1.0));
        assert_eq!(poly.vertices[2], Vector4::new(0.0, 3.0, 0.0, 1.0));
        assert_eq!(poly.normals, [Vector3::z(); 3]);
    }

    #[test]
    fn test_truncated_binary() {
        let mut data = binary(&[[0.0; 12]]);
        data.truncate(data.len() - 10);
        assert!(matches!(parse_binary_stl(&data), Err(Error::Stl(_))));
        assert!(parse_binary_stl(&[0u8; 10]).is_err());
    }

    #[test]
    fn test_parse_ascii_with_name() {
        let object = parse_stl(TRIANGLE.as_bytes()).unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object.polygons[0].vertices[1], Vector4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(object.polygons[0].normals[0], Vector3::z());
    }

    #[test]
    fn test_parse_ascii_rejects_garbage() {
        assert!(parse_ascii_stl("solid x\n facet oops").is_err());
    }
}
