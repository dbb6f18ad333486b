//! Per-polygon fill color selection

use crate::color::Rgb;
use crate::math::Vector3;

/// Picks the fill color of a polygon from its index and fill-plane normal.
pub trait Shader {
    fn shade(&self, polygon_index: usize, normal: &Vector3) -> Rgb;
}

impl<F> Shader for F
where
    F: Fn(usize, &Vector3) -> Rgb,
{
    fn shade(&self, polygon_index: usize, normal: &Vector3) -> Rgb {
        self(polygon_index, normal)
    }
}

/// Alternates between two colors by polygon index, ignoring the normal.
#[derive(Debug, Clone, Copy)]
pub struct AlternatingShader {
    pub even: Rgb,
    pub odd: Rgb,
}

impl Default for AlternatingShader {
    fn default() -> Self {
        Self {
            even: Rgb::BLUE,
            odd: Rgb::YELLOW,
        }
    }
}

impl Shader for AlternatingShader {
    fn shade(&self, polygon_index: usize, _normal: &Vector3) -> Rgb {
        if polygon_index % 2 == 0 {
            self.even
        } else {
            self.odd
        }
    }
}
