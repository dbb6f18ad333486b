//! zraster core library - software rasterization pipeline
//!
//! Transforms polygons through a 4x4 matrix into normalized device
//! coordinates, maps them to pixels and rasterizes lines and filled
//! triangles against a reciprocal depth buffer. Drawing happens on any
//! `PixelSurface` the caller injects.

pub mod color;
pub mod config;
pub mod depth;
pub mod dump;
pub mod error;
pub mod geometry;
pub mod math;
pub mod projection;
pub mod renderer;
pub mod shading;
pub mod shapes;
pub mod stl;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use color::Rgb;
pub use config::RendererConfig;
pub use depth::DepthBuffer;
pub use error::{Error, ProjectionError, Result};
pub use geometry::{barycentric, Polygon, SceneObject};
pub use math::{Homogeneous, Matrix3, Matrix4, Vector3, Vector4};
pub use projection::{look_at, orthographic, perspective, Camera, ProjectionMode};
pub use renderer::{RenderStats, Renderer};
pub use shading::{AlternatingShader, Shader};
pub use shapes::Shape;
pub use surface::{BufferSurface, PixelSurface};
pub use transform::{RotationState, Transform};
