//! Renderer configuration.
//!
//! Loaded from JSON; every field has a default so partial documents work.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Viewport width in pixels.
    pub width: usize,
    /// Viewport height in pixels.
    pub height: usize,
    pub background: Rgb,
    /// Stroke color for wireframe edges and axes.
    pub wireframe: Rgb,
    /// Highlight color for selected objects.
    pub selection: Rgb,
    /// Side of the square block painted per plotted pixel.
    pub point_size: usize,
    /// Length of the axes drawn by `Renderer::draw_axes`, in object units.
    pub axis_length: f32,
    /// When set, every `render_object` writes a depth dump to this path.
    pub depth_dump: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Rgb::WHITE,
            wireframe: Rgb::BLACK,
            selection: Rgb::YELLOW,
            point_size: 2,
            axis_length: 1.0,
            depth_dump: None,
        }
    }
}

impl RendererConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = RendererConfig::from_json_str(
            r#"{ "width": 320, "background": { "r": 10, "g": 20, "b": 30 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.width, 320);
        assert_eq!(cfg.height, 600);
        assert_eq!(cfg.background, Rgb::new(10, 20, 30));
        assert_eq!(cfg.point_size, 2);
        assert!(cfg.depth_dump.is_none());
    }

    #[test]
    fn test_invalid_json() {
        let err = RendererConfig::from_json_str("{ width: }").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RendererConfig::from_file("/nonexistent/zraster.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
