//! Error types for the rasterization pipeline

use std::fmt;

/// Invalid camera or projection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// The frustum has zero width, height or depth.
    DegenerateFrustum(&'static str),
    /// The camera basis cannot be built (eye on target, or up parallel to the view direction).
    DegenerateCamera(&'static str),
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateFrustum(msg) => write!(f, "degenerate frustum: {msg}"),
            Self::DegenerateCamera(msg) => write!(f, "degenerate camera: {msg}"),
        }
    }
}

impl std::error::Error for ProjectionError {}

/// Top-level error type for the core crate.
#[derive(Debug)]
pub enum Error {
    Projection(ProjectionError),
    InvalidViewport { width: usize, height: usize },
    Io(std::io::Error),
    Config(serde_json::Error),
    Stl(String),
    UnknownShape(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Projection(e) => write!(f, "projection error: {e}"),
            Self::InvalidViewport { width, height } => {
                write!(f, "invalid viewport {width}x{height}: both sides must be positive")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Stl(msg) => write!(f, "STL error: {msg}"),
            Self::UnknownShape(name) => write!(f, "unknown shape {name:?}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Projection(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProjectionError> for Error {
    fn from(e: ProjectionError) -> Self {
        Self::Projection(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
