//! Crate-level error types.

use std::fmt;

use crate::{
    gpu::{render_context::RenderContextError, shader::ShaderError},
    mesh::MeshError,
    options::TerrainMode,
};

/// Errors produced by the relief crate.
#[derive(Debug)]
pub enum ReliefError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Heightmap image could not be opened or decoded.
    Image(image::ImageError),
    /// Mesh generation rejected its inputs.
    Mesh(MeshError),
    /// Shader loading, composition, validation or uniform access failed.
    Shader(ShaderError),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
    /// A terrain mode that displaces by a heightmap was requested without
    /// one.
    MissingHeightmap(TerrainMode),
}

impl fmt::Display for ReliefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Image(e) => write!(f, "heightmap image error: {e}"),
            Self::Mesh(e) => write!(f, "mesh error: {e}"),
            Self::Shader(e) => write!(f, "shader error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
            Self::MissingHeightmap(mode) => {
                write!(f, "terrain mode '{mode}' requires a heightmap")
            }
        }
    }
}

impl std::error::Error for ReliefError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Image(e) => Some(e),
            Self::Mesh(e) => Some(e),
            Self::Shader(e) => Some(e),
            Self::OptionsParse(_)
            | Self::Viewer(_)
            | Self::MissingHeightmap(_) => None,
        }
    }
}

impl From<RenderContextError> for ReliefError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for ReliefError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for ReliefError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<MeshError> for ReliefError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

impl From<ShaderError> for ReliefError {
    fn from(e: ShaderError) -> Self {
        Self::Shader(e)
    }
}
