//! Terrain mesh generation.
//!
//! Every generator here is a pure function of its parameters: no GPU
//! handles, no I/O. Output is a flat `f32` vertex stream plus `u32`
//! indices and the primitive-assembly mode the renderer should use.
//!
//! - [`plane`] - bilinear subdivision of a quadrilateral into a
//!   triangle-list grid.
//! - [`strip`] - heightmap-displaced grid indexed as one triangle strip per
//!   row.
//! - [`patch`] - coarse, non-shared quad patches for GPU-side displacement.

/// Heightmap sample grid and image decoding.
pub mod heightmap;
/// Coarse quad-patch grid for GPU-side displacement.
pub mod patch;
/// Line and plane subdivision.
pub mod plane;
/// Heightmap-displaced triangle-strip terrain.
pub mod strip;

use std::fmt;

use glam::Vec3;

pub use heightmap::Heightmap;
pub use strip::HeightParams;

/// Errors produced when mesh-generation preconditions are violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A subdivision count or patch resolution of zero was requested.
    ZeroDivisions,
    /// The heightmap has zero width or zero height.
    EmptyHeightmap,
    /// A pixel buffer reported zero channels per pixel.
    ZeroChannels,
    /// The pixel buffer is shorter than `width * height * channels`.
    PixelBufferTooSmall {
        /// Bytes required by the stated dimensions.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },
    /// The mesh would contain more vertices or indices than a `u32` can
    /// count.
    IndexOverflow,
    /// An index references a vertex past the end of the vertex stream.
    IndexOutOfBounds {
        /// Position of the offending entry in the index buffer.
        position: usize,
        /// The offending index value.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDivisions => {
                write!(f, "subdivision count must be at least 1")
            }
            Self::EmptyHeightmap => write!(f, "heightmap has no pixels"),
            Self::ZeroChannels => {
                write!(f, "pixel buffer must have at least one channel")
            }
            Self::PixelBufferTooSmall { expected, actual } => write!(
                f,
                "pixel buffer holds {actual} bytes, dimensions need \
                 {expected}"
            ),
            Self::IndexOverflow => {
                write!(f, "mesh has more vertices than u32 indices address")
            }
            Self::IndexOutOfBounds {
                position,
                index,
                vertex_count,
            } => write!(
                f,
                "index {index} at position {position} exceeds vertex count \
                 {vertex_count}"
            ),
        }
    }
}

impl std::error::Error for MeshError {}

/// How the GPU assembles vertices into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    /// Three indices per triangle.
    TriangleList,
    /// One triangle strip per row, each `indices_per_strip` long, laid out
    /// back to back in the index buffer.
    TriangleStrip {
        /// Number of strips (heightmap rows minus one).
        strips: u32,
        /// Indices per strip (heightmap width times two).
        indices_per_strip: u32,
    },
    /// Every `vertices_per_patch` consecutive vertices form one patch. No
    /// index buffer.
    Patch {
        /// Control points per patch.
        vertices_per_patch: u32,
    },
}

/// CPU-side mesh ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Interleaved vertex components, `floats_per_vertex` per vertex.
    pub vertices: Vec<f32>,
    /// Vertex indices. Empty for [`PrimitiveMode::Patch`].
    pub indices: Vec<u32>,
    /// Components per vertex: 3 for position only, 5 for position + UV.
    pub floats_per_vertex: usize,
    /// Primitive assembly for the draw call.
    pub primitive: PrimitiveMode,
}

impl Mesh {
    /// Subdivided plane through four corners, drawn as a triangle list.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::ZeroDivisions`] when `div` is zero.
    pub fn plane(corners: [Vec3; 4], div: u32) -> Result<Self, MeshError> {
        let [v0, v1, v2, v3] = corners;
        Ok(Self {
            vertices: plane::plane(v0, v1, v2, v3, div)?,
            indices: plane::plane_indices(div)?,
            floats_per_vertex: 3,
            primitive: PrimitiveMode::TriangleList,
        })
    }

    /// Heightmap-displaced grid drawn as one triangle strip per row.
    ///
    /// # Errors
    ///
    /// See [`strip::strip_mesh`].
    pub fn heightmap_strips(
        heightmap: &Heightmap,
        params: HeightParams,
    ) -> Result<Self, MeshError> {
        strip::strip_mesh(heightmap, params)
    }

    /// Coarse patch grid for GPU displacement.
    ///
    /// # Errors
    ///
    /// See [`patch::patch_grid`].
    pub fn patch_grid(
        width: f32,
        height: f32,
        resolution: u32,
    ) -> Result<Self, MeshError> {
        Ok(Self {
            vertices: patch::patch_grid(width, height, resolution)?,
            indices: Vec::new(),
            floats_per_vertex: patch::FLOATS_PER_VERTEX,
            primitive: PrimitiveMode::Patch {
                vertices_per_patch: patch::VERTICES_PER_PATCH,
            },
        })
    }

    /// Number of vertices in the vertex stream.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.floats_per_vertex.max(1)
    }

    /// Number of patches, or zero for indexed modes.
    #[must_use]
    pub fn patch_count(&self) -> usize {
        match self.primitive {
            PrimitiveMode::Patch { vertices_per_patch } => {
                self.vertex_count() / vertices_per_patch.max(1) as usize
            }
            _ => 0,
        }
    }

    /// Check that every index lies inside the vertex stream.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfBounds`] for the first bad index.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertex_count();
        match self
            .indices
            .iter()
            .position(|&i| i as usize >= vertex_count)
        {
            Some(position) => Err(MeshError::IndexOutOfBounds {
                position,
                index: self.indices[position],
                vertex_count,
            }),
            None => Ok(()),
        }
    }
}

/// Convert a vertex count to `u32`, failing when indices cannot address it.
pub(crate) fn checked_vertex_count(count: usize) -> Result<u32, MeshError> {
    u32::try_from(count).map_err(|_| MeshError::IndexOverflow)
}

/// The product of `factors` as a `u32` count. Overflow at any step is
/// [`MeshError::IndexOverflow`].
pub(crate) fn checked_count(factors: &[usize]) -> Result<u32, MeshError> {
    factors
        .iter()
        .try_fold(1_usize, |acc, &f| acc.checked_mul(f))
        .ok_or(MeshError::IndexOverflow)
        .and_then(checked_vertex_count)
}
