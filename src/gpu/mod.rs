//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, shader loading with naga-oil
//! composition and naga reflection, render targets and the heightmap
//! texture.

/// Shared wgpu boilerplate helpers for the terrain pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader library, composition and GPU shader programs.
pub mod shader;
/// Depth/MSAA render targets and the heightmap texture.
pub mod texture;
/// Reflected uniform blocks with setters by member name.
pub mod uniforms;
