//! Patch terrain displaced on the GPU.
//!
//! wgpu exposes no tessellation stages, so each coarse patch is drawn as
//! one instance of a shared subdivided unit quad. The patch's four corners
//! arrive through an instance-rate vertex buffer; the vertex shader blends
//! them at the quad's parametric coordinate and samples the heightmap
//! texture for the height.

use glam::{Mat4, Vec3};
use log::info;

use super::{
    pipeline_util::{self, TerrainPipelineDesc},
    TerrainPass,
};
use crate::{
    error::ReliefError,
    gpu::{
        pipeline_helpers,
        render_context::RenderContext,
        shader::{ShaderError, ShaderLibrary, ShaderProgram},
        texture::HeightmapTexture,
    },
    mesh::{checked_vertex_count, patch, plane, Heightmap, Mesh},
    options::{TerrainMode, TerrainOptions},
};

const UNIT_QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];

/// Four `(position, uv)` corners per instance.
const CORNER_ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
    1 => Float32x3, 2 => Float32x2,
    3 => Float32x3, 4 => Float32x2,
    5 => Float32x3, 6 => Float32x2,
    7 => Float32x3, 8 => Float32x2,
];

/// Bytes per patch in the instance buffer.
const PATCH_STRIDE: wgpu::BufferAddress = (patch::VERTICES_PER_PATCH as usize
    * patch::FLOATS_PER_VERTEX
    * size_of::<f32>()) as wgpu::BufferAddress;

/// Draws `resolution²` instanced patches over a heightmap texture.
pub struct PatchPass {
    program: ShaderProgram,
    pipeline: wgpu::RenderPipeline,
    quad_vertices: wgpu::Buffer,
    quad_indices: wgpu::Buffer,
    quad_index_count: u32,
    patches: wgpu::Buffer,
    patch_count: u32,
    _heightmap: HeightmapTexture,
    heightmap_bind_group: wgpu::BindGroup,
}

impl PatchPass {
    /// Build the patch grid, the shared subdivided quad and upload the
    /// heightmap texture.
    ///
    /// # Errors
    ///
    /// Mesh errors for a zero patch resolution or tessellation level,
    /// shader errors from loading `terrain_patch`.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        context: &RenderContext,
        library: &mut ShaderLibrary,
        options: &TerrainOptions,
        heightmap: &Heightmap,
    ) -> Result<Self, ReliefError> {
        // x spans heightmap rows and z spans columns, like the strip mesh.
        let grid = Mesh::patch_grid(
            heightmap.height() as f32,
            heightmap.width() as f32,
            options.patch_resolution,
        )?;
        let patch_count = checked_vertex_count(grid.patch_count())?;

        let level = options.tessellation_level;
        let quad = plane::plane(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::Y,
            level,
        )?;
        let quad_indices = plane::plane_indices(level)?;
        info!(
            "patch grid: {patch_count} patches, each subdivided {level}x{level}"
        );

        let params = options.height_params();
        let mut program = ShaderProgram::new(context, library, "terrain_patch")?;
        let uniforms = program.uniforms_mut();
        uniforms.set_f32("y_scale", params.y_scale)?;
        uniforms.set_f32("y_shift", params.y_shift)?;

        let texture =
            HeightmapTexture::upload(&context.device, &context.queue, heightmap);
        let heightmap_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Heightmap Layout"),
                entries: &[
                    pipeline_helpers::vertex_texture_2d(0),
                    pipeline_helpers::vertex_filtering_sampler(1),
                ],
            },
        );
        let heightmap_bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Heightmap Bind Group"),
                layout: &heightmap_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                ],
            });

        let pipeline = pipeline_util::create_terrain_pipeline(
            context,
            &program,
            &TerrainPipelineDesc {
                label: "Patch Pipeline",
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                vertex_layouts: &[
                    wgpu::VertexBufferLayout {
                        array_stride: (3 * size_of::<f32>()) as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &UNIT_QUAD_ATTRIBUTES,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: PATCH_STRIDE,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &CORNER_ATTRIBUTES,
                    },
                ],
                extra_bind_group_layouts: &[&heightmap_layout],
            },
        );

        Ok(Self {
            program,
            pipeline,
            quad_vertices: pipeline_helpers::vertex_buffer(
                &context.device,
                "Patch Quad Vertices",
                &quad,
            ),
            quad_index_count: checked_vertex_count(quad_indices.len())?,
            quad_indices: pipeline_helpers::index_buffer(
                &context.device,
                "Patch Quad Indices",
                &quad_indices,
            ),
            patches: pipeline_helpers::vertex_buffer(
                &context.device,
                "Patch Corners",
                &grid.vertices,
            ),
            patch_count,
            _heightmap: texture,
            heightmap_bind_group,
        })
    }
}

impl TerrainPass for PatchPass {
    fn mode(&self) -> TerrainMode {
        TerrainMode::Patch
    }

    fn set_camera(&mut self, view: Mat4, projection: Mat4) -> Result<(), ShaderError> {
        pipeline_util::set_camera_uniforms(&mut self.program, Mat4::IDENTITY, view, projection)
    }

    fn upload(&self, queue: &wgpu::Queue) {
        self.program.upload(queue);
    }

    fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        self.program.bind(render_pass);
        render_pass.set_bind_group(1, &self.heightmap_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.quad_vertices.slice(..));
        render_pass.set_vertex_buffer(1, self.patches.slice(..));
        render_pass.set_index_buffer(self.quad_indices.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.quad_index_count, 0, 0..self.patch_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_attributes_cover_one_patch() {
        let last = CORNER_ATTRIBUTES[7];
        assert_eq!(last.shader_location, 8);
        assert_eq!(last.offset + 8, PATCH_STRIDE);
        assert_eq!(PATCH_STRIDE, 80);
    }
}
