//! CPU-displaced heightmap terrain drawn one triangle strip per row.

use glam::Mat4;
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
    },
    mesh::{Heightmap, Mesh, MeshError, PrimitiveMode},
    options::{TerrainMode, TerrainOptions},
};

const ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];

/// Draws the heightmap grid with `TriangleStrip` topology, issuing one
/// indexed draw per heightmap row.
pub struct StripPass {
    program: ShaderProgram,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    strips: u32,
    indices_per_strip: u32,
}

impl StripPass {
    /// Displace the heightmap grid on the CPU and upload it.
    ///
    /// # Errors
    ///
    /// Mesh errors for oversized heightmaps, shader errors from loading
    /// `terrain_strip`.
    pub fn new(
        context: &RenderContext,
        library: &mut ShaderLibrary,
        options: &TerrainOptions,
        heightmap: &Heightmap,
    ) -> Result<Self, ReliefError> {
        let params = options.height_params();
        let mesh = Mesh::heightmap_strips(heightmap, params)?;
        mesh.validate()?;
        let PrimitiveMode::TriangleStrip {
            strips,
            indices_per_strip,
        } = mesh.primitive
        else {
            return Err(MeshError::IndexOverflow.into());
        };
        info!(
            "strip mesh: {} vertices, {strips} strips of {indices_per_strip} \
             indices",
            mesh.vertex_count()
        );

        let mut program = ShaderProgram::new(context, library, "terrain_strip")?;
        let uniforms = program.uniforms_mut();
        uniforms.set_f32("y_scale", params.y_scale)?;
        uniforms.set_f32("y_shift", params.y_shift)?;

        let pipeline = pipeline_util::create_terrain_pipeline(
            context,
            &program,
            &TerrainPipelineDesc {
                label: "Strip Pipeline",
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: Some(wgpu::IndexFormat::Uint32),
                vertex_layouts: &[wgpu::VertexBufferLayout {
                    array_stride: (mesh.floats_per_vertex * size_of::<f32>())
                        as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &ATTRIBUTES,
                }],
                extra_bind_group_layouts: &[],
            },
        );

        Ok(Self {
            program,
            pipeline,
            vertex_buffer: pipeline_helpers::vertex_buffer(
                &context.device,
                "Strip Vertices",
                &mesh.vertices,
            ),
            index_buffer: pipeline_helpers::index_buffer(
                &context.device,
                "Strip Indices",
                &mesh.indices,
            ),
            strips,
            indices_per_strip,
        })
    }
}

impl TerrainPass for StripPass {
    fn mode(&self) -> TerrainMode {
        TerrainMode::Strip
    }

    fn set_camera(&mut self, view: Mat4, projection: Mat4) -> Result<(), ShaderError> {
        pipeline_util::set_camera_uniforms(&mut self.program, Mat4::IDENTITY, view, projection)
    }

    fn upload(&self, queue: &wgpu::Queue) {
        self.program.upload(queue);
    }

    fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.strips == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        self.program.bind(render_pass);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for strip in 0..self.strips {
            let start = strip * self.indices_per_strip;
            render_pass.draw_indexed(start..start + self.indices_per_strip, 0, 0..1);
        }
    }
}
