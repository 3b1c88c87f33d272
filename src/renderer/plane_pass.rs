//! Flat subdivided plane.

use glam::{Mat4, Vec2, Vec3, Vec4};
use log::info;

use super::{
    pipeline_util::{self, TerrainPipelineDesc},
    TerrainPass,
};
use crate::{
    error::ReliefError,
    gpu::{
        pipeline_helpers, render_context::RenderContext,
        shader::{ShaderError, ShaderLibrary, ShaderProgram},
    },
    mesh::{checked_vertex_count, Mesh},
    options::{TerrainMode, TerrainOptions},
};

/// Plane corners before the model transform.
const UNIT_PLANE: [Vec3; 4] = [
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
];

const PLANE_COLOR: Vec4 = Vec4::new(0.35, 0.55, 0.35, 1.0);

const ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];

/// Draws the plane as an indexed triangle list.
pub struct PlanePass {
    program: ShaderProgram,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    model: Mat4,
}

impl PlanePass {
    /// Build the plane mesh and its pipeline.
    ///
    /// # Errors
    ///
    /// Mesh errors for zero divisions, shader errors from loading
    /// `terrain_plane`.
    pub fn new(
        context: &RenderContext,
        library: &mut ShaderLibrary,
        options: &TerrainOptions,
    ) -> Result<Self, ReliefError> {
        let mesh = Mesh::plane(UNIT_PLANE, options.plane_divisions)?;
        mesh.validate()?;
        info!(
            "plane mesh: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.indices.len()
        );

        let mut program = ShaderProgram::new(context, library, "terrain_plane")?;
        let uniforms = program.uniforms_mut();
        uniforms.set_vec4("color", PLANE_COLOR)?;
        uniforms.set_vec2("checker", checker_density(options.plane_divisions))?;

        let pipeline = pipeline_util::create_terrain_pipeline(
            context,
            &program,
            &TerrainPipelineDesc {
                label: "Plane Pipeline",
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                vertex_layouts: &[wgpu::VertexBufferLayout {
                    array_stride: (mesh.floats_per_vertex * size_of::<f32>())
                        as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &ATTRIBUTES,
                }],
                extra_bind_group_layouts: &[],
            },
        );

        let model = Mat4::from_scale(Vec3::splat(options.plane_scale))
            * Mat4::from_rotation_x(options.plane_rotation_deg.to_radians());

        Ok(Self {
            program,
            pipeline,
            vertex_buffer: pipeline_helpers::vertex_buffer(
                &context.device,
                "Plane Vertices",
                &mesh.vertices,
            ),
            index_buffer: pipeline_helpers::index_buffer(
                &context.device,
                "Plane Indices",
                &mesh.indices,
            ),
            index_count: checked_vertex_count(mesh.indices.len())?,
            model,
        })
    }
}

/// Checker cells per local unit so each cell of the `[-1, 1]` plane gets
/// one square.
#[allow(clippy::cast_precision_loss)]
fn checker_density(divisions: u32) -> Vec2 {
    Vec2::splat(divisions as f32 / 2.0)
}

impl TerrainPass for PlanePass {
    fn mode(&self) -> TerrainMode {
        TerrainMode::Plane
    }

    fn set_camera(&mut self, view: Mat4, projection: Mat4) -> Result<(), ShaderError> {
        pipeline_util::set_camera_uniforms(&mut self.program, self.model, view, projection)
    }

    fn upload(&self, queue: &wgpu::Queue) {
        self.program.upload(queue);
    }

    fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        self.program.bind(render_pass);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checker_matches_grid_cells() {
        // The unit plane spans two local units per axis.
        assert_eq!(checker_density(10), Vec2::splat(5.0));
        assert_eq!(checker_density(1) * 2.0, Vec2::ONE);
    }
}
