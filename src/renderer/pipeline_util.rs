//! Pipeline construction shared by the terrain passes.

use glam::Mat4;

use crate::gpu::{
    render_context::RenderContext,
    shader::{ShaderError, ShaderProgram},
    texture::DEPTH_FORMAT,
};

/// Standard depth-stencil state used by all terrain pipelines.
pub fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Everything that differs between the terrain pipelines.
pub struct TerrainPipelineDesc<'a> {
    /// Debug label.
    pub label: &'a str,
    /// Primitive topology.
    pub topology: wgpu::PrimitiveTopology,
    /// Required for strip topologies drawn with an index buffer.
    pub strip_index_format: Option<wgpu::IndexFormat>,
    /// Vertex buffer layouts, slot order.
    pub vertex_layouts: &'a [wgpu::VertexBufferLayout<'a>],
    /// Bind group layouts after the program's uniform group.
    pub extra_bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
}

/// Create a terrain render pipeline with `vs_main` / `fs_main` entry points
/// rendering into the surface format at the context's sample count.
pub fn create_terrain_pipeline(
    context: &RenderContext,
    program: &ShaderProgram,
    desc: &TerrainPipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let mut bind_group_layouts = vec![program.bind_group_layout()];
    bind_group_layouts.extend_from_slice(desc.extra_bind_group_layouts);

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", desc.label)),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        },
    );

    context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: program.module(),
                entry_point: Some("vs_main"),
                buffers: desc.vertex_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: program.module(),
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format: desc.strip_index_format,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState {
                count: context.sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        })
}

/// Upload the three camera matrices every terrain shader declares.
pub fn set_camera_uniforms(
    program: &mut ShaderProgram,
    model: Mat4,
    view: Mat4,
    projection: Mat4,
) -> Result<(), ShaderError> {
    let uniforms = program.uniforms_mut();
    uniforms.set_mat4("model", model)?;
    uniforms.set_mat4("view", view)?;
    uniforms.set_mat4("projection", projection)
}
