//! Shared wgpu boilerplate for the terrain pipelines.

/// Vertex-visible, filterable float 2D texture binding.
#[must_use]
pub const fn vertex_texture_2d(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Vertex-visible filtering sampler binding.
#[must_use]
pub const fn vertex_filtering_sampler(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Create a vertex buffer initialized with `data`.
#[must_use]
pub fn vertex_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    label: &str,
    data: &[T],
) -> wgpu::Buffer {
    init_buffer(device, label, bytemuck::cast_slice(data), wgpu::BufferUsages::VERTEX)
}

/// Create a `u32` index buffer initialized with `indices`.
#[must_use]
pub fn index_buffer(
    device: &wgpu::Device,
    label: &str,
    indices: &[u32],
) -> wgpu::Buffer {
    init_buffer(device, label, bytemuck::cast_slice(indices), wgpu::BufferUsages::INDEX)
}

fn init_buffer(
    device: &wgpu::Device,
    label: &str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    use wgpu::util::DeviceExt;

    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage,
    })
}
