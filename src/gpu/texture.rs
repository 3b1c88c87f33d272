//! Render targets and the heightmap texture.

use crate::mesh::Heightmap;

/// Depth format used by every terrain pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A texture and its default view.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl RenderTarget {
    /// Create an attachment-only texture with the given size, format and
    /// sample count.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Depth buffer plus, when multisampling, the color buffer resolved into the
/// swapchain image.
pub struct FrameTargets {
    /// Depth attachment (multisampled like the color attachment).
    pub depth: RenderTarget,
    /// Multisampled color attachment. `None` at one sample per pixel.
    pub msaa: Option<RenderTarget>,
}

impl FrameTargets {
    /// Allocate targets for a `size` surface of `format`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let depth = RenderTarget::new(device, "Depth Target", size, DEPTH_FORMAT, sample_count);
        let msaa = (sample_count > 1).then(|| {
            RenderTarget::new(device, "MSAA Color Target", size, format, sample_count)
        });
        Self { depth, msaa }
    }

    /// Color attachment for a frame: renders into the MSAA buffer and
    /// resolves into `frame_view`, or renders straight to `frame_view`.
    #[must_use]
    pub fn color_attachment<'a>(
        &'a self,
        frame_view: &'a wgpu::TextureView,
        clear: wgpu::Color,
    ) -> wgpu::RenderPassColorAttachment<'a> {
        let (view, resolve_target) = self
            .msaa
            .as_ref()
            .map_or((frame_view, None), |msaa| (&msaa.view, Some(frame_view)));
        wgpu::RenderPassColorAttachment {
            view,
            depth_slice: None,
            resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        }
    }

    /// Depth attachment cleared to the far plane.
    #[must_use]
    pub fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.depth.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops: None,
        }
    }
}

/// Single-channel heightmap texture sampled by the patch vertex shader.
pub struct HeightmapTexture {
    /// `R8Unorm` texture holding one byte per sample.
    pub texture: wgpu::Texture,
    /// Full-texture view.
    pub view: wgpu::TextureView,
    /// Clamped linear sampler.
    pub sampler: wgpu::Sampler,
}

impl HeightmapTexture {
    /// Upload `heightmap` as an `R8Unorm` texture.
    #[must_use]
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        heightmap: &Heightmap,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: heightmap.width(),
            height: heightmap.height(),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Heightmap"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            heightmap.samples(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(heightmap.width()),
                rows_per_image: Some(heightmap.height()),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Heightmap Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        Self {
            texture,
            view,
            sampler,
        }
    }
}
