use std::fmt;

use log::{info, warn};

/// Errors that can occur during GPU context initialization.
#[derive(Debug)]
pub enum RenderContextError {
    /// Failed to create a wgpu surface from the window handle.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    AdapterRequest(wgpu::RequestAdapterError),
    /// GPU device request failed (limits or features not met).
    DeviceRequest(wgpu::RequestDeviceError),
    /// The adapter cannot present to this surface.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceCreation(e) => {
                write!(f, "could not create window surface: {e}")
            }
            Self::AdapterRequest(e) => {
                write!(f, "no GPU adapter can drive this surface: {e}")
            }
            Self::DeviceRequest(e) => {
                write!(f, "GPU device request failed: {e}")
            }
            Self::UnsupportedSurface => {
                write!(f, "adapter reports no configuration for the surface")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceCreation(e) => Some(e),
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
            Self::UnsupportedSurface => None,
        }
    }
}

/// Owns the window surface and the wgpu device/queue pair, plus the MSAA
/// sample count every terrain pipeline is built against.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    /// The window surface for presentation.
    pub surface: wgpu::Surface<'static>,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
    /// Effective MSAA sample count (the requested count, or 1 when the
    /// surface format does not support it).
    pub sample_count: u32,
    adapter_info: wgpu::AdapterInfo,
}

impl RenderContext {
    /// Create a render context for `window` at `initial_size`, requesting
    /// `samples`-times multisampling.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if surface creation, adapter request,
    /// device request, or surface configuration fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        samples: u32,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::SurfaceCreation)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;

        let adapter_info = adapter.get_info();
        info!(
            "GPU adapter: {} ({:?}, {:?})",
            adapter_info.name, adapter_info.backend, adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Terrain Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::DeviceRequest)?;

        info!("{}", terrain_limits_summary(&device.limits()));

        let mut config = surface
            .get_default_config(&adapter, initial_size.0, initial_size.1)
            .ok_or(RenderContextError::UnsupportedSurface)?;
        config.width = initial_size.0.max(1);
        config.height = initial_size.1.max(1);
        config.present_mode = wgpu::PresentMode::Fifo;

        surface.configure(&device, &config);

        let sample_count = supported_sample_count(&adapter, config.format, samples);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            sample_count,
            adapter_info,
        })
    }

    /// The surface texture format.
    #[must_use]
    pub const fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface width in physical pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.config.width
    }

    /// Current surface height in physical pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.config.height
    }

    /// Adapter name, backend and driver, as reported at startup.
    #[must_use]
    pub const fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Reconfigure the surface for the new window size. Ignores zero-sized
    /// dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size (after it was lost or
    /// became outdated).
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquire the next swapchain texture for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the surface is lost, outdated,
    /// or timed out.
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Create a new command encoder for recording GPU commands.
    #[must_use]
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Terrain Encoder"),
            })
    }

    /// Finish the encoder and submit its command buffer to the GPU queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Clamp a requested MSAA count to what the surface format supports.
fn supported_sample_count(
    adapter: &wgpu::Adapter,
    format: wgpu::TextureFormat,
    requested: u32,
) -> u32 {
    if requested <= 1 {
        return 1;
    }
    let flags = adapter.get_texture_format_features(format).flags;
    if flags.sample_count_supported(requested) {
        info!("MSAA: {requested}x");
        requested
    } else {
        warn!(
            "{requested}x MSAA unsupported for {format:?}, rendering without \
             multisampling"
        );
        1
    }
}

/// The device limits that bound the largest heightmap we can load: the
/// texture edge for patch mode and the buffer size for strip mode.
fn terrain_limits_summary(limits: &wgpu::Limits) -> String {
    format!(
        "max texture dimension 2d: {}, max buffer size: {} bytes",
        limits.max_texture_dimension_2d, limits.max_buffer_size
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_summary_reports_heightmap_bounds() {
        let limits = wgpu::Limits::downlevel_webgl2_defaults();
        let summary = terrain_limits_summary(&limits);
        assert!(summary.contains("max texture dimension 2d: 2048"));
        assert!(summary.contains(&format!("{} bytes", limits.max_buffer_size)));
        assert!(!summary.contains("compute"));
    }
}
