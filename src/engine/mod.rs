//! The terrain engine: GPU context, camera, input and renderer wired into a
//! per-frame update/render cycle.

mod input;

use log::info;

use crate::{
    camera::{FlyCamera, Projection},
    error::ReliefError,
    gpu::render_context::RenderContext,
    input::InputProcessor,
    mesh::Heightmap,
    options::{Options, TerrainMode},
    renderer::TerrainRenderer,
    util::frame_timing::FrameTiming,
};

/// Owns everything needed to draw the terrain and fly over it.
///
/// # Frame cycle
///
/// ```ignore
/// let dt = engine.tick();
/// engine.update(dt);
/// engine.render()?;
/// ```
pub struct TerrainEngine {
    context: RenderContext,
    renderer: TerrainRenderer,
    camera: FlyCamera,
    projection: Projection,
    input: InputProcessor,
    frame_timing: FrameTiming,
    mode: TerrainMode,
}

impl TerrainEngine {
    /// Create the GPU context for `window`, generate meshes and load shaders.
    ///
    /// `heightmap` enables the strip and patch modes.
    ///
    /// # Errors
    ///
    /// - [`ReliefError::Gpu`] if no adapter/device/surface is usable.
    /// - [`ReliefError::Shader`] or [`ReliefError::Mesh`] if a terrain pass
    ///   cannot be built.
    /// - [`ReliefError::MissingHeightmap`] if the configured start mode needs
    ///   a heightmap and none was given.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: &Options,
        heightmap: Option<&Heightmap>,
    ) -> Result<Self, ReliefError> {
        let mode = options.terrain.mode;
        if mode.needs_heightmap() && heightmap.is_none() {
            return Err(ReliefError::MissingHeightmap(mode));
        }

        let context =
            RenderContext::new(window, size, options.window.samples).await?;
        let renderer = TerrainRenderer::new(&context, options, heightmap)?;

        let camera = FlyCamera::from_options(&options.camera);
        let projection = Projection::from_options(
            &options.camera,
            context.width(),
            context.height(),
        );
        let mut input =
            InputProcessor::with_key_bindings(options.keybindings.clone());
        input.set_constrain_pitch(options.camera.constrain_pitch);

        info!(
            "terrain engine ready: {mode} mode, available {:?}",
            renderer.available_modes()
        );

        Ok(Self {
            context,
            renderer,
            camera,
            projection,
            input,
            frame_timing: FrameTiming::new(),
            mode,
        })
    }

    /// Advance the frame clock. Returns seconds since the previous frame.
    pub fn tick(&mut self) -> f32 {
        self.frame_timing.tick()
    }

    /// Apply held movement keys for `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.input.update(&mut self.camera, dt);
    }

    /// Draw the current mode from the camera's point of view and present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let view = self.camera.view_matrix();
        let projection = self.projection.matrix(self.camera.zoom());
        self.renderer
            .render(&self.context, self.mode, view, projection)
    }

    /// Resize the surface, depth/MSAA targets and projection. Ignores
    /// zero-sized dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.projection.resize(width, height);
            self.renderer.resize(&self.context);
        }
    }

    /// Reconfigure the surface at its current size after it was lost.
    pub fn recover_surface(&self) {
        self.context.reconfigure();
    }

    /// Mode currently drawn.
    #[must_use]
    pub const fn mode(&self) -> TerrainMode {
        self.mode
    }

    /// Modes that can be drawn with the loaded data.
    #[must_use]
    pub fn available_modes(&self) -> Vec<TerrainMode> {
        self.renderer.available_modes()
    }

    /// The fly camera.
    #[must_use]
    pub const fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    /// Mutable access to the fly camera.
    pub fn camera_mut(&mut self) -> &mut FlyCamera {
        &mut self.camera
    }

    /// Smoothed frames per second.
    #[must_use]
    pub const fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Current surface size in physical pixels.
    #[must_use]
    pub const fn screen_size(&self) -> (u32, u32) {
        (self.context.width(), self.context.height())
    }
}

/// The mode after `current` among `available`, wrapping around. Returns
/// `current` when nothing else is available.
pub(crate) fn next_mode(
    current: TerrainMode,
    available: &[TerrainMode],
) -> TerrainMode {
    available
        .iter()
        .position(|&m| m == current)
        .map_or_else(
            || available.first().copied().unwrap_or(current),
            |i| available[(i + 1) % available.len()],
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_mode_cycles_in_order() {
        let all = TerrainMode::ALL;
        assert_eq!(next_mode(TerrainMode::Plane, &all), TerrainMode::Strip);
        assert_eq!(next_mode(TerrainMode::Strip, &all), TerrainMode::Patch);
        assert_eq!(next_mode(TerrainMode::Patch, &all), TerrainMode::Plane);
    }

    #[test]
    fn next_mode_with_only_plane_stays() {
        let plane_only = [TerrainMode::Plane];
        assert_eq!(next_mode(TerrainMode::Plane, &plane_only), TerrainMode::Plane);
    }

    #[test]
    fn next_mode_from_unavailable_jumps_to_first() {
        let plane_only = [TerrainMode::Plane];
        assert_eq!(next_mode(TerrainMode::Patch, &plane_only), TerrainMode::Plane);
        assert_eq!(next_mode(TerrainMode::Strip, &[]), TerrainMode::Strip);
    }
}
