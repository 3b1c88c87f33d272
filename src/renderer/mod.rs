//! Terrain rendering.
//!
//! One pass per [`TerrainMode`]: the flat plane is always available; the
//! strip and patch passes exist only when a heightmap was supplied. All
//! meshes are generated and uploaded once at construction, so switching
//! modes at runtime only changes which pass is drawn.

pub mod patch_pass;
pub(crate) mod pipeline_util;
pub mod plane_pass;
pub mod strip_pass;

use glam::Mat4;
use log::{error, info};

use self::{patch_pass::PatchPass, plane_pass::PlanePass, strip_pass::StripPass};
use crate::{
    error::ReliefError,
    gpu::{
        render_context::RenderContext,
        shader::{ShaderError, ShaderLibrary},
        texture::FrameTargets,
    },
    mesh::Heightmap,
    options::{Options, TerrainMode},
};

/// Draw interface shared by the terrain passes.
pub trait TerrainPass {
    /// The mode this pass draws.
    fn mode(&self) -> TerrainMode;
    /// Stage the view and projection matrices.
    ///
    /// # Errors
    ///
    /// [`ShaderError`] if the shader lacks the camera uniforms.
    fn set_camera(&mut self, view: Mat4, projection: Mat4) -> Result<(), ShaderError>;
    /// Flush staged uniforms to the GPU.
    fn upload(&self, queue: &wgpu::Queue);
    /// Record draw commands. Sets its own pipeline and bind groups.
    fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>);
}

/// Owns the terrain passes and the depth/MSAA targets.
pub struct TerrainRenderer {
    plane: PlanePass,
    strip: Option<StripPass>,
    patch: Option<PatchPass>,
    targets: FrameTargets,
    clear_color: wgpu::Color,
}

impl TerrainRenderer {
    /// Load shaders, generate every available mesh and create the
    /// pipelines.
    ///
    /// # Errors
    ///
    /// Shader failures, mesh precondition violations and uniform blocks
    /// missing the camera matrices all abort construction.
    pub fn new(
        context: &RenderContext,
        options: &Options,
        heightmap: Option<&Heightmap>,
    ) -> Result<Self, ReliefError> {
        let terrain = &options.terrain;
        let mut library = ShaderLibrary::load(&terrain.shader_dir)?;

        let mut plane = PlanePass::new(context, &mut library, terrain)?;
        plane.set_camera(Mat4::IDENTITY, Mat4::IDENTITY)?;

        let (strip, patch) = match heightmap {
            Some(heightmap) => {
                let mut strip =
                    StripPass::new(context, &mut library, terrain, heightmap)?;
                strip.set_camera(Mat4::IDENTITY, Mat4::IDENTITY)?;
                let mut patch =
                    PatchPass::new(context, &mut library, terrain, heightmap)?;
                patch.set_camera(Mat4::IDENTITY, Mat4::IDENTITY)?;
                (Some(strip), Some(patch))
            }
            None => {
                info!("no heightmap: only plane mode is available");
                (None, None)
            }
        };

        let [r, g, b] = options.window.clear_color;
        Ok(Self {
            plane,
            strip,
            patch,
            targets: FrameTargets::new(
                &context.device,
                (context.width(), context.height()),
                context.format(),
                context.sample_count,
            ),
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        })
    }

    /// Whether `mode` can be drawn.
    #[must_use]
    pub const fn has_mode(&self, mode: TerrainMode) -> bool {
        match mode {
            TerrainMode::Plane => true,
            TerrainMode::Strip => self.strip.is_some(),
            TerrainMode::Patch => self.patch.is_some(),
        }
    }

    /// Modes that can be drawn, in cycling order.
    #[must_use]
    pub fn available_modes(&self) -> Vec<TerrainMode> {
        TerrainMode::ALL
            .into_iter()
            .filter(|&mode| self.has_mode(mode))
            .collect()
    }

    fn pass(&self, mode: TerrainMode) -> &dyn TerrainPass {
        match (mode, &self.strip, &self.patch) {
            (TerrainMode::Strip, Some(strip), _) => strip,
            (TerrainMode::Patch, _, Some(patch)) => patch,
            _ => &self.plane,
        }
    }

    fn pass_mut(&mut self, mode: TerrainMode) -> &mut dyn TerrainPass {
        match mode {
            TerrainMode::Strip => {
                if let Some(strip) = self.strip.as_mut() {
                    return strip;
                }
            }
            TerrainMode::Patch => {
                if let Some(patch) = self.patch.as_mut() {
                    return patch;
                }
            }
            TerrainMode::Plane => {}
        }
        &mut self.plane
    }

    /// Recreate the depth and MSAA targets for the current surface size.
    pub fn resize(&mut self, context: &RenderContext) {
        self.targets = FrameTargets::new(
            &context.device,
            (context.width(), context.height()),
            context.format(),
            context.sample_count,
        );
    }

    /// Draw `mode` with the given camera matrices and present.
    ///
    /// Unavailable modes fall back to the plane.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(
        &mut self,
        context: &RenderContext,
        mode: TerrainMode,
        view: Mat4,
        projection: Mat4,
    ) -> Result<(), wgpu::SurfaceError> {
        let pass = self.pass_mut(mode);
        if let Err(e) = pass.set_camera(view, projection) {
            error!("camera uniforms for {} pass: {e}", pass.mode());
        }
        pass.upload(&context.queue);

        let frame = context.get_next_frame()?;
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = context.create_encoder();
        {
            let mut render_pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Terrain Pass"),
                    color_attachments: &[Some(
                        self.targets
                            .color_attachment(&frame_view, self.clear_color),
                    )],
                    depth_stencil_attachment: Some(
                        self.targets.depth_attachment(),
                    ),
                    ..Default::default()
                });
            self.pass(mode).draw(&mut render_pass);
        }
        context.submit(encoder);
        frame.present();
        Ok(())
    }
}
