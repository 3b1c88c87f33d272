//! Standalone terrain window backed by winit.
//!
//! ```no_run
//! # use relief::{mesh::Heightmap, Viewer};
//! let heightmap = Heightmap::open("assets/heightmaps/iceland.png".as_ref())?;
//! Viewer::builder()
//!     .with_heightmap(heightmap)
//!     .build()
//!     .run()?;
//! # Ok::<(), relief::ReliefError>(())
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    error::ReliefError,
    input::{Command, InputEvent, PIXEL_SCROLL_SCALE},
    mesh::Heightmap,
    options::Options,
    TerrainEngine,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Options,
    heightmap: Option<Heightmap>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: Options::default(),
            heightmap: None,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Terrain to render in strip and patch modes.
    #[must_use]
    pub fn with_heightmap(mut self, heightmap: Heightmap) -> Self {
        self.heightmap = Some(heightmap);
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options,
            heightmap: self.heightmap,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window that renders the terrain and flies a camera over it.
///
/// The cursor is captured while the window has focus; W/A/S/D and Space
/// move, the mouse looks around, the wheel zooms, Tab cycles terrain modes
/// and Escape quits (all rebindable through [`Options`]).
pub struct Viewer {
    options: Options,
    heightmap: Option<Heightmap>,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// [`ReliefError::Viewer`] if the event loop or window cannot be
    /// created; any engine construction error (GPU, shader, mesh) is
    /// returned once the loop exits.
    pub fn run(self) -> Result<(), ReliefError> {
        let event_loop =
            EventLoop::new().map_err(|e| ReliefError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            options: Some(self.options),
            heightmap: self.heightmap,
            cursor_locked: false,
            init_error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ReliefError::Viewer(e.to_string()))?;

        app.init_error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<TerrainEngine>,
    /// Taken when the engine is built.
    options: Option<Options>,
    heightmap: Option<Heightmap>,
    /// Whether raw device motion drives the camera instead of cursor
    /// positions.
    cursor_locked: bool,
    init_error: Option<ReliefError>,
}

/// Compute the wgpu surface size from the window's inner size.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ReliefError) {
        log::error!("{error}");
        self.init_error = Some(error);
        event_loop.exit();
    }

    /// Hide the cursor and capture it so the camera can turn freely.
    fn capture_cursor(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                self.cursor_locked = true;
            }
            Err(e) => {
                log::warn!("cursor capture unavailable ({e}), using cursor positions");
                self.cursor_locked = false;
            }
        }
    }

    fn release_cursor(&mut self) {
        if let Some(window) = &self.window {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
        }
        self.cursor_locked = false;
    }

    /// Forward an input event; exit on [`Command::Quit`].
    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: &InputEvent) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        if engine.handle_input(event) == Some(Command::Quit) {
            event_loop.exit();
        }
    }

    fn redraw(&mut self) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let dt = engine.tick();
        engine.update(dt);
        match engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                match &self.window {
                    Some(w) => {
                        let (vp_w, vp_h) = viewport_size(w.inner_size());
                        engine.resize(vp_w, vp_h);
                    }
                    None => engine.recover_surface(),
                }
            }
            Err(e) => {
                log::error!("render error: {e:?}");
            }
        }
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(options) = self.options.take() else {
            return;
        };

        let attrs = Window::default_attributes()
            .with_title(&options.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                options.window.width,
                options.window.height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, ReliefError::Viewer(e.to_string()));
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        let engine = pollster::block_on(TerrainEngine::new(
            window.clone(),
            size,
            &options,
            self.heightmap.as_ref(),
        ));
        // The mesh and texture data are on the GPU now.
        self.heightmap = None;

        match engine {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
        self.capture_cursor();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(event_size) => {
                let (vp_w, vp_h) = viewport_size(event_size);
                if let Some(engine) = &mut self.engine {
                    engine.resize(vp_w, vp_h);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::Focused(true) => self.capture_cursor(),

            WindowEvent::Focused(false) => {
                self.release_cursor();
                self.dispatch(event_loop, &InputEvent::FocusLost);
            }

            WindowEvent::CursorMoved { position, .. } if !self.cursor_locked => {
                #[allow(clippy::cast_possible_truncation)]
                self.dispatch(
                    event_loop,
                    &InputEvent::CursorMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    },
                );
            }

            WindowEvent::MouseWheel { delta, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x, y),
                    MouseScrollDelta::PixelDelta(pos) => (
                        pos.x as f32 * PIXEL_SCROLL_SCALE,
                        pos.y as f32 * PIXEL_SCROLL_SCALE,
                    ),
                };
                self.dispatch(event_loop, &InputEvent::Scroll { dx, dy });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                if pressed && event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                self.dispatch(
                    event_loop,
                    &InputEvent::Key {
                        code: format!("{code:?}"),
                        pressed,
                    },
                );
            }

            _ => (),
        }
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if !self.cursor_locked {
            return;
        }
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            #[allow(clippy::cast_possible_truncation)]
            self.dispatch(
                event_loop,
                &InputEvent::MouseMotion {
                    dx: dx as f32,
                    dy: dy as f32,
                },
            );
        }
    }
}
