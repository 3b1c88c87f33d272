/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor), which
/// turns them into camera updates and engine [`Command`](super::Command)s.
///
/// # Example
///
/// ```
/// # use relief::camera::FlyCamera;
/// # use relief::input::{InputEvent, InputProcessor};
/// let mut camera = FlyCamera::default();
/// let mut input = InputProcessor::new();
/// let _ = input.handle_event(
///     &InputEvent::CursorMoved { x: 100.0, y: 200.0 },
///     &mut camera,
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute window position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels (grows downward).
        y: f32,
    },
    /// Raw relative pointer motion, used while the cursor is locked.
    MouseMotion {
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta (grows downward).
        dy: f32,
    },
    /// Scroll wheel or touchpad scroll.
    Scroll {
        /// Horizontal scroll amount.
        dx: f32,
        /// Vertical scroll amount (positive = away from the user).
        dy: f32,
    },
    /// Physical key pressed or released.
    Key {
        /// Key code string in `winit::keyboard::KeyCode` debug format
        /// (`"KeyW"`, `"Space"`, `"Escape"`).
        code: String,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// The window lost focus; held keys and pointer tracking reset.
    FocusLost,
}
