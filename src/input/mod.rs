//! Input handling: event types, key bindings, pointer tracking and the
//! processor that turns raw window events into camera motion and engine
//! commands.

/// Platform-agnostic input events.
pub mod event;
/// Bindable key actions.
pub mod keyboard;
/// First-mouse seeding and last cursor position.
pub(crate) mod mouse;
/// Converts raw events into camera updates and commands.
pub mod processor;

pub use event::InputEvent;
pub use keyboard::KeyAction;
pub use processor::{Command, InputProcessor, KeyBindings, PIXEL_SCROLL_SCALE};
