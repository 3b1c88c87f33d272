//! Converts raw platform events into camera updates and engine commands.
//!
//! The `InputProcessor` owns all transient input state (first-mouse
//! seeding, last cursor position, held movement keys) and the key-binding
//! map. The camera is passed in explicitly on every call; nothing is stashed
//! in window user data or globals.

use std::collections::HashMap;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::event::InputEvent;
use super::keyboard::KeyAction;
use super::mouse::MouseState;
use crate::camera::{Direction, FlyCamera};

/// Scale applied to pixel-precise (touchpad) scroll deltas so they match
/// wheel line deltas.
pub const PIXEL_SCROLL_SCALE: f32 = 0.01;

/// Maps physical key strings to [`KeyAction`]s.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyW"`, `"Space"`, `"Escape"`, etc.
///
/// A loaded `[keybindings.bindings]` table is layered over the defaults one
/// key at a time: listed keys are rebound, unlisted defaults stay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "KeyBindingsFile")]
pub struct KeyBindings {
    /// Forward map: key string → action.
    bindings: HashMap<String, KeyAction>,
}

/// On-disk form of [`KeyBindings`]: only the keys the user listed.
#[derive(Deserialize, Default)]
#[serde(default)]
struct KeyBindingsFile {
    bindings: HashMap<String, KeyAction>,
}

impl From<KeyBindingsFile> for KeyBindings {
    fn from(file: KeyBindingsFile) -> Self {
        let mut merged = Self::default();
        merged.bindings.extend(file.bindings);
        merged
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyW".into(), KeyAction::MoveForward),
            ("KeyS".into(), KeyAction::MoveBackward),
            ("KeyA".into(), KeyAction::MoveLeft),
            ("KeyD".into(), KeyAction::MoveRight),
            ("Space".into(), KeyAction::MoveUp),
            ("Tab".into(), KeyAction::CycleTerrainMode),
            ("Escape".into(), KeyAction::Quit),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the action for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.bindings.get(key).copied()
    }

    /// Bind `key` to `action`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, action: KeyAction) {
        let _ = self.bindings.insert(key.into(), action);
    }
}

/// Discrete engine-level requests produced by key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch to the next available terrain mode.
    CycleTerrainMode,
    /// Close the viewer.
    Quit,
}

/// Converts [`InputEvent`]s into camera motion and [`Command`]s.
///
/// Pointer and scroll events act on the camera immediately. Movement keys
/// are latched while held and applied once per frame by
/// [`update`](Self::update) so motion scales with frame time rather than
/// key-repeat rate.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if let Some(cmd) = input.handle_event(&event, &mut camera) {
///     engine.execute(cmd);
/// }
/// // Once per frame:
/// input.update(&mut camera, dt);
/// ```
#[derive(Debug, Clone)]
pub struct InputProcessor {
    mouse: MouseState,
    /// Held movement keys by key string. Two keys bound to one direction
    /// are tracked separately.
    held: FxHashMap<String, Direction>,
    key_bindings: KeyBindings,
    constrain_pitch: bool,
}

impl InputProcessor {
    /// Create a processor with default key bindings and pitch clamping on.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mouse: MouseState::new(),
            held: FxHashMap::default(),
            key_bindings: KeyBindings::default(),
            constrain_pitch: true,
        }
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Enable or disable the ±89° pitch clamp for look events.
    pub fn set_constrain_pitch(&mut self, constrain: bool) {
        self.constrain_pitch = constrain;
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub const fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Whether a movement direction is currently held.
    #[must_use]
    pub fn is_held(&self, direction: Direction) -> bool {
        self.held.values().any(|&held| held == direction)
    }

    /// Process one event. Returns a command for bound non-movement keys.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        camera: &mut FlyCamera,
    ) -> Option<Command> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                if let Some((dx, dy)) = self.mouse.handle_cursor(*x, *y) {
                    camera.look(dx, dy, self.constrain_pitch);
                }
                None
            }
            InputEvent::MouseMotion { dx, dy } => {
                camera.look(*dx, -*dy, self.constrain_pitch);
                None
            }
            InputEvent::Scroll { dx, dy } => {
                camera.handle_zoom(*dx, *dy);
                None
            }
            InputEvent::Key { code, pressed } => {
                self.handle_key(code, *pressed)
            }
            InputEvent::FocusLost => {
                self.held.clear();
                self.mouse.reset();
                None
            }
        }
    }

    /// Latch or release movement keys; map presses of other bound keys to
    /// commands.
    fn handle_key(&mut self, code: &str, pressed: bool) -> Option<Command> {
        let action = self.key_bindings.lookup(code)?;
        if let Some(direction) = action.direction() {
            if pressed {
                let _ = self.held.insert(code.to_owned(), direction);
            } else {
                let _ = self.held.remove(code);
            }
            return None;
        }
        if !pressed {
            return None;
        }
        match action {
            KeyAction::CycleTerrainMode => Some(Command::CycleTerrainMode),
            KeyAction::Quit => Some(Command::Quit),
            _ => None,
        }
    }

    /// Move along every held direction for `dt` seconds. A direction held
    /// through several keys moves once.
    pub fn update(&self, camera: &mut FlyCamera, dt: f32) {
        let directions: FxHashSet<Direction> =
            self.held.values().copied().collect();
        for direction in directions {
            camera.translate(direction, dt);
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn key(code: &str, pressed: bool) -> InputEvent {
        InputEvent::Key {
            code: code.into(),
            pressed,
        }
    }

    #[test]
    fn first_cursor_event_does_not_rotate() {
        let mut input = InputProcessor::new();
        let mut camera = FlyCamera::default();
        let start = camera.clone();

        let _ = input.handle_event(
            &InputEvent::CursorMoved { x: 640.0, y: 360.0 },
            &mut camera,
        );
        assert_eq!(camera, start);

        let _ = input.handle_event(
            &InputEvent::CursorMoved { x: 650.0, y: 350.0 },
            &mut camera,
        );
        assert!((camera.yaw() - (-90.0 + 10.0 * 0.16)).abs() < 1e-4);
        // Moving the cursor up pitches the camera up.
        assert!((camera.pitch() - 10.0 * 0.16).abs() < 1e-4);
    }

    #[test]
    fn raw_motion_inverts_vertical_axis() {
        let mut input = InputProcessor::new();
        let mut camera = FlyCamera::default();
        let _ = input.handle_event(
            &InputEvent::MouseMotion { dx: 0.0, dy: -20.0 },
            &mut camera,
        );
        assert!(camera.pitch() > 0.0);
    }

    #[test]
    fn pitch_is_clamped_by_default() {
        let mut input = InputProcessor::new();
        let mut camera = FlyCamera::default();
        let _ = input.handle_event(
            &InputEvent::MouseMotion {
                dx: 0.0,
                dy: -10_000.0,
            },
            &mut camera,
        );
        assert_eq!(camera.pitch(), 89.0);

        input.set_constrain_pitch(false);
        let _ = input.handle_event(
            &InputEvent::MouseMotion { dx: 0.0, dy: -100.0 },
            &mut camera,
        );
        assert!(camera.pitch() > 89.0);
    }

    #[test]
    fn scroll_zooms_vertically_only() {
        let mut input = InputProcessor::new();
        let mut camera = FlyCamera::default();
        let _ = input
            .handle_event(&InputEvent::Scroll { dx: 5.0, dy: 0.0 }, &mut camera);
        assert_eq!(camera.zoom(), 1.0);
        let _ = input
            .handle_event(&InputEvent::Scroll { dx: 0.0, dy: 2.0 }, &mut camera);
        assert!((camera.zoom() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn held_keys_move_every_frame_until_released() {
        let mut input = InputProcessor::new();
        let mut camera = FlyCamera::default();
        assert_eq!(input.handle_event(&key("Space", true), &mut camera), None);
        assert!(input.is_held(Direction::Up));

        input.update(&mut camera, 0.1);
        input.update(&mut camera, 0.1);
        assert!((camera.position().y - 12.0).abs() < 1e-5);

        let _ = input.handle_event(&key("Space", false), &mut camera);
        input.update(&mut camera, 0.1);
        assert!((camera.position().y - 12.0).abs() < 1e-5);
    }

    #[test]
    fn combined_keys_apply_together() {
        let mut input = InputProcessor::new();
        let mut camera = FlyCamera::default();
        let _ = input.handle_event(&key("KeyW", true), &mut camera);
        let _ = input.handle_event(&key("KeyD", true), &mut camera);
        input.update(&mut camera, 0.1);
        let moved = camera.position() - Vec3::new(0.0, 10.0, 3.0);
        assert!((moved - Vec3::new(1.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn focus_loss_releases_keys_and_reseeds_pointer() {
        let mut input = InputProcessor::new();
        let mut camera = FlyCamera::default();
        let _ = input.handle_event(&key("KeyS", true), &mut camera);
        let _ = input.handle_event(
            &InputEvent::CursorMoved { x: 1.0, y: 1.0 },
            &mut camera,
        );
        let _ = input.handle_event(&InputEvent::FocusLost, &mut camera);
        assert!(!input.is_held(Direction::Backward));

        let before = camera.clone();
        let _ = input.handle_event(
            &InputEvent::CursorMoved { x: 900.0, y: 900.0 },
            &mut camera,
        );
        assert_eq!(camera, before);
    }

    #[test]
    fn command_keys_fire_on_press_only() {
        let mut input = InputProcessor::new();
        let mut camera = FlyCamera::default();
        assert_eq!(
            input.handle_event(&key("Tab", true), &mut camera),
            Some(Command::CycleTerrainMode)
        );
        assert_eq!(input.handle_event(&key("Tab", false), &mut camera), None);
        assert_eq!(
            input.handle_event(&key("Escape", true), &mut camera),
            Some(Command::Quit)
        );
        assert_eq!(input.handle_event(&key("KeyQ", true), &mut camera), None);
    }

    #[test]
    fn bind_adds_to_defaults() {
        let mut bindings = KeyBindings::default();
        bindings.bind("ArrowUp", KeyAction::MoveForward);
        let input = InputProcessor::with_key_bindings(bindings);
        assert_eq!(
            input.key_bindings().lookup("ArrowUp"),
            Some(KeyAction::MoveForward)
        );
        assert_eq!(
            input.key_bindings().lookup("KeyW"),
            Some(KeyAction::MoveForward)
        );
    }

    #[test]
    fn shared_direction_keeps_moving_until_every_key_is_released() {
        let mut bindings = KeyBindings::default();
        bindings.bind("ArrowUp", KeyAction::MoveUp);
        let mut input = InputProcessor::with_key_bindings(bindings);
        let mut camera = FlyCamera::default();

        let _ = input.handle_event(&key("Space", true), &mut camera);
        let _ = input.handle_event(&key("ArrowUp", true), &mut camera);
        input.update(&mut camera, 0.1);
        // Two keys on one direction do not double the speed.
        assert!((camera.position().y - 11.0).abs() < 1e-5);

        let _ = input.handle_event(&key("Space", false), &mut camera);
        assert!(input.is_held(Direction::Up));
        input.update(&mut camera, 0.1);
        assert!((camera.position().y - 12.0).abs() < 1e-5);

        let _ = input.handle_event(&key("ArrowUp", false), &mut camera);
        assert!(!input.is_held(Direction::Up));
        input.update(&mut camera, 0.1);
        assert!((camera.position().y - 12.0).abs() < 1e-5);
    }
}
