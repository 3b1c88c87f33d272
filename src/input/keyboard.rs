use serde::{Deserialize, Serialize};

use crate::camera::Direction;

/// Actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// KeyW = "move_forward"
/// Tab = "cycle_terrain_mode"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Fly along the horizontal look direction.
    MoveForward,
    /// Fly against the horizontal look direction.
    MoveBackward,
    /// Strafe left.
    MoveLeft,
    /// Strafe right.
    MoveRight,
    /// Rise along world-up.
    MoveUp,
    /// Switch to the next available terrain mode.
    CycleTerrainMode,
    /// Close the viewer.
    Quit,
}

impl KeyAction {
    /// The camera direction for movement actions, `None` otherwise.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::MoveForward => Some(Direction::Forward),
            Self::MoveBackward => Some(Direction::Backward),
            Self::MoveLeft => Some(Direction::Left),
            Self::MoveRight => Some(Direction::Right),
            Self::MoveUp => Some(Direction::Up),
            Self::CycleTerrainMode | Self::Quit => None,
        }
    }
}
