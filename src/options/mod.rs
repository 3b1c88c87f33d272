//! Centralized runtime options with TOML file support.
//!
//! Window, camera, terrain and key-binding settings are consolidated here.
//! Options serialize to/from TOML so a demo setup can be saved and reloaded.

mod camera;
mod terrain;
mod window;

use std::path::Path;

pub use camera::CameraOptions;
use serde::{Deserialize, Serialize};
pub use terrain::{TerrainMode, TerrainOptions};
pub use window::WindowOptions;

use crate::{error::ReliefError, input::KeyBindings};

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Window and framebuffer parameters.
    pub window: WindowOptions,
    /// Camera pose, control rates and projection.
    pub camera: CameraOptions,
    /// Terrain source and mesh parameters.
    pub terrain: TerrainOptions,
    /// Keyboard binding options.
    pub keybindings: KeyBindings,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::Io`] if the file cannot be read, or
    /// [`ReliefError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, ReliefError> {
        let content = std::fs::read_to_string(path).map_err(ReliefError::Io)?;
        toml::from_str(&content)
            .map_err(|e| ReliefError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::OptionsParse`] if serialization fails, or
    /// [`ReliefError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ReliefError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReliefError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ReliefError::Io)?;
        }
        std::fs::write(path, content).map_err(ReliefError::Io)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[camera]
movement_speed = 25.0

[terrain]
mode = "patch"
heightmap = "assets/heightmaps/iceland.png"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.camera.movement_speed, 25.0);
        assert_eq!(opts.camera.sensitivity, 0.16);
        assert_eq!(opts.terrain.mode, TerrainMode::Patch);
        assert_eq!(
            opts.terrain.heightmap,
            Some(PathBuf::from("assets/heightmaps/iceland.png"))
        );
        assert_eq!(opts.terrain.patch_resolution, 20);
        assert_eq!(opts.window.samples, 4);
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(opts.keybindings.lookup("KeyW"), Some(KeyAction::MoveForward));
        assert_eq!(opts.keybindings.lookup("Space"), Some(KeyAction::MoveUp));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn keybinding_table_layers_over_defaults() {
        let toml_str = r#"
[keybindings.bindings]
ArrowUp = "move_forward"
KeyW = "cycle_terrain_mode"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        let keys = &opts.keybindings;
        assert_eq!(keys.lookup("ArrowUp"), Some(KeyAction::MoveForward));
        assert_eq!(keys.lookup("KeyW"), Some(KeyAction::CycleTerrainMode));
        // Keys the file does not mention keep their default actions.
        assert_eq!(keys.lookup("KeyS"), Some(KeyAction::MoveBackward));
        assert_eq!(keys.lookup("Escape"), Some(KeyAction::Quit));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!(
            "relief-options-{}",
            std::process::id()
        ));
        let path = dir.join("nested").join("demo.toml");
        let mut opts = Options::default();
        opts.terrain.y_shift = -16.0;
        opts.window.title = "Fjords".into();
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("relief-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[camera\nfovy = ").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(ReliefError::OptionsParse(_))
        ));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn terrain_mode_parses_case_insensitively() {
        assert_eq!("Patch".parse::<TerrainMode>(), Ok(TerrainMode::Patch));
        assert!("voxel".parse::<TerrainMode>().is_err());
        assert_eq!(TerrainMode::Strip.to_string(), "strip");
    }
}
