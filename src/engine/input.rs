//! Input and command dispatch for `TerrainEngine`.

use log::debug;

use super::{next_mode, TerrainEngine};
use crate::{
    error::ReliefError,
    input::{Command, InputEvent},
    options::TerrainMode,
};

impl TerrainEngine {
    /// Process a platform-agnostic input event.
    ///
    /// Pointer and scroll events steer the camera immediately; movement
    /// keys are latched until [`update`](Self::update). Commands the engine
    /// can carry out itself (mode cycling) are executed here; every command
    /// is also returned so the caller can react to [`Command::Quit`].
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<Command> {
        let command = self.input.handle_event(event, &mut self.camera)?;
        self.execute(command);
        Some(command)
    }

    /// Carry out an engine command. [`Command::Quit`] is left to the event
    /// loop owner.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::CycleTerrainMode => {
                let _ = self.cycle_mode();
            }
            Command::Quit => {}
        }
    }

    /// Switch to the next available terrain mode and return it.
    pub fn cycle_mode(&mut self) -> TerrainMode {
        let next = next_mode(self.mode, &self.renderer.available_modes());
        if next != self.mode {
            debug!("terrain mode {} -> {next}", self.mode);
            self.mode = next;
        }
        self.mode
    }

    /// Switch to `mode`.
    ///
    /// # Errors
    ///
    /// [`ReliefError::MissingHeightmap`] if `mode` needs a heightmap that
    /// was not loaded.
    pub fn set_mode(&mut self, mode: TerrainMode) -> Result<(), ReliefError> {
        if !self.renderer.has_mode(mode) {
            return Err(ReliefError::MissingHeightmap(mode));
        }
        debug!("terrain mode {} -> {mode}", self.mode);
        self.mode = mode;
        Ok(())
    }
}
