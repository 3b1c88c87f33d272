/// Pointer tracking for look deltas.
///
/// The first cursor position after startup (or after focus loss) only seeds
/// the tracker; it produces no delta, so the camera does not jump to wherever
/// the cursor happened to enter the window.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseState {
    first_mouse: bool,
    last_x: f32,
    last_y: f32,
}

impl MouseState {
    /// Tracker waiting for its first cursor position.
    pub const fn new() -> Self {
        Self {
            first_mouse: true,
            last_x: 0.0,
            last_y: 0.0,
        }
    }

    /// Record a cursor position and return the look offsets since the last
    /// one, or `None` for the seeding event.
    ///
    /// The y offset is reversed because window coordinates grow downward
    /// while pitch grows upward.
    pub fn handle_cursor(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.first_mouse {
            self.last_x = x;
            self.last_y = y;
            self.first_mouse = false;
            return None;
        }
        let offsets = (x - self.last_x, self.last_y - y);
        self.last_x = x;
        self.last_y = y;
        Some(offsets)
    }

    /// Forget the last position; the next cursor event seeds again.
    pub fn reset(&mut self) {
        self.first_mouse = true;
    }
}

impl Default for MouseState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_event_only_seeds() {
        let mut mouse = MouseState::new();
        assert_eq!(mouse.handle_cursor(400.0, 300.0), None);
        assert_eq!((mouse.last_x, mouse.last_y), (400.0, 300.0));
        assert_eq!(mouse.handle_cursor(410.0, 290.0), Some((10.0, 10.0)));
    }

    #[test]
    fn reset_reseeds() {
        let mut mouse = MouseState::new();
        let _ = mouse.handle_cursor(0.0, 0.0);
        mouse.reset();
        assert_eq!(mouse.handle_cursor(500.0, 500.0), None);
        assert_eq!(mouse.handle_cursor(500.0, 510.0), Some((0.0, -10.0)));
    }
}
