use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Window and framebuffer parameters.
pub struct WindowOptions {
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Requested MSAA sample count (falls back to 1 when unsupported).
    pub samples: u32,
    /// Framebuffer clear color (linear RGB).
    pub clear_color: [f64; 3],
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Terrain".into(),
            samples: 4,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}
