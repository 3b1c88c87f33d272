//! Camera system for terrain fly-through.
//!
//! Provides a yaw/pitch free-fly camera and the perspective projection that
//! its zoom factor feeds.

/// Free-fly camera state, movement and view matrix.
pub mod core;
/// Perspective projection parameters.
pub mod projection;

pub use self::core::{Direction, FlyCamera};
pub use self::projection::Projection;
