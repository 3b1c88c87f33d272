use serde::{Deserialize, Serialize};

use crate::camera::core::{
    DEFAULT_MOVEMENT_SPEED, DEFAULT_PITCH, DEFAULT_SENSITIVITY, DEFAULT_YAW,
    DEFAULT_ZOOM,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera pose, control rates and projection parameters.
pub struct CameraOptions {
    /// Initial eye position.
    pub position: [f32; 3],
    /// World-space up reference.
    pub world_up: [f32; 3],
    /// Initial yaw in degrees (-90 looks down -Z).
    pub yaw: f32,
    /// Initial pitch in degrees.
    pub pitch: f32,
    /// World units per second.
    pub movement_speed: f32,
    /// Degrees per pointer-delta unit.
    pub sensitivity: f32,
    /// Initial zoom factor, clamped to `[0.1, 3.0]`.
    pub zoom: f32,
    /// Clamp pitch to ±89° while looking around.
    pub constrain_pitch: bool,
    /// Vertical field of view in degrees at zoom 1.0.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 3.0],
            world_up: [0.0, 1.0, 0.0],
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
            constrain_pitch: true,
            fovy: 45.0,
            znear: 0.1,
            zfar: 2000.0,
        }
    }
}
