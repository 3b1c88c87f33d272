use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::mesh::HeightParams;

/// Which mesh the renderer draws.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TerrainMode {
    /// Flat subdivided plane (no heightmap needed).
    Plane,
    /// CPU-displaced heightmap grid drawn as triangle strips.
    #[default]
    Strip,
    /// Coarse patch grid displaced on the GPU.
    Patch,
}

impl TerrainMode {
    /// All modes in cycling order.
    pub const ALL: [Self; 3] = [Self::Plane, Self::Strip, Self::Patch];

    /// Whether this mode samples a heightmap.
    #[must_use]
    pub const fn needs_heightmap(self) -> bool {
        !matches!(self, Self::Plane)
    }
}

impl fmt::Display for TerrainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plane => "plane",
            Self::Strip => "strip",
            Self::Patch => "patch",
        };
        f.write_str(name)
    }
}

impl FromStr for TerrainMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plane" => Ok(Self::Plane),
            "strip" => Ok(Self::Strip),
            "patch" => Ok(Self::Patch),
            other => Err(format!(
                "unknown terrain mode '{other}' (expected plane, strip or patch)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Terrain source, mesh parameters and shader location.
pub struct TerrainOptions {
    /// Mode shown at startup.
    pub mode: TerrainMode,
    /// Heightmap image. Strip and patch modes are unavailable without one.
    pub heightmap: Option<PathBuf>,
    /// Directory holding the WGSL shaders (and a `modules/` subdirectory).
    pub shader_dir: PathBuf,
    /// World units per 8-bit height sample.
    pub y_scale: f32,
    /// Vertical offset applied after scaling.
    pub y_shift: f32,
    /// Cells per side of the flat plane.
    pub plane_divisions: u32,
    /// Uniform scale applied to the unit plane.
    pub plane_scale: f32,
    /// Rotation of the plane about +X in degrees.
    pub plane_rotation_deg: f32,
    /// Patches per side in patch mode.
    pub patch_resolution: u32,
    /// Cells per side inside each patch when it is subdivided on the GPU.
    pub tessellation_level: u32,
}

impl Default for TerrainOptions {
    fn default() -> Self {
        let height = HeightParams::default();
        Self {
            mode: TerrainMode::default(),
            heightmap: None,
            shader_dir: PathBuf::from("assets/shaders"),
            y_scale: height.y_scale,
            y_shift: height.y_shift,
            plane_divisions: 10,
            plane_scale: 16.0,
            plane_rotation_deg: 110.0,
            patch_resolution: 20,
            tessellation_level: 16,
        }
    }
}

impl TerrainOptions {
    /// Sample-to-height mapping shared by the strip and patch modes.
    #[must_use]
    pub const fn height_params(&self) -> HeightParams {
        HeightParams {
            y_scale: self.y_scale,
            y_shift: self.y_shift,
        }
    }
}
