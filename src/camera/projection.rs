use glam::Mat4;

use crate::options::CameraOptions;

/// Perspective projection parameters.
///
/// The camera's zoom factor scales the vertical field of view at matrix
/// build time, so zooming out (larger factor) widens the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees at zoom 1.0.
    pub fovy: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Projection {
    /// Projection for a `width × height` viewport using the option values.
    #[must_use]
    pub fn from_options(options: &CameraOptions, width: u32, height: u32) -> Self {
        let mut projection = Self {
            fovy: options.fovy,
            aspect: 1.0,
            znear: options.znear,
            zfar: options.zfar,
        };
        projection.resize(width, height);
        projection
    }

    /// Update the aspect ratio. Zero-sized viewports are ignored.
    #[allow(clippy::cast_precision_loss)]
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Field of view after zoom, clamped to `[1°, 179°]`.
    #[must_use]
    pub fn effective_fovy(&self, zoom: f32) -> f32 {
        (self.fovy * zoom).clamp(1.0, 179.0)
    }

    /// Right-handed perspective matrix with `[0, 1]` depth (wgpu convention).
    #[must_use]
    pub fn matrix(&self, zoom: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.effective_fovy(zoom).to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn resize_updates_aspect_and_ignores_zero() {
        let mut projection =
            Projection::from_options(&CameraOptions::default(), 800, 600);
        assert!((projection.aspect - 800.0 / 600.0).abs() < 1e-6);
        projection.resize(0, 100);
        assert!((projection.aspect - 800.0 / 600.0).abs() < 1e-6);
        projection.resize(100, 100);
        assert_eq!(projection.aspect, 1.0);
    }

    #[test]
    fn zoom_scales_field_of_view() {
        let projection =
            Projection::from_options(&CameraOptions::default(), 100, 100);
        assert_eq!(projection.effective_fovy(1.0), 45.0);
        assert_eq!(projection.effective_fovy(2.0), 90.0);
        assert_eq!(projection.effective_fovy(10.0), 179.0);
    }

    #[test]
    fn near_plane_maps_to_zero_depth() {
        let projection =
            Projection::from_options(&CameraOptions::default(), 100, 100);
        let clip = projection.matrix(1.0)
            * Vec3::new(0.0, 0.0, -projection.znear).extend(1.0);
        assert!((clip.z / clip.w).abs() < 1e-5);
    }
}
