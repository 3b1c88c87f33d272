use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Default eye position.
pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 10.0, 3.0);
/// Default look direction. Must agree with [`DEFAULT_YAW`].
pub const DEFAULT_FRONT: Vec3 = Vec3::new(0.0, 0.0, -1.0);
/// Default world-space up reference.
pub const DEFAULT_WORLD_UP: Vec3 = Vec3::Y;
/// Yaw of -90° points the initial front down -Z.
pub const DEFAULT_YAW: f32 = -90.0;
/// Default pitch in degrees.
pub const DEFAULT_PITCH: f32 = 0.0;
/// World units per second.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 10.0;
/// Degrees per pointer-delta unit.
pub const DEFAULT_SENSITIVITY: f32 = 0.16;
/// Neutral zoom factor.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Pitch limit used when pitch is constrained.
pub const PITCH_LIMIT: f32 = 89.0;
/// Zoom bounds.
pub const ZOOM_MIN: f32 = 0.1;
/// Zoom bounds.
pub const ZOOM_MAX: f32 = 3.0;
/// Zoom change per scroll unit.
const ZOOM_STEP: f32 = 0.05;

/// Movement directions accepted by [`FlyCamera::translate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Along world-up.
    Up,
    /// Along the horizontal projection of front.
    Forward,
    /// Against the horizontal projection of front.
    Backward,
    /// Against the horizontal projection of right.
    Left,
    /// Along the horizontal projection of right.
    Right,
}

/// Free-fly camera driven by yaw/pitch angles.
///
/// The front/right/up basis is rebuilt from the angles after every
/// orientation change instead of being rotated incrementally, so it stays
/// orthonormal no matter how many updates accumulate.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    movement_speed: f32,
    sensitivity: f32,
    zoom: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION, DEFAULT_WORLD_UP, DEFAULT_YAW, DEFAULT_PITCH)
    }
}

impl FlyCamera {
    /// Camera at `position` looking along the direction given by `yaw` and
    /// `pitch` (degrees), with default speed, sensitivity and zoom.
    #[must_use]
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: DEFAULT_FRONT,
            right: Vec3::X,
            up: world_up,
            world_up,
            yaw,
            pitch,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_direction_vectors();
        camera
    }

    /// Camera configured from the `[camera]` options section.
    #[must_use]
    pub fn from_options(options: &CameraOptions) -> Self {
        let mut camera = Self::new(
            Vec3::from_array(options.position),
            Vec3::from_array(options.world_up),
            options.yaw,
            options.pitch,
        );
        camera.movement_speed = options.movement_speed;
        camera.sensitivity = options.sensitivity;
        camera.zoom = options.zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        camera
    }

    /// Apply a pointer delta.
    ///
    /// Yaw and pitch advance by the scaled offsets; with `constrain_pitch`
    /// the pitch is clamped to ±89° so the basis never degenerates at the
    /// poles.
    pub fn look(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.sensitivity;
        self.pitch += y_offset * self.sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_direction_vectors();
    }

    /// Move for `dt` seconds in `direction`.
    ///
    /// Horizontal moves use front/right with the vertical component dropped,
    /// so walking never changes altitude even while looking up or down.
    pub fn translate(&mut self, direction: Direction, dt: f32) {
        let distance = self.movement_speed * dt;
        let flat_front = Vec3::new(self.front.x, 0.0, self.front.z);
        let flat_right = Vec3::new(self.right.x, 0.0, self.right.z);
        match direction {
            Direction::Up => self.position += self.world_up * distance,
            Direction::Forward => self.position += flat_front * distance,
            Direction::Backward => self.position -= flat_front * distance,
            Direction::Left => self.position -= flat_right * distance,
            Direction::Right => self.position += flat_right * distance,
        }
    }

    /// Adjust zoom from a scroll delta.
    ///
    /// Only the vertical component zooms; `_x_offset` is accepted to mirror
    /// the scroll event and has no effect.
    pub fn handle_zoom(&mut self, _x_offset: f32, y_offset: f32) {
        self.zoom = (self.zoom - y_offset * ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Right-handed look-at view matrix (column-major).
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Rebuild front, right and up from yaw and pitch.
    fn update_direction_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let direction = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );

        self.front = direction.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Current zoom factor in `[0.1, 3.0]`.
    #[must_use]
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Eye position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the eye without touching orientation.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Unit look direction.
    #[must_use]
    pub const fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit right vector.
    #[must_use]
    pub const fn right(&self) -> Vec3 {
        self.right
    }

    /// Unit camera-up vector.
    #[must_use]
    pub const fn up(&self) -> Vec3 {
        self.up
    }

    /// Yaw in degrees.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees.
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World units per second.
    #[must_use]
    pub const fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    /// Degrees per pointer-delta unit.
    #[must_use]
    pub const fn sensitivity(&self) -> f32 {
        self.sensitivity
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(camera: &FlyCamera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        for v in [f, r, u] {
            assert!((v.length() - 1.0).abs() < EPS, "not unit: {v:?}");
        }
        assert!(f.dot(r).abs() < EPS, "front·right = {}", f.dot(r));
        assert!(f.dot(u).abs() < EPS, "front·up = {}", f.dot(u));
        assert!(r.dot(u).abs() < EPS, "right·up = {}", r.dot(u));
        // right-handed: right × up points backwards (against front)
        assert!((r.cross(u) + f).length() < 1e-4);
    }

    #[test]
    fn default_pose_looks_down_negative_z() {
        let camera = FlyCamera::default();
        assert_eq!(camera.position(), Vec3::new(0.0, 10.0, 3.0));
        assert!((camera.front() - DEFAULT_FRONT).length() < EPS);
        assert!((camera.right() - Vec3::X).length() < EPS);
        assert!((camera.up() - Vec3::Y).length() < EPS);
        assert_eq!(camera.zoom(), 1.0);
        assert_eq!(camera.movement_speed(), 10.0);
        assert_eq!(camera.sensitivity(), 0.16);
    }

    #[test]
    fn basis_is_orthonormal_over_the_sphere() {
        let mut yaw = 0.0;
        while yaw < 360.0 {
            let mut pitch = -89.5;
            while pitch < 90.0 {
                assert_orthonormal(&FlyCamera::new(Vec3::ZERO, Vec3::Y, yaw, pitch));
                pitch += 7.25;
            }
            yaw += 5.0;
        }
    }

    #[test]
    fn basis_survives_random_look_sequences() {
        let mut rng = rand::rng();
        let mut camera = FlyCamera::default();
        for _ in 0..2000 {
            camera.look(
                rng.random_range(-400.0..400.0),
                rng.random_range(-400.0..400.0),
                true,
            );
            assert!(camera.pitch() <= PITCH_LIMIT && camera.pitch() >= -PITCH_LIMIT);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn unconstrained_pitch_is_not_clamped() {
        let mut camera = FlyCamera::default();
        camera.look(0.0, 1000.0, false);
        assert!((camera.pitch() - 160.0).abs() < 1e-3);
    }

    #[test]
    fn zero_look_is_idempotent() {
        let mut camera = FlyCamera::new(Vec3::ONE, Vec3::Y, 33.0, -21.0);
        camera.look(0.0, 0.0, true);
        let settled = camera.clone();
        for _ in 0..1000 {
            camera.look(0.0, 0.0, true);
        }
        assert_eq!(camera, settled);
    }

    #[test]
    fn pure_yaw_keeps_front_level() {
        let mut camera = FlyCamera::default();
        camera.look(90.0, 0.0, true);
        assert_eq!(camera.front().y, 0.0);
        assert!((camera.yaw() - (-90.0 + 90.0 * 0.16)).abs() < 1e-4);
        assert_eq!(camera.pitch(), 0.0);
    }

    #[test]
    fn vertical_move_changes_only_altitude() {
        let mut camera = FlyCamera::default();
        camera.look(123.0, -250.0, true);
        let before = camera.position();
        camera.translate(Direction::Up, 0.5);
        let after = camera.position();
        assert_eq!(after.x, before.x);
        assert_eq!(after.z, before.z);
        assert!((after.y - before.y - 5.0).abs() < EPS);
    }

    #[test]
    fn horizontal_moves_keep_altitude_at_any_pitch() {
        for pitch_input in [-600.0, -100.0, 0.0, 100.0, 600.0] {
            let mut camera = FlyCamera::default();
            camera.look(40.0, pitch_input, true);
            let altitude = camera.position().y;
            for direction in [
                Direction::Forward,
                Direction::Backward,
                Direction::Left,
                Direction::Right,
            ] {
                camera.translate(direction, 0.37);
                assert_eq!(camera.position().y, altitude);
            }
        }
    }

    #[test]
    fn forward_then_backward_returns_home() {
        let mut camera = FlyCamera::default();
        let start = camera.position();
        camera.translate(Direction::Forward, 0.1);
        assert!((camera.position() - (start + Vec3::new(0.0, 0.0, -1.0))).length() < EPS);
        camera.translate(Direction::Backward, 0.1);
        camera.translate(Direction::Right, 0.2);
        camera.translate(Direction::Left, 0.2);
        assert!((camera.position() - start).length() < EPS);
    }

    #[test]
    fn zoom_is_clamped_for_any_scroll() {
        let mut camera = FlyCamera::default();
        for dy in [1e9, -1e9, 3.0, -57.0, 0.5, f32::MAX, f32::MIN] {
            camera.handle_zoom(0.0, dy);
            assert!((ZOOM_MIN..=ZOOM_MAX).contains(&camera.zoom()));
        }
        camera.handle_zoom(0.0, -1e9);
        assert_eq!(camera.zoom(), ZOOM_MAX);
        camera.handle_zoom(0.0, 1e9);
        assert_eq!(camera.zoom(), ZOOM_MIN);
    }

    #[test]
    fn horizontal_scroll_does_not_zoom() {
        let mut camera = FlyCamera::default();
        camera.handle_zoom(25.0, 0.0);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM);
        camera.handle_zoom(-4.0, 2.0);
        assert!((camera.zoom() - 0.9).abs() < EPS);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let mut camera = FlyCamera::default();
        camera.look(17.0, 9.0, true);
        camera.set_position(Vec3::new(4.0, -2.0, 8.0));
        let view = camera.view_matrix();
        let eye = view.transform_point3(camera.position());
        assert!(eye.length() < 1e-4);
        // A point ahead of the camera lands on -Z in view space.
        let ahead = view.transform_point3(camera.position() + camera.front() * 5.0);
        assert!((ahead - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn options_configure_pose_and_rates() {
        let options = CameraOptions {
            position: [1.0, 2.0, 3.0],
            movement_speed: 2.0,
            sensitivity: 1.0,
            zoom: 9.0,
            ..CameraOptions::default()
        };
        let mut camera = FlyCamera::from_options(&options);
        assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.zoom(), ZOOM_MAX);
        camera.translate(Direction::Up, 1.0);
        assert_eq!(camera.position().y, 4.0);
    }
}
