use glam::{Mat4, Vec3};
use shellplanet_common::CameraConfig;

/// Perspective camera looking from `position` towards `target`.
///
/// Plain value type. The orbit controller overwrites position and target every
/// frame; projection parameters change only on resize or config reload.
///
/// Callers keep `0 < near < far`, `aspect > 0` and `position != target`. These
/// are checked in debug builds only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    /// Vertical field of view in degrees.
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1024.0 / 768.0)
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.position,
            target: Vec3::ZERO,
            fov: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        debug_assert!(aspect > 0.0);
        self.aspect = aspect;
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near;
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far;
    }

    /// Set the vertical field of view, in degrees.
    pub fn set_fov(&mut self, degrees: f32) {
        self.fov = degrees;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Right-handed look-at from position to target with `+Y` up.
    pub fn compute_view_matrix(&self) -> Mat4 {
        debug_assert!(self.position != self.target);
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Right-handed perspective projection. Depth maps `near -> 0`, `far -> 1`.
    pub fn compute_projection_matrix(&self) -> Mat4 {
        debug_assert!(self.near > 0.0 && self.near < self.far);
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn depth_at(proj: Mat4, distance: f32) -> f32 {
        let clip = proj * Vec4::new(0.0, 0.0, -distance, 1.0);
        clip.z / clip.w
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.fov(), 90.0);
        assert_eq!(cam.near(), 0.1);
        assert_eq!(cam.far(), 80.0);
    }

    #[test]
    fn projection_maps_near_and_far_to_depth_bounds() {
        let mut cam = Camera::default();
        cam.set_fov(90.0);
        cam.set_aspect_ratio(4.0 / 3.0);
        cam.set_near(0.1);
        cam.set_far(80.0);
        let proj = cam.compute_projection_matrix();

        assert!(depth_at(proj, 0.1).abs() < 1e-5);
        assert!((depth_at(proj, 80.0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn projection_depth_is_monotonic() {
        let mut cam = Camera::default();
        cam.set_near(0.1);
        cam.set_far(80.0);
        let proj = cam.compute_projection_matrix();

        let mut last = depth_at(proj, 0.1);
        for i in 1..=100 {
            let d = 0.1 + (80.0 - 0.1) * i as f32 / 100.0;
            let depth = depth_at(proj, d);
            assert!(depth > last, "depth not increasing at distance {d}");
            last = depth;
        }
    }

    #[test]
    fn view_matrix_puts_target_on_negative_z() {
        let mut cam = Camera::default();
        cam.set_position(Vec3::new(4.0, 2.0, 0.0));
        cam.set_target(Vec3::ZERO);
        let view = cam.compute_view_matrix();

        let target_in_view = view.transform_point3(Vec3::ZERO);
        let dist = Vec3::new(4.0, 2.0, 0.0).length();
        assert!(target_in_view.x.abs() < 1e-5);
        assert!(target_in_view.y.abs() < 1e-5);
        assert!((target_in_view.z + dist).abs() < 1e-5);

        let eye_in_view = view.transform_point3(cam.position());
        assert!(eye_in_view.length() < 1e-5);
    }

    #[test]
    fn aspect_ratio_scales_x_only() {
        let mut cam = Camera::default();
        cam.set_aspect_ratio(1.0);
        let square = cam.compute_projection_matrix();
        cam.set_aspect_ratio(2.0);
        let wide = cam.compute_projection_matrix();

        assert!((square.x_axis.x / wide.x_axis.x - 2.0).abs() < 1e-5);
        assert_eq!(square.y_axis.y, wide.y_axis.y);
    }
}
