use crate::camera::Camera;
use glam::Vec3;
use shellplanet_common::OrbitConfig;

/// Orbit controller: a distance and an azimuth around a target point.
///
/// Only the two scalars persist between frames. The camera pose is a pure
/// function of `(distance, angle, target)` recomputed by [`OrbitController::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitController {
    distance: f32,
    angle: f32,
    config: OrbitConfig,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(OrbitConfig::default())
    }
}

impl OrbitController {
    pub fn new(config: OrbitConfig) -> Self {
        debug_assert!(config.vertical_bias != 0.0);
        Self {
            distance: config.distance.max(config.min_distance),
            angle: config.angle,
            config,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn target(&self) -> Vec3 {
        self.config.target
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Apply one scroll event. Vertical scroll zooms, horizontal scroll orbits.
    pub fn scroll(&mut self, dx: f32, dy: f32) {
        self.distance -= dy * self.config.zoom_sensitivity;
        self.distance = self.distance.max(self.config.min_distance);
        self.angle -= dx * self.config.rotate_sensitivity;
    }

    /// Unit vector from target to camera.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.angle.cos(), self.config.vertical_bias, self.angle.sin()).normalize()
    }

    pub fn offset(&self) -> Vec3 {
        self.direction() * self.distance
    }

    pub fn position(&self) -> Vec3 {
        self.config.target + self.offset()
    }

    /// Point `camera` at the target from the current orbit pose.
    pub fn apply(&self, camera: &mut Camera) {
        camera.set_target(self.config.target);
        camera.set_position(self.position());
    }
}
