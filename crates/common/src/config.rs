//! Application configuration, loaded from and saved to pretty JSON.

use crate::params::{MAX_SHELL_COUNT, MIN_SHELL_COUNT, ShellParams};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("shell count {count} outside [2, 256]")]
    ShellCount { count: u32 },
    #[error("clip planes must satisfy 0 < near < far (near={near}, far={far})")]
    ClipRange { near: f32, far: f32 },
    #[error("orbit vertical bias must be non-zero")]
    ZeroVerticalBias,
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Shell Planet".into(),
            width: 1024,
            height: 768,
        }
    }
}

/// Initial camera projection and pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Position before the first orbit update.
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 0.1,
            far: 80.0,
            position: Vec3::new(0.0, 0.0, 3.0),
        }
    }
}

/// Orbit controller tuning and initial state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    pub distance: f32,
    /// Azimuth in radians.
    pub angle: f32,
    /// Distance change per unit of vertical scroll.
    pub zoom_sensitivity: f32,
    /// Angle change (radians) per unit of horizontal scroll.
    pub rotate_sensitivity: f32,
    /// Distance floor; keeps the camera from crossing the target.
    pub min_distance: f32,
    /// Y component of the unnormalized orbit direction.
    pub vertical_bias: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 5.0,
            angle: 0.0,
            zoom_sensitivity: 0.1,
            rotate_sensitivity: 0.01,
            min_distance: 0.1,
            vertical_bias: 0.5,
        }
    }
}

/// Top-level configuration record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub shells: ShellParams,
}

impl AppConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Check the numeric invariants the camera, orbit and shell renderer rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let CameraConfig { near, far, .. } = self.camera;
        if !(near > 0.0 && near < far) {
            return Err(ConfigError::ClipRange { near, far });
        }
        positive("camera.fov_degrees", self.camera.fov_degrees)?;
        positive("window.width", self.window.width as f32)?;
        positive("window.height", self.window.height as f32)?;
        positive("orbit.min_distance", self.orbit.min_distance)?;
        if self.orbit.vertical_bias == 0.0 {
            return Err(ConfigError::ZeroVerticalBias);
        }
        let count = self.shells.shell_count;
        if !(MIN_SHELL_COUNT..=MAX_SHELL_COUNT).contains(&count) {
            return Err(ConfigError::ShellCount { count });
        }
        positive("shells.planet_radius", self.shells.planet_radius)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn defaults_match_demo_startup() {
        let c = AppConfig::default();
        assert_eq!(c.window.width, 1024);
        assert_eq!(c.window.height, 768);
        assert_eq!(c.camera.fov_degrees, 90.0);
        assert_eq!(c.camera.near, 0.1);
        assert_eq!(c.camera.far, 80.0);
        assert_eq!(c.orbit.distance, 5.0);
        assert_eq!(c.orbit.vertical_bias, 0.5);
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let mut c = AppConfig::default();
        c.camera.near = 100.0;
        assert!(matches!(c.validate(), Err(ConfigError::ClipRange { .. })));
    }

    #[test]
    fn rejects_zero_near() {
        let mut c = AppConfig::default();
        c.camera.near = 0.0;
        assert!(matches!(c.validate(), Err(ConfigError::ClipRange { .. })));
    }

    #[test]
    fn rejects_single_shell() {
        let mut c = AppConfig::default();
        c.shells.shell_count = 1;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ShellCount { count: 1 })
        ));
    }

    #[test]
    fn rejects_zero_vertical_bias() {
        let mut c = AppConfig::default();
        c.orbit.vertical_bias = 0.0;
        assert!(matches!(c.validate(), Err(ConfigError::ZeroVerticalBias)));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut c = AppConfig::default();
        c.orbit.zoom_sensitivity = 0.25;
        c.shells.shell_count = 64;
        c.save(tmp.path()).unwrap();

        let loaded = AppConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, c);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), r#"{ "shells": { "shell_count": 0 } }"#).unwrap();
        assert!(matches!(
            AppConfig::load(tmp.path()),
            Err(ConfigError::ShellCount { count: 0 })
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
