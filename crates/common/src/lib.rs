//! Shared configuration for the shell planet demo.
//!
//! # Invariants
//! - `ShellParams` is the single flat record the UI edits and the renderer reads.
//! - Configuration loaded from disk is validated before anything consumes it.

pub mod config;
pub mod params;

pub use config::{AppConfig, CameraConfig, ConfigError, OrbitConfig, WindowConfig};
pub use params::{
    MAX_SHELL_COUNT, MIN_SHELL_COUNT, ShellParams, UI_MIN_SHELL_COUNT, shell_height,
};
