//! wgpu render backend for the shell planet.
//!
//! Draws one UV sphere once per shell. Frame-level values live in one uniform
//! buffer; per-shell heights live in a dynamic-offset buffer, one aligned slot
//! per shell.
//!
//! # Invariants
//! - Renderer never mutates application state.
//! - Shell draw order comes from `shellplanet_render::shell_draws`.
//! - Shell count is clamped to the uniform buffer's capacity.

mod context;
mod gpu;
mod mesh;
mod shaders;

pub use context::{GpuContext, GpuError};
pub use gpu::WgpuRenderer;
