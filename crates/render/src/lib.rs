//! Rendering core: camera, orbit controller, shell pass ordering and the frame loop.
//!
//! # Invariants
//! - Renderers read a per-frame snapshot and never mutate application state.
//! - Shells are drawn outermost first.
//! - Input is applied only at the start of a frame, before update and render.

mod camera;
mod frame;
mod orbit;
mod renderer;
mod shells;

pub use camera::Camera;
pub use frame::{AppState, FrameHost, FrameLoop, LoopState, Viewport};
pub use orbit::OrbitController;
pub use renderer::{DebugTextRenderer, FrameUniforms, Renderer};
pub use shells::{ShellDraw, ShellDraws, ShellSink, shell_draws, submit_shells};

pub fn crate_info() -> &'static str {
    "shellplanet-render v0.1.0"
}
