use crate::camera::Camera;
use crate::shells::{ShellDraw, submit_shells};
use glam::Mat4;
use shellplanet_common::ShellParams;

/// Everything a renderer reads for one frame, captured at a single point.
///
/// The UI may edit the live parameters while this snapshot is being drawn;
/// the snapshot itself never changes, so a frame cannot see a torn record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera: Camera,
    /// Seconds since startup.
    pub time: f32,
    pub shells: ShellParams,
    pub wireframe: bool,
}

impl FrameUniforms {
    pub fn capture(camera: &Camera, shells: &ShellParams, time: f32, wireframe: bool) -> Self {
        Self {
            view: camera.compute_view_matrix(),
            projection: camera.compute_projection_matrix(),
            camera: *camera,
            time,
            shells: *shells,
            wireframe,
        }
    }
}

/// Renderer-agnostic interface.
///
/// A renderer consumes one frame snapshot and produces output. It never
/// mutates application state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, frame: &FrameUniforms) -> Self::Output;
}

/// Text renderer for headless runs and tests.
///
/// Issues the same ordered shell sequence the GPU backend does and reports it
/// as text.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    list_shells: bool,
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print one line per shell instead of a summary.
    pub fn with_shell_lines(mut self, enabled: bool) -> Self {
        self.list_shells = enabled;
        self
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &FrameUniforms) -> String {
        let mut draws: Vec<ShellDraw> = Vec::with_capacity(frame.shells.shell_count as usize);
        submit_shells(frame.shells.shell_count, &mut draws);
        self.frames += 1;

        let eye = frame.camera.position();
        let target = frame.camera.target();
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} (t={:.3}s, {}) ===\n",
            self.frames,
            frame.time,
            if frame.wireframe { "wireframe" } else { "fill" }
        ));
        out.push_str(&format!(
            "Camera: eye=({:.3}, {:.3}, {:.3}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}\n",
            eye.x,
            eye.y,
            eye.z,
            target.x,
            target.y,
            target.z,
            frame.camera.fov(),
            frame.camera.aspect_ratio()
        ));
        out.push_str(&format!("Shells: {}\n", draws.len()));

        if self.list_shells {
            for d in &draws {
                out.push_str(&format!("  shell {:>3} height={:.4}\n", d.index, d.height));
            }
        } else if let (Some(first), Some(last)) = (draws.first(), draws.last()) {
            out.push_str(&format!(
                "  first: shell {} height={:.4}  last: shell {} height={:.4}\n",
                first.index, first.height, last.index, last.height
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn frame(shell_count: u32) -> FrameUniforms {
        let params = ShellParams {
            shell_count,
            ..ShellParams::default()
        };
        FrameUniforms::capture(&Camera::default(), &params, 1.5, false)
    }

    #[test]
    fn capture_matches_camera() {
        let cam = Camera::default();
        let f = FrameUniforms::capture(&cam, &ShellParams::default(), 0.0, true);
        assert_eq!(f.view, cam.compute_view_matrix());
        assert_eq!(f.projection, cam.compute_projection_matrix());
        assert_eq!(f.camera.position(), Vec3::new(0.0, 0.0, 3.0));
        assert!(f.wireframe);
    }

    #[test]
    fn debug_renderer_summary() {
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&frame(16));

        assert!(output.contains("Frame 1"));
        assert!(output.contains("Shells: 16"));
        assert!(output.contains("first: shell 15 height=1.0000"));
        assert!(output.contains("last: shell 0 height=0.0000"));
        assert_eq!(output.lines().count(), 4);
        assert!(output.ends_with('\n'));
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn debug_renderer_lists_shells_outermost_first() {
        let mut renderer = DebugTextRenderer::new().with_shell_lines(true);
        let output = renderer.render(&frame(8));

        let top = output.find("shell   7").unwrap();
        let base = output.find("shell   0").unwrap();
        assert!(top < base);
        assert_eq!(output.matches("height=").count(), 8);
    }
}
