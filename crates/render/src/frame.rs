//! Application state and the cooperative frame loop.

use crate::camera::Camera;
use crate::orbit::OrbitController;
use crate::renderer::{FrameUniforms, Renderer};
use shellplanet_common::{AppConfig, ShellParams};
use shellplanet_input::{EventQueue, InputEvent, Key};

/// Framebuffer size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// All mutable state of the demo, owned by the frame loop.
#[derive(Debug, Clone)]
pub struct AppState {
    pub camera: Camera,
    pub orbit: OrbitController,
    /// Live parameters. The UI edits these between frames.
    pub shells: ShellParams,
    pub viewport: Viewport,
    pub wireframe: bool,
    pub show_ui: bool,
    time: f32,
    frame_time: f32,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let viewport = Viewport {
            width: config.window.width.max(1),
            height: config.window.height.max(1),
        };
        let mut camera = Camera::from_config(&config.camera, viewport.aspect_ratio());
        let orbit = OrbitController::new(config.orbit);
        camera.set_target(orbit.target());

        Self {
            camera,
            orbit,
            shells: config.shells,
            viewport,
            wireframe: false,
            show_ui: true,
            time: 0.0,
            frame_time: 0.0,
        }
    }

    /// Apply one input event. Close requests are handled by [`FrameLoop`].
    pub fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyPressed(Key::W) => {
                self.wireframe = true;
                tracing::debug!("wireframe on");
            }
            InputEvent::KeyPressed(Key::F) => {
                self.wireframe = false;
                tracing::debug!("wireframe off");
            }
            InputEvent::KeyPressed(Key::F1) => {
                self.show_ui = !self.show_ui;
            }
            InputEvent::KeyPressed(_) | InputEvent::CloseRequested => {}
            InputEvent::Scroll { dx, dy } => {
                self.orbit.scroll(dx, dy);
                tracing::debug!(
                    distance = self.orbit.distance(),
                    angle = self.orbit.angle(),
                    "orbit"
                );
            }
            InputEvent::Resized { width, height } => self.resize(width, height),
        }
    }

    /// Update viewport and aspect ratio together.
    ///
    /// A zero-sized framebuffer (minimized window) is ignored so the aspect
    /// ratio stays positive.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring zero-sized resize");
            return;
        }
        self.viewport = Viewport { width, height };
        self.camera.set_aspect_ratio(self.viewport.aspect_ratio());
    }

    /// Derive the camera pose for time `time_secs` (seconds since startup).
    pub fn update(&mut self, time_secs: f32) {
        self.frame_time = (time_secs - self.time).max(0.0);
        self.time = time_secs;
        self.orbit.apply(&mut self.camera);
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Seconds between the two most recent updates.
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms::capture(&self.camera, &self.shells, self.time, self.wireframe)
    }
}

/// Frame loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closing,
}

/// The platform side of the loop when it is driven by [`FrameLoop::run`].
///
/// `O` is the output type of the renderer being presented.
pub trait FrameHost<O> {
    /// Move pending platform input into `events`. May block.
    fn poll(&mut self, events: &mut EventQueue);
    /// Wall-clock seconds since startup.
    fn elapsed_secs(&mut self) -> f32;
    /// Show a finished frame.
    fn present(&mut self, output: O);
    /// Release window and GPU resources.
    fn teardown(&mut self);
}

/// Single-threaded frame loop: drain input, update, render, present, repeat.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    app: AppState,
    events: EventQueue,
    frames: u64,
    torn_down: bool,
}

impl FrameLoop {
    pub fn new(app: AppState) -> Self {
        Self {
            state: LoopState::Running,
            app,
            events: EventQueue::new(),
            frames: 0,
            torn_down: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut AppState {
        &mut self.app
    }

    /// Frame snapshots produced so far.
    ///
    /// A host that drops a snapshot without presenting it (lost surface) still
    /// counts here; such hosts track presented frames themselves.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Queue an event for the next frame.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn request_close(&mut self) {
        if self.state == LoopState::Running {
            tracing::info!("close requested");
        }
        self.state = LoopState::Closing;
    }

    /// Start a frame: drain queued input, then update state for `time_secs`.
    ///
    /// Returns the snapshot to render, or `None` once the loop is closing.
    pub fn frame(&mut self, time_secs: f32) -> Option<FrameUniforms> {
        if self.state == LoopState::Closing {
            return None;
        }
        let mut close = false;
        for event in self.events.drain() {
            close |= event.requests_close();
            self.app.handle_event(&event);
        }
        if close {
            self.request_close();
            return None;
        }

        self.app.update(time_secs);
        self.frames += 1;
        Some(self.app.uniforms())
    }

    /// Latch teardown. Returns `true` on the first call only; the caller
    /// releases its resources when it gets `true`.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.state = LoopState::Closing;
        self.torn_down = true;
        tracing::info!(snapshots = self.frames, "tearing down");
        true
    }

    /// Drive the loop to completion on `host`. Returns the number of frames presented.
    pub fn run<R, H>(&mut self, host: &mut H, renderer: &mut R) -> u64
    where
        R: Renderer,
        H: FrameHost<R::Output>,
    {
        let start = self.frames;
        while self.is_running() {
            host.poll(&mut self.events);
            let time = host.elapsed_secs();
            let Some(uniforms) = self.frame(time) else {
                break;
            };
            let output = renderer.render(&uniforms);
            host.present(output);
        }
        if self.teardown() {
            host.teardown();
        }
        self.frames - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DebugTextRenderer;
    use glam::Vec3;

    /// Host that replays one batch of events per frame.
    struct ScriptedHost {
        batches: Vec<Vec<InputEvent>>,
        frame: usize,
        presented: Vec<String>,
        teardowns: u32,
    }

    impl ScriptedHost {
        fn new(batches: Vec<Vec<InputEvent>>) -> Self {
            Self {
                batches,
                frame: 0,
                presented: Vec::new(),
                teardowns: 0,
            }
        }
    }

    impl FrameHost<String> for ScriptedHost {
        fn poll(&mut self, events: &mut EventQueue) {
            match self.batches.get(self.frame) {
                Some(batch) => events.extend(batch.iter().copied()),
                None => events.push(InputEvent::CloseRequested),
            }
            self.frame += 1;
        }

        fn elapsed_secs(&mut self) -> f32 {
            self.frame as f32 / 60.0
        }

        fn present(&mut self, output: String) {
            self.presented.push(output);
        }

        fn teardown(&mut self) {
            self.teardowns += 1;
        }
    }

    fn app() -> AppState {
        AppState::new(&AppConfig::default())
    }

    #[test]
    fn initial_aspect_comes_from_window_size() {
        let state = app();
        assert_eq!(state.viewport, Viewport { width: 1024, height: 768 });
        assert!((state.camera.aspect_ratio() - 1024.0 / 768.0).abs() < 1e-6);
    }

    #[test]
    fn resize_updates_aspect_and_viewport_before_render() {
        let mut fl = FrameLoop::new(app());
        fl.push(InputEvent::Resized {
            width: 800,
            height: 600,
        });
        let uniforms = fl.frame(0.0).unwrap();

        assert_eq!(fl.app().viewport, Viewport { width: 800, height: 600 });
        assert_eq!(uniforms.camera.aspect_ratio(), 800.0 / 600.0);
        assert_eq!(
            uniforms.projection,
            uniforms.camera.compute_projection_matrix()
        );
    }

    #[test]
    fn zero_height_resize_is_ignored() {
        let mut state = app();
        state.resize(640, 0);
        assert_eq!(state.viewport, Viewport { width: 1024, height: 768 });
        assert!(state.camera.aspect_ratio() > 0.0);
    }

    #[test]
    fn update_places_camera_on_orbit() {
        let mut state = app();
        state.update(0.5);
        let expected = Vec3::new(1.0, 0.5, 0.0).normalize() * 5.0;
        assert!((state.camera.position() - expected).length() < 1e-5);
        assert_eq!(state.camera.target(), Vec3::ZERO);
        assert_eq!(state.time(), 0.5);
    }

    #[test]
    fn scroll_events_apply_in_order() {
        let mut fl = FrameLoop::new(app());
        fl.push(InputEvent::Scroll { dx: 0.0, dy: 100.0 });
        fl.push(InputEvent::Scroll { dx: 0.0, dy: -10.0 });
        fl.frame(0.0).unwrap();
        // Clamped to the floor first, then pushed back out by 1.0.
        assert!((fl.app().orbit.distance() - 1.1).abs() < 1e-5);
    }

    #[test]
    fn wireframe_keys_toggle() {
        let mut fl = FrameLoop::new(app());
        fl.push(InputEvent::KeyPressed(Key::W));
        assert!(fl.frame(0.0).unwrap().wireframe);
        fl.push(InputEvent::KeyPressed(Key::F));
        assert!(!fl.frame(0.1).unwrap().wireframe);
    }

    #[test]
    fn f1_toggles_panel() {
        let mut fl = FrameLoop::new(app());
        assert!(fl.app().show_ui);
        fl.push(InputEvent::KeyPressed(Key::F1));
        fl.frame(0.0).unwrap();
        assert!(!fl.app().show_ui);
        fl.push(InputEvent::KeyPressed(Key::F1));
        fl.frame(0.1).unwrap();
        assert!(fl.app().show_ui);
    }

    #[test]
    fn request_close_takes_effect_without_a_frame() {
        let mut fl = FrameLoop::new(app());
        fl.push(InputEvent::Scroll { dx: 0.0, dy: 1.0 });
        fl.request_close();
        assert_eq!(fl.state(), LoopState::Closing);
        assert!(fl.frame(0.0).is_none());
        assert_eq!(fl.frames(), 0);
    }

    #[test]
    fn frame_counter_counts_snapshots_only() {
        let mut fl = FrameLoop::new(app());
        fl.frame(0.0).unwrap();
        fl.frame(0.1).unwrap();
        fl.push(InputEvent::CloseRequested);
        assert!(fl.frame(0.2).is_none());
        assert_eq!(fl.frames(), 2);
    }

    #[test]
    fn escape_closes_loop() {
        let mut fl = FrameLoop::new(app());
        assert!(fl.frame(0.0).is_some());
        fl.push(InputEvent::KeyPressed(Key::Escape));
        assert!(fl.frame(0.1).is_none());
        assert_eq!(fl.state(), LoopState::Closing);
        assert!(fl.frame(0.2).is_none());
    }

    #[test]
    fn teardown_latches_once() {
        let mut fl = FrameLoop::new(app());
        assert!(fl.teardown());
        assert!(!fl.teardown());
        assert!(!fl.is_running());
    }

    #[test]
    fn snapshot_is_not_torn_by_later_edits() {
        let mut fl = FrameLoop::new(app());
        let uniforms = fl.frame(0.0).unwrap();
        fl.app_mut().shells.shell_count = 16;
        assert_eq!(uniforms.shells.shell_count, 128);
    }

    #[test]
    fn run_presents_until_close_and_tears_down_once() {
        let mut fl = FrameLoop::new(app());
        let mut host = ScriptedHost::new(vec![
            vec![],
            vec![InputEvent::Scroll { dx: 0.0, dy: 1.0 }],
            vec![InputEvent::KeyPressed(Key::Q)],
        ]);
        let mut renderer = DebugTextRenderer::new();

        let frames = fl.run(&mut host, &mut renderer);

        assert_eq!(frames, 2);
        assert_eq!(host.presented.len(), 2);
        assert_eq!(host.teardowns, 1);
        assert_eq!(fl.state(), LoopState::Closing);
        assert!((fl.app().orbit.distance() - 4.9).abs() < 1e-5);

        // A second run neither renders nor tears down again.
        assert_eq!(fl.run(&mut host, &mut renderer), 0);
        assert_eq!(host.teardowns, 1);
    }

    #[test]
    fn run_ends_on_window_close() {
        let mut fl = FrameLoop::new(app());
        let mut host = ScriptedHost::new(vec![vec![]; 5]);
        let mut renderer = DebugTextRenderer::new();

        assert_eq!(fl.run(&mut host, &mut renderer), 5);
        assert_eq!(renderer.frames_rendered(), 5);
        assert_eq!(host.teardowns, 1);
    }
}
