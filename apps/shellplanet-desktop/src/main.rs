mod ui;

use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use shellplanet_common::AppConfig;
use shellplanet_input::{InputEvent, Key};
use shellplanet_render::{AppState, FrameLoop, FrameUniforms};
use shellplanet_render_wgpu::{GpuContext, WgpuRenderer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixel scroll deltas (touchpads) are divided by this to get lines.
const PIXELS_PER_LINE: f32 = 20.0;

#[derive(Parser)]
#[command(name = "shellplanet-desktop", about = "Shell-rendered planet viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn translate_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyQ => Key::Q,
        KeyCode::Escape => Key::Escape,
        KeyCode::F1 => Key::F1,
        _ => Key::Other,
    }
}

/// Reduce a winit window event to the demo's input events.
fn translate_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested => Some(InputEvent::CloseRequested),
        WindowEvent::Resized(size) => Some(InputEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match *delta {
                MouseScrollDelta::LineDelta(x, y) => (x, y),
                MouseScrollDelta::PixelDelta(p) => {
                    (p.x as f32 / PIXELS_PER_LINE, p.y as f32 / PIXELS_PER_LINE)
                }
            };
            Some(InputEvent::Scroll { dx, dy })
        }
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } => Some(InputEvent::KeyPressed(translate_key(*code))),
        _ => None,
    }
}

/// Queue `input` for the next frame. A close request moves the loop to
/// `Closing` immediately instead. Returns `true` when the app should exit.
fn queue_input(frame_loop: &mut FrameLoop, input: InputEvent) -> bool {
    if input.requests_close() {
        frame_loop.request_close();
        return true;
    }
    frame_loop.push(input);
    false
}

/// GPU-side resources, created on resume and released once at exit.
struct Gpu {
    renderer: WgpuRenderer,
    egui_renderer: egui_wgpu::Renderer,
    egui_winit: egui_winit::State,
    context: GpuContext,
}

struct ShellApp {
    config: AppConfig,
    frame_loop: FrameLoop,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    start: Instant,
    presented: u64,
    startup_error: Option<anyhow::Error>,
}

impl ShellApp {
    fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(&config);
        let loaded = state.shells;
        state.shells.clamp_to_ui_ranges();
        if state.shells != loaded {
            tracing::info!(
                shell_count = state.shells.shell_count,
                "clamped loaded parameters to panel ranges"
            );
        }
        Self {
            config,
            frame_loop: FrameLoop::new(state),
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
            start: Instant::now(),
            presented: 0,
            startup_error: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to open window")?,
        );

        let size = window.inner_size();
        let context = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to initialize GPU context")?;
        let surface_format = context.surface_format();
        let renderer = WgpuRenderer::new(&context.device, surface_format, size.width, size.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&context.device, surface_format, None, 1, false);

        self.frame_loop.app_mut().resize(size.width, size.height);
        self.window = Some(window);
        self.gpu = Some(Gpu {
            renderer,
            egui_renderer,
            egui_winit,
            context,
        });
        Ok(())
    }

    /// Draw the shells and the overlay for `uniforms`, then present.
    ///
    /// Returns `false` when the frame was dropped.
    fn render_frame(&mut self, uniforms: &FrameUniforms) -> bool {
        let (Some(gpu), Some(window)) = (self.gpu.as_mut(), self.window.as_ref()) else {
            return false;
        };

        let output = match gpu.context.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.context.reconfigure();
                return false;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return false;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &gpu.context.device;
        let queue = &gpu.context.queue;
        gpu.renderer.render(device, queue, &view, uniforms);

        let raw_input = gpu.egui_winit.take_egui_input(window);
        let supports_wireframe = gpu.renderer.supports_wireframe();
        let app = self.frame_loop.app_mut();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw_ui(ctx, app, supports_wireframe);
        });
        gpu.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.context.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        gpu.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        true
    }

    /// Release GPU and window resources. Runs at most once.
    fn teardown(&mut self) {
        if !self.frame_loop.teardown() {
            return;
        }
        // Surface before window.
        drop(self.gpu.take());
        drop(self.window.take());
        tracing::info!(presented = self.presented, "released GPU and window resources");
    }
}

impl ApplicationHandler for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(gpu), Some(window)) = (self.gpu.as_mut(), self.window.as_ref()) {
            let response = gpu.egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        if let WindowEvent::Resized(size) = event {
            // The swapchain must match the window before the next present; the
            // camera picks up the new aspect when the queued event is drained.
            if let Some(gpu) = self.gpu.as_mut() {
                gpu.context.resize(size.width, size.height);
                let (width, height) = gpu.context.size();
                gpu.renderer.resize(&gpu.context.device, width, height);
            }
        }

        if let Some(input) = translate_event(&event) {
            if queue_input(&mut self.frame_loop, input) {
                event_loop.exit();
                return;
            }
        }

        if let WindowEvent::RedrawRequested = event {
            let time = self.start.elapsed().as_secs_f32();
            let Some(uniforms) = self.frame_loop.frame(time) else {
                event_loop.exit();
                return;
            };
            if self.render_frame(&uniforms) {
                self.presented += 1;
            }
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("shellplanet-desktop starting");

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ShellApp::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.startup_error.take() {
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellplanet_common::UI_MIN_SHELL_COUNT;
    use shellplanet_render::LoopState;

    #[test]
    fn keys_map_to_demo_keys() {
        assert_eq!(translate_key(KeyCode::KeyW), Key::W);
        assert_eq!(translate_key(KeyCode::KeyF), Key::F);
        assert_eq!(translate_key(KeyCode::Escape), Key::Escape);
        assert_eq!(translate_key(KeyCode::KeyQ), Key::Q);
        assert_eq!(translate_key(KeyCode::KeyZ), Key::Other);
    }

    #[test]
    fn close_and_resize_translate() {
        assert_eq!(
            translate_event(&WindowEvent::CloseRequested),
            Some(InputEvent::CloseRequested)
        );
        assert_eq!(
            translate_event(&WindowEvent::Resized(PhysicalSize::new(800, 600))),
            Some(InputEvent::Resized {
                width: 800,
                height: 600
            })
        );
        assert_eq!(translate_event(&WindowEvent::Focused(true)), None);
    }

    #[test]
    fn close_request_closes_without_waiting_for_redraw() {
        let mut fl = FrameLoop::new(AppState::new(&AppConfig::default()));
        assert!(queue_input(&mut fl, InputEvent::CloseRequested));
        assert_eq!(fl.state(), LoopState::Closing);

        let mut fl = FrameLoop::new(AppState::new(&AppConfig::default()));
        assert!(queue_input(&mut fl, InputEvent::KeyPressed(Key::Q)));
        assert_eq!(fl.state(), LoopState::Closing);
    }

    #[test]
    fn other_input_is_queued_for_next_frame() {
        let mut fl = FrameLoop::new(AppState::new(&AppConfig::default()));
        assert!(!queue_input(&mut fl, InputEvent::Scroll { dx: 0.0, dy: 1.0 }));
        assert_eq!(fl.state(), LoopState::Running);
        assert_eq!(fl.app().orbit.distance(), 5.0);
        fl.frame(0.0).unwrap();
        assert!((fl.app().orbit.distance() - 4.9).abs() < 1e-6);
    }

    #[test]
    fn loaded_shell_count_is_raised_to_panel_minimum() {
        let mut config = AppConfig::default();
        config.shells.shell_count = 4;
        config.validate().unwrap();

        let app = ShellApp::new(config);
        assert_eq!(app.frame_loop.app().shells.shell_count, UI_MIN_SHELL_COUNT);
    }
}
