use anyhow::bail;
use clap::{Parser, Subcommand};
use shellplanet_common::{AppConfig, MIN_SHELL_COUNT};
use shellplanet_input::{EventQueue, InputEvent};
use shellplanet_render::{AppState, DebugTextRenderer, FrameHost, FrameLoop, shell_draws};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shellplanet-cli", about = "Headless tools for the shell planet demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// List the shell draw order and heights for one frame
    Shells {
        /// Number of shells
        #[arg(short, long, default_value = "128")]
        count: u32,
    },
    /// Run the frame loop headless with scripted input
    Orbit {
        /// Number of frames to render before closing
        #[arg(short, long, default_value = "3")]
        frames: usize,
        /// Scroll event "dx,dy" delivered before the first frame (repeatable)
        #[arg(long, value_parser = parse_scroll, allow_hyphen_values = true)]
        scroll: Vec<(f32, f32)>,
        /// Resize "WIDTHxHEIGHT" delivered before the first frame
        #[arg(long, value_parser = parse_size)]
        resize: Option<(u32, u32)>,
        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Print every shell instead of a summary
        #[arg(long)]
        list_shells: bool,
    },
    /// Print, write or check a configuration file
    Config {
        /// Write the default configuration to this path
        #[arg(long)]
        write: Option<PathBuf>,
        /// Validate this configuration file
        #[arg(long)]
        check: Option<PathBuf>,
    },
}

fn parse_scroll(s: &str) -> Result<(f32, f32), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected dx,dy, got {s:?}"))?;
    let dx = dx.trim().parse().map_err(|e| format!("bad dx: {e}"))?;
    let dy = dy.trim().parse().map_err(|e| format!("bad dy: {e}"))?;
    Ok((dx, dy))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok((w, h))
}

/// Host that feeds scripted input on the first frame and closes after `frames`.
struct ScriptedHost {
    first_batch: Vec<InputEvent>,
    frames: usize,
    polled: usize,
    dt: f32,
}

impl FrameHost<String> for ScriptedHost {
    fn poll(&mut self, events: &mut EventQueue) {
        if self.polled == 0 {
            events.extend(self.first_batch.drain(..));
        }
        if self.polled >= self.frames {
            events.push(InputEvent::CloseRequested);
        }
        self.polled += 1;
    }

    fn elapsed_secs(&mut self) -> f32 {
        self.polled.saturating_sub(1) as f32 * self.dt
    }

    fn present(&mut self, output: String) {
        print!("{output}");
    }

    fn teardown(&mut self) {
        tracing::debug!(frames = self.polled, "scripted host closed");
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    Ok(match path {
        Some(p) => AppConfig::load(p)?,
        None => AppConfig::default(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("shellplanet-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", shellplanet_render::crate_info());
            let config = load_config(cli.config.as_ref())?;
            println!(
                "camera: fov={} near={} far={}",
                config.camera.fov_degrees, config.camera.near, config.camera.far
            );
            println!(
                "orbit: distance={} zoom={} rotate={} floor={} bias={}",
                config.orbit.distance,
                config.orbit.zoom_sensitivity,
                config.orbit.rotate_sensitivity,
                config.orbit.min_distance,
                config.orbit.vertical_bias
            );
            println!("shells: {}", config.shells.shell_count);
        }
        Commands::Shells { count } => {
            if count < MIN_SHELL_COUNT {
                bail!("shell count must be at least {MIN_SHELL_COUNT}, got {count}");
            }
            for draw in shell_draws(count) {
                println!("shell {:>3} height={:.6}", draw.index, draw.height);
            }
        }
        Commands::Orbit {
            frames,
            scroll,
            resize,
            fps,
            list_shells,
        } => {
            if fps <= 0.0 {
                bail!("fps must be positive, got {fps}");
            }
            let config = load_config(cli.config.as_ref())?;

            let mut first_batch: Vec<InputEvent> = scroll
                .into_iter()
                .map(|(dx, dy)| InputEvent::Scroll { dx, dy })
                .collect();
            if let Some((width, height)) = resize {
                first_batch.push(InputEvent::Resized { width, height });
            }

            let mut host = ScriptedHost {
                first_batch,
                frames,
                polled: 0,
                dt: 1.0 / fps,
            };
            let mut renderer = DebugTextRenderer::new().with_shell_lines(list_shells);
            let mut frame_loop = FrameLoop::new(AppState::new(&config));
            let rendered = frame_loop.run(&mut host, &mut renderer);
            tracing::info!(rendered, "orbit run finished");
        }
        Commands::Config { write, check } => {
            if let Some(path) = &check {
                AppConfig::load(path)?;
                println!("{}: OK", path.display());
            }
            if let Some(path) = &write {
                AppConfig::default().save(path)?;
                println!("wrote default config to {}", path.display());
            }
            if check.is_none() && write.is_none() {
                let config = load_config(cli.config.as_ref())?;
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scroll_accepts_signed_pairs() {
        assert_eq!(parse_scroll("0,1"), Ok((0.0, 1.0)));
        assert_eq!(parse_scroll("-2.5, 3"), Ok((-2.5, 3.0)));
        assert!(parse_scroll("1").is_err());
        assert!(parse_scroll("a,b").is_err());
    }

    #[test]
    fn parse_size_accepts_dimensions() {
        assert_eq!(parse_size("800x600"), Ok((800, 600)));
        assert!(parse_size("800").is_err());
    }

    #[test]
    fn scripted_host_closes_after_frames() {
        let mut host = ScriptedHost {
            first_batch: vec![InputEvent::Scroll { dx: 0.0, dy: 2.0 }],
            frames: 4,
            polled: 0,
            dt: 0.5,
        };
        let mut renderer = DebugTextRenderer::new();
        let mut frame_loop = FrameLoop::new(AppState::new(&AppConfig::default()));

        assert_eq!(frame_loop.run(&mut host, &mut renderer), 4);
        assert!((frame_loop.app().orbit.distance() - 4.8).abs() < 1e-5);
        assert_eq!(frame_loop.app().time(), 1.5);
    }

    #[test]
    fn cli_parses_orbit_flags() {
        let cli = Cli::try_parse_from([
            "shellplanet-cli",
            "orbit",
            "--frames",
            "2",
            "--scroll",
            "1,-1",
            "--scroll",
            "0,3",
            "--resize",
            "800x600",
        ])
        .unwrap();
        match cli.command {
            Commands::Orbit {
                frames,
                scroll,
                resize,
                ..
            } => {
                assert_eq!(frames, 2);
                assert_eq!(scroll, vec![(1.0, -1.0), (0.0, 3.0)]);
                assert_eq!(resize, Some((800, 600)));
            }
            _ => panic!("expected orbit"),
        }
    }
}
