//! Live waveform visualization.
//!
//! Runs the frame loop: each tick reads one decibel value from the level
//! source, normalizes it, advances the renderer, and redraws the terminal.

use anyhow::anyhow;
use clap::Args;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::capture::{LevelMeter, LevelSource, SyntheticLevel};
use crate::config::SiriwaveConfig;
use crate::ui::{report_error, FrameStatus, VisualizerCommand, WaveTui};
use crate::waveform::{normalized_power_level, WaveColor, WaveformRenderer};

/// Command-line overrides for the visualizer. Unset values come from the
/// config file.
#[derive(Debug, Clone, Default, Args)]
pub struct VisualizeArgs {
    /// Animate from a synthetic level curve instead of the microphone
    #[arg(long)]
    pub demo: bool,

    /// Input device: "default", an index, or a name from `list-devices`
    #[arg(short, long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Number of stacked waves
    #[arg(short, long, value_name = "N")]
    pub waves: Option<usize>,

    /// Sine cycles across the width
    #[arg(short, long, value_name = "CYCLES")]
    pub frequency: Option<f32>,

    /// Horizontal distance between sampled points
    #[arg(long, value_name = "POINTS")]
    pub density: Option<f32>,

    /// Wave colour as #RRGGBB or #RRGGBBAA
    #[arg(short, long, value_name = "HEX")]
    pub color: Option<WaveColor>,

    /// Frames per second
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,
}

impl VisualizeArgs {
    /// Overwrites config values with any flags that were given.
    fn apply(&self, config: &mut SiriwaveConfig) {
        if let Some(device) = &self.device {
            config.audio.device = device.clone();
        }
        if let Some(waves) = self.waves {
            config.wave.number_of_waves = waves;
        }
        if let Some(frequency) = self.frequency {
            config.wave.frequency = frequency;
        }
        if let Some(density) = self.density {
            config.wave.density = density;
        }
        if let Some(color) = self.color {
            config.wave.wave_color = color;
        }
        if let Some(fps) = self.fps {
            config.display.fps = fps;
        }
    }
}

/// Runs the visualizer until the user quits or a termination signal arrives.
///
/// # Errors
/// - If the configuration is invalid
/// - If audio capture is unavailable (outside demo mode)
/// - If the terminal cannot be driven
pub fn handle_visualize(args: VisualizeArgs) -> anyhow::Result<()> {
    tracing::info!("=== siriwave started ===");

    let mut config = match SiriwaveConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err:#}");
            report_error(
                "Configuration error",
                &format!("{err:#}\n\nPlease check ~/.config/siriwave/siriwave.toml and try again."),
            );
            return Err(anyhow!("Configuration error: {err:#}"));
        }
    };
    args.apply(&mut config);
    if let Err(err) = config.validate() {
        tracing::error!("Invalid settings: {err}");
        report_error("Configuration error", &err.to_string());
        return Err(err);
    }

    tracing::info!(
        "Configuration: device={}, fps={}, waves={}, frequency={}, density={}, color={}",
        config.audio.device,
        config.display.fps,
        config.wave.number_of_waves,
        config.wave.frequency,
        config.wave.density,
        config.wave.wave_color
    );

    let mut renderer = WaveformRenderer::new(config.wave.clone())?;

    let mut source = if args.demo {
        tracing::info!("Demo mode: using synthetic levels");
        LevelSource::Synthetic(SyntheticLevel::new(config.display.fps))
    } else {
        let mut meter = LevelMeter::new(
            config.audio.device.clone(),
            Duration::from_millis(config.audio.meter_window_ms),
        );
        if let Err(e) = meter.start() {
            tracing::error!("Capture unavailable: {e}");
            report_error(
                "Capture unavailable",
                &format!("{e}\n\nCheck your input device, or run `siriwave --demo`."),
            );
            return Err(e.into());
        }
        tracing::info!(
            "Metering '{}' at {}Hz",
            meter.device_name().unwrap_or("unknown"),
            meter.sample_rate()
        );
        LevelSource::Microphone(meter)
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))
            .map_err(|e| anyhow!("Failed to register signal handler: {e}"))?;
    }

    let mut tui = WaveTui::new(config.display.background)?;
    let result = run_frame_loop(
        &mut tui,
        &mut renderer,
        &mut source,
        config.display.fps,
        &shutdown,
    );

    tui.cleanup()?;
    result?;

    tracing::info!("=== siriwave exited ===");
    Ok(())
}

fn run_frame_loop(
    tui: &mut WaveTui,
    renderer: &mut WaveformRenderer,
    source: &mut LevelSource,
    fps: u32,
    shutdown: &AtomicBool,
) -> anyhow::Result<()> {
    let mut clock = FrameClock::new(fps, Instant::now());
    let mut paused = false;
    let mut force_redraw = true;
    let mut frames = 0u64;

    tracing::debug!("Entering frame loop at {} fps", fps);

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("Termination signal received");
            return Ok(());
        }

        let decibels = source.decibels();
        let level = normalized_power_level(decibels);
        if !paused {
            renderer.update_level(level);
        }

        if renderer.take_redraw_request() || force_redraw {
            let bounds = tui.canvas_bounds()?;
            let layers = renderer.render(bounds);
            let status = FrameStatus {
                source: source.label(),
                decibels,
                level,
                paused,
            };
            tui.draw(&layers, status)?;
            force_redraw = false;
        }

        frames += 1;
        if frames % (u64::from(fps) * 10) == 0 {
            tracing::debug!(
                "Frame {}: phase={:.2}, amplitude={:.3}",
                frames,
                renderer.phase(),
                renderer.amplitude()
            );
        }

        clock.advance(Instant::now());
        loop {
            let remaining = clock.remaining(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match tui.handle_input(remaining)? {
                VisualizerCommand::Continue => {}
                VisualizerCommand::Quit => return Ok(()),
                VisualizerCommand::TogglePause => {
                    paused = source.toggle_pause();
                    tracing::info!("Visualization {}", if paused { "paused" } else { "resumed" });
                    force_redraw = true;
                }
                VisualizerCommand::Resize => force_redraw = true,
            }
        }
    }
}

/// Fixed-rate frame deadline that drops missed frames instead of bursting.
#[derive(Debug, Clone, Copy)]
struct FrameClock {
    interval: Duration,
    deadline: Instant,
}

impl FrameClock {
    fn new(fps: u32, now: Instant) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            deadline: now,
        }
    }

    /// Moves the deadline one interval on, resyncing to `now` if we fell behind.
    fn advance(&mut self, now: Instant) {
        self.deadline += self.interval;
        if self.deadline < now {
            self.deadline = now;
        }
    }

    fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }
}
