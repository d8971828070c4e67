//! Scope - application builder and runner, plus the headless dump

use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rtrb::RingBuffer;
use serde::Serialize;
use tracing::info;

use saavy_ecg::{
    scroll::{EngineMessage, ScrollEngine, Viewport},
    waveform::{generate, BeatSummary, GeneratorState, Point, Raster, WaveformConfig},
    PIXELS_PER_SECOND,
};

use super::ui::UiApp;

/// Pending commands between key handling and the next frame
const MESSAGE_QUEUE_LEN: usize = 16;

/// Read and validate a TOML configuration file.
pub fn load_config(path: &Path) -> EyreResult<WaveformConfig> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let config: WaveformConfig = toml::from_str(&content)
        .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
    config
        .validate()
        .wrap_err_with(|| format!("invalid configuration in {}", path.display()))?;
    info!(path = %path.display(), custom_beats = config.custom.beats.len(), "configuration loaded");
    Ok(config)
}

/// Main application builder
pub struct Scope {
    config: WaveformConfig,
    viewport: Viewport,
    speed: f64,
    fps: u32,
}

impl Scope {
    pub fn new(config: WaveformConfig) -> Self {
        Self {
            config,
            viewport: Viewport::default(),
            speed: PIXELS_PER_SECOND,
            fps: 60,
        }
    }

    /// Set the visible area in distance units
    pub fn viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Set the scroll speed in distance units per second
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    /// Run the sweep display until the user quits
    pub fn run(self) -> EyreResult<()> {
        let engine = ScrollEngine::with_speed(self.config.clone(), self.viewport, self.speed)
            .wrap_err("failed to start the scroll engine")?;
        let (tx, rx) = RingBuffer::<EngineMessage>::new(MESSAGE_QUEUE_LEN);
        let frame_interval = Duration::from_secs_f64(1.0 / self.fps as f64);

        info!(
            width = self.viewport.width,
            height = self.viewport.height,
            speed = self.speed,
            fps = self.fps,
            "starting scope"
        );

        let mut terminal = ratatui::init();
        let result = UiApp::new(engine, self.config, tx, rx, frame_interval).run(&mut terminal);
        ratatui::restore();
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Csv,
    Json,
}

#[derive(Serialize)]
struct DumpOutput<'a> {
    beats: &'a [BeatSummary],
    points: &'a [Point],
}

/// Synthesize `duration` time units and print them to stdout.
pub fn dump(
    config: &WaveformConfig,
    duration: f64,
    speed: f64,
    height: f64,
    format: DumpFormat,
) -> EyreResult<()> {
    let raster = Raster::new(speed, height / 2.0);
    let synthesis = generate(config, GeneratorState::new(), duration, &raster)
        .wrap_err("synthesis failed")?;
    info!(
        beats = synthesis.beats.len(),
        points = synthesis.points.len(),
        "synthesized"
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match format {
        DumpFormat::Csv => {
            writeln!(out, "x,y")?;
            for point in &synthesis.points {
                writeln!(out, "{},{}", point.x, point.y)?;
            }
        }
        DumpFormat::Json => {
            let output = DumpOutput {
                beats: &synthesis.beats,
                points: &synthesis.points,
            };
            serde_json::to_writer_pretty(&mut out, &output).wrap_err("failed to encode JSON")?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
