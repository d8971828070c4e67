/*
Sweep Display
=============

The engine emulates a write head crossing a fixed-width screen. It owns two
buffers of the same length:

  points      The freshly synthesized trace for the current sweep.

  drawn       What is on screen. Entries start unset and are copied over
              from `points` as the head passes them.


Two Modes
---------

  first sweep    The screen starts empty. Each frame the drawn buffer is the
                 prefix of `points` up to the cursor, so the trace is revealed
                 left to right.

  continuous     Once the head has crossed the screen it wraps to 0 and a new
                 trace is synthesized from the carried generator state. The old
                 trace stays on screen; only a band around the head is copied
                 over each frame, so the new trace wipes the old one as the
                 head moves.

    ┌───────────────────────────────────────────────┐
    │ new new new new ░░│░░ old old old old old old  │
    └───────────────────────────────────────────────┘
                        ↑
                 band around the head (max(12, 10% of width))

Per-frame work is bounded by the band width, not the trace length. Index
lookups use binary search over `points`, which is sorted by x.


Reconfiguration
---------------

Applying a configuration regenerates `points` at once but clears `drawn`
instead of swapping the whole screen. Pointer and mode are kept, so the head
never jumps; the new trace fills in behind it.
*/

use std::ops::Range;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::waveform::{generate, ConfigError, GeneratorState, Point, Raster, WaveformConfig};

use super::message::{Continuity, EngineMessage, MessageReceiver};
use super::surface::TraceSurface;
use super::viewport::Viewport;

pub struct ScrollEngine {
    config: WaveformConfig,
    // State after the current `points` were synthesized
    state: GeneratorState,
    viewport: Viewport,
    pixels_per_second: f64,

    // Write head
    pointer: f64,
    first_sweep: bool,
    cursor: Option<usize>,

    points: Vec<Point>,
    drawn: Vec<Option<Point>>,
    // First-sweep bookkeeping: drawn[..revealed] is populated
    revealed: usize,
    band: Range<usize>,

    sweeps: u64,
    scratch: Vec<Point>,
}

impl ScrollEngine {
    /// Create an engine at the reference scroll speed.
    pub fn new(config: WaveformConfig, viewport: Viewport) -> Result<Self, EngineError> {
        Self::with_speed(config, viewport, crate::PIXELS_PER_SECOND)
    }

    pub fn with_speed(
        config: WaveformConfig,
        viewport: Viewport,
        pixels_per_second: f64,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if !viewport.is_valid() {
            return Err(EngineError::Viewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if !pixels_per_second.is_finite() || pixels_per_second <= 0.0 {
            return Err(EngineError::ScrollSpeed { pixels_per_second });
        }

        let mut engine = Self {
            config,
            state: GeneratorState::new(),
            viewport,
            pixels_per_second,
            pointer: 0.0,
            first_sweep: true,
            cursor: None,
            points: Vec::new(),
            drawn: Vec::new(),
            revealed: 0,
            band: 0..0,
            sweeps: 0,
            scratch: Vec::new(),
        };
        engine.resynthesize();
        engine.clear_drawn();
        engine.cursor = engine.locate_cursor();
        Ok(engine)
    }

    /// Advance the write head by `elapsed` real time and update the drawn
    /// buffer.
    pub fn tick(&mut self, elapsed: Duration) {
        self.pointer += self.pixels_per_second * elapsed.as_secs_f64();
        let width = self.viewport.width;

        if self.first_sweep {
            self.cursor = self.locate_cursor();
            self.reveal_to_cursor();
            if self.pointer > width {
                self.first_sweep = false;
                info!(sweeps = self.sweeps, "first sweep complete, switching to continuous mode");
            }
        } else {
            if self.pointer > width {
                self.pointer = 0.0;
                self.sweeps += 1;
                self.resynthesize();
                self.drawn.resize(self.points.len(), None);
                debug!(
                    sweeps = self.sweeps,
                    beats = self.state.beat_counter,
                    points = self.points.len(),
                    "pointer wrapped"
                );
            }
            self.cursor = self.locate_cursor();
            self.redraw_band();
        }
    }

    /// Drain pending commands. Rejected configurations are logged and
    /// returned; the previous configuration stays live.
    pub fn drain_messages<R: MessageReceiver>(&mut self, rx: &mut R) -> Vec<EngineError> {
        let mut rejected = Vec::new();
        while let Some(message) = rx.pop() {
            match message {
                EngineMessage::Apply { config, continuity } => {
                    if let Err(err) = self.apply_configuration(config, continuity) {
                        warn!(%err, "configuration rejected");
                        rejected.push(err);
                    }
                }
                EngineMessage::Reset => self.reset(),
            }
        }
        rejected
    }

    /// Replace the configuration.
    ///
    /// The trace is regenerated immediately; pointer and sweep mode are kept
    /// and the drawn buffer is cleared so it refills from the new trace.
    pub fn apply_configuration(
        &mut self,
        config: WaveformConfig,
        continuity: Continuity,
    ) -> Result<(), EngineError> {
        config.validate()?;
        self.config = config;
        if continuity == Continuity::Restart {
            self.state.reset();
        }
        self.resynthesize();
        self.clear_drawn();
        self.cursor = self.locate_cursor();
        info!(
            heart_rate = self.config.heart_rate,
            ?continuity,
            points = self.points.len(),
            "configuration applied"
        );
        Ok(())
    }

    /// Change the visible area. Behaves like a reconfiguration: the trace is
    /// regenerated for the new width and baseline, the head stays put.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), EngineError> {
        if !viewport.is_valid() {
            return Err(EngineError::Viewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        self.resynthesize();
        self.clear_drawn();
        self.cursor = self.locate_cursor();
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        Ok(())
    }

    /// Start over: empty screen, head at 0, counters zeroed.
    pub fn reset(&mut self) {
        self.state.reset();
        self.pointer = 0.0;
        self.first_sweep = true;
        self.sweeps = 0;
        self.resynthesize();
        self.clear_drawn();
        self.cursor = self.locate_cursor();
        info!("engine reset");
    }

    /// Emit the drawn trace and the write head.
    pub fn render<S: TraceSurface>(&mut self, surface: &mut S) {
        surface.begin(&self.viewport);

        self.scratch.clear();
        for entry in &self.drawn {
            match entry {
                Some(point) => self.scratch.push(*point),
                None if !self.scratch.is_empty() => {
                    surface.polyline(&self.scratch);
                    self.scratch.clear();
                }
                None => {}
            }
        }
        if !self.scratch.is_empty() {
            surface.polyline(&self.scratch);
        }

        if let Some(marker) = self.marker() {
            surface.marker(marker);
        }
    }

    fn raster(&self) -> Raster {
        Raster::new(self.pixels_per_second, self.viewport.baseline())
    }

    /// Synthesize a trace covering the viewport from the carried state.
    /// Failure degrades to a flat baseline.
    fn resynthesize(&mut self) {
        let raster = self.raster();
        let duration = raster.duration_for(self.viewport.width);
        match generate(&self.config, self.state, duration, &raster) {
            Ok(synthesis) => {
                self.state = synthesis.state;
                self.points = synthesis.points;
            }
            Err(err) => {
                warn!(%err, "synthesis failed, drawing a flat trace");
                let baseline = raster.baseline;
                let samples = self.viewport.width.ceil() as usize + 1;
                self.points = (0..samples)
                    .map(|i| Point::new(i as f64, baseline))
                    .collect();
            }
        }
    }

    fn clear_drawn(&mut self) {
        self.drawn.clear();
        self.drawn.resize(self.points.len(), None);
        self.revealed = 0;
        self.band = 0..0;
    }

    /// First point at or past the pointer, clamped to the last point.
    fn locate_cursor(&self) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }
        let index = self.points.partition_point(|p| p.x < self.pointer);
        Some(index.min(self.points.len() - 1))
    }

    fn reveal_to_cursor(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let end = cursor + 1;
        for i in self.revealed..end {
            self.drawn[i] = Some(self.points[i]);
        }
        self.revealed = self.revealed.max(end);
    }

    fn redraw_band(&mut self) {
        let half = self.viewport.band_width() / 2.0;
        let (low, high) = (self.pointer - half, self.pointer + half);
        let start = self.points.partition_point(|p| p.x < low);
        let end = self.points.partition_point(|p| p.x <= high);

        for (slot, point) in self.drawn[start..end].iter_mut().zip(&self.points[start..end]) {
            *slot = Some(*point);
        }
        self.band = start..end;
    }

    /// Point under the write head.
    pub fn marker(&self) -> Option<Point> {
        self.cursor.map(|i| self.points[i])
    }

    pub fn pointer(&self) -> f64 {
        self.pointer
    }

    pub fn is_first_sweep(&self) -> bool {
        self.first_sweep
    }

    pub fn cursor_index(&self) -> Option<usize> {
        self.cursor
    }

    /// Indices rewritten by the last continuous-mode frame.
    pub fn band(&self) -> Range<usize> {
        self.band.clone()
    }

    /// Completed wraps since creation or the last reset.
    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn drawn(&self) -> &[Option<Point>] {
        &self.drawn
    }

    /// Drawn points in order, unset entries skipped.
    pub fn path(&self) -> impl Iterator<Item = Point> + '_ {
        self.drawn.iter().flatten().copied()
    }

    pub fn generator_state(&self) -> GeneratorState {
        self.state
    }

    pub fn config(&self) -> &WaveformConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }
}

/// Reasons the engine refuses a setting.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Config(ConfigError),
    Viewport { width: f64, height: f64 },
    ScrollSpeed { pixels_per_second: f64 },
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Config(err)
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Config(err) => write!(f, "Invalid configuration: {}", err),
            EngineError::Viewport { width, height } => {
                write!(f, "Viewport must have positive size, got {}x{}", width, height)
            }
            EngineError::ScrollSpeed { pixels_per_second } => write!(
                f,
                "Scroll speed must be positive, got {} pixels per second",
                pixels_per_second
            ),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(err) => Some(err),
            _ => None,
        }
    }
}
