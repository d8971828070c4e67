//! Cardiac-style waveform synthesis.
//!
//! The synthesizer is layered bottom-up:
//! - [`config`]: the immutable parameter snapshot and its validation
//! - [`state`]: pattern counters threaded between calls
//! - [`beat`]: per-beat shape selection, rate scaling and pulse layout
//! - [`synth`]: sampling planned beats into display points

pub mod beat;
pub mod config;
pub mod state;
pub mod synth;

pub use beat::{BeatPlan, BeatSource, BeatSummary};
pub use config::{
    BeatShape, ConfigError, CustomBeatOverride, CustomBeats, DynamicPattern, PulseShape,
    WaveformConfig,
};
pub use state::GeneratorState;
pub use synth::{generate, Point, Raster, SynthError, Synthesis};
