pub mod dsp;
pub mod scroll; // Sweep display engine
pub mod waveform; // Beat synthesis

/// Reference scroll speed, distance units per time unit.
pub const PIXELS_PER_SECOND: f64 = 150.0;
