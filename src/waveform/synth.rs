//! Waveform synthesis: configuration + generator state in, points out.
//!
//! [`generate`] is a pure function. Everything it needs arrives as an
//! argument and everything it changes comes back in the [`Synthesis`], so two
//! calls with the same inputs produce the same points bit for bit.

use super::beat::{BeatPlan, BeatSummary};
use super::config::WaveformConfig;
use super::state::GeneratorState;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on beats per call.
pub const MAX_BEATS_PER_CALL: u64 = 1_000_000;

/// Upper bound on points per call, checked before anything is allocated.
pub const MAX_SAMPLES_PER_CALL: u64 = 10_000_000;

/// One sample of the trace in display coordinates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position (distance units, grows with time)
    pub x: f64,
    /// Vertical position (distance units, grows downward)
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Mapping from time and amplitude to display coordinates.
///
/// One sample is taken per distance unit of travel, so the sample step is
/// `1 / pixels_per_second` time units. Positive amplitude is drawn above the
/// baseline, which on a y-down surface means a smaller y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raster {
    pub pixels_per_second: f64,
    pub baseline: f64,
}

impl Raster {
    pub const DEFAULT_PIXELS_PER_SECOND: f64 = crate::PIXELS_PER_SECOND;

    pub fn new(pixels_per_second: f64, baseline: f64) -> Self {
        Self {
            pixels_per_second,
            baseline,
        }
    }

    /// Time between consecutive samples.
    #[inline]
    pub fn sample_step(&self) -> f64 {
        1.0 / self.pixels_per_second
    }

    /// Time units covered by `width` distance units.
    #[inline]
    pub fn duration_for(&self, width: f64) -> f64 {
        width / self.pixels_per_second
    }

    #[inline]
    pub fn to_point(&self, t: f64, amplitude: f64, amplitude_scale: f64) -> Point {
        Point::new(
            t * self.pixels_per_second,
            self.baseline - amplitude * amplitude_scale,
        )
    }

    /// Inverse of [`Raster::to_point`] for the vertical axis.
    #[inline]
    pub fn amplitude_of(&self, point: &Point, amplitude_scale: f64) -> f64 {
        (self.baseline - point.y) / amplitude_scale
    }
}

impl Default for Raster {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PIXELS_PER_SECOND, 0.0)
    }
}

/// Result of one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub points: Vec<Point>,
    /// Input state advanced by exactly `beats.len()` beats
    pub state: GeneratorState,
    pub beats: Vec<BeatSummary>,
}

impl Synthesis {
    /// Time covered by the emitted beats.
    pub fn span(&self) -> f64 {
        self.beats.last().map_or(0.0, BeatSummary::end)
    }
}

/// Synthesize beats covering `duration` time units.
///
/// Beats are emitted whole, so the trace usually overshoots `duration`;
/// callers use as much as they need. Samples sit on the fixed grid
/// `t = n * step`, each beat owning the samples in `[start, start + period)`.
/// A zero `duration` yields no beats and no points.
pub fn generate(
    config: &WaveformConfig,
    state: GeneratorState,
    duration: f64,
    raster: &Raster,
) -> Result<Synthesis, SynthError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(SynthError::InvalidDuration { value: duration });
    }
    if !raster.pixels_per_second.is_finite() || raster.pixels_per_second <= 0.0 {
        return Err(SynthError::InvalidRaster {
            pixels_per_second: raster.pixels_per_second,
        });
    }
    if !config.heart_rate.is_finite() || config.heart_rate <= 0.0 {
        return Err(SynthError::NonPositiveHeartRate {
            value: config.heart_rate,
        });
    }

    let period = config.beat_period();
    let beats = (duration / period).ceil();
    if beats > MAX_BEATS_PER_CALL as f64 {
        return Err(SynthError::TooManyBeats {
            requested: beats as u64,
        });
    }
    let beats = beats as u64;

    let step = raster.sample_step();
    let samples = ((beats as f64 * period) / step).ceil() + 1.0;
    if samples > MAX_SAMPLES_PER_CALL as f64 {
        return Err(SynthError::TooManySamples {
            requested: samples as u64,
        });
    }

    let mut synthesis = Synthesis {
        points: Vec::with_capacity(samples as usize),
        state,
        beats: Vec::with_capacity(beats as usize),
    };

    // Beat boundaries are k * period rather than a running sum, so a
    // duration of exactly n periods yields exactly n beats.
    let mut beat: u64 = 0;
    let mut sample: u64 = 0;
    while (beat as f64 * period) < duration {
        let plan = BeatPlan::next(config, &mut synthesis.state, beat as f64 * period)?;
        let end = (beat + 1) as f64 * period;

        loop {
            let t = sample as f64 * step;
            if t >= end {
                break;
            }
            let amplitude = plan.pulses.amplitude(t);
            synthesis
                .points
                .push(raster.to_point(t, amplitude, config.amplitude_scale));
            sample += 1;
        }

        synthesis.state.beat_counter += 1;
        synthesis.beats.push(plan.summary);
        beat += 1;
    }

    Ok(synthesis)
}

/// Reasons synthesis refuses to run.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthError {
    /// Heart rate is zero, negative or non-finite; the beat period would divide by zero
    NonPositiveHeartRate { value: f64 },
    /// Requested duration is negative or non-finite
    InvalidDuration { value: f64 },
    /// Sample spacing cannot be derived from the raster
    InvalidRaster { pixels_per_second: f64 },
    /// A beat with these counts has no length to scale
    EmptyBeat { p_count: u32, qrs_count: u32 },
    /// Duration and heart rate call for an unreasonable number of beats
    TooManyBeats { requested: u64 },
    /// Duration and scroll speed call for an unreasonable number of points
    TooManySamples { requested: u64 },
}

impl std::fmt::Display for SynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthError::NonPositiveHeartRate { value } => {
                write!(f, "Heart rate must be positive, got {}", value)
            }
            SynthError::InvalidDuration { value } => {
                write!(f, "Duration must be finite and non-negative, got {}", value)
            }
            SynthError::InvalidRaster { pixels_per_second } => write!(
                f,
                "Scroll speed must be positive, got {} pixels per second",
                pixels_per_second
            ),
            SynthError::EmptyBeat { p_count, qrs_count } => write!(
                f,
                "Beat with {} P pulses and {} QRS complexes has zero duration",
                p_count, qrs_count
            ),
            SynthError::TooManyBeats { requested } => write!(
                f,
                "Synthesis would need {} beats (limit {})",
                requested, MAX_BEATS_PER_CALL
            ),
            SynthError::TooManySamples { requested } => write!(
                f,
                "Synthesis would need {} points (limit {})",
                requested, MAX_SAMPLES_PER_CALL
            ),
        }
    }
}

impl std::error::Error for SynthError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::config::DynamicPattern;

    fn raster() -> Raster {
        Raster::new(150.0, 200.0)
    }

    #[test]
    fn zero_duration_is_empty() {
        let out = generate(&WaveformConfig::default(), GeneratorState::new(), 0.0, &raster())
            .unwrap();
        assert!(out.points.is_empty());
        assert!(out.beats.is_empty());
        assert_eq!(out.state, GeneratorState::new());
    }

    #[test]
    fn covers_requested_duration() {
        let config = WaveformConfig::default();
        let out = generate(&config, GeneratorState::new(), 3.0, &raster()).unwrap();

        assert!(out.span() >= 3.0);
        assert!(out.span() - 3.0 < config.beat_period());
        assert_eq!(out.state.beat_counter, out.beats.len() as u64);
    }

    #[test]
    fn points_are_evenly_spaced() {
        let out = generate(&WaveformConfig::default(), GeneratorState::new(), 2.0, &raster())
            .unwrap();
        for (i, point) in out.points.iter().enumerate() {
            assert!((point.x - i as f64).abs() < 1e-9, "sample {i} at {}", point.x);
        }
    }

    #[test]
    fn baseline_between_pulses() {
        let config = WaveformConfig::default();
        let raster = raster();
        let out = generate(&config, GeneratorState::new(), 1.0, &raster).unwrap();

        // The TP segment closes every beat, so the last sample of the first
        // beat sits on the baseline.
        let period_samples = (config.beat_period() * raster.pixels_per_second) as usize;
        assert_eq!(out.points[period_samples - 1].y, raster.baseline);
        assert_eq!(out.points[0].y, raster.baseline);
    }

    #[test]
    fn identical_inputs_identical_output() {
        let mut config = WaveformConfig::default();
        config.r_pattern = DynamicPattern::new(true, 2, 3);
        let state = GeneratorState {
            r_counter: 1,
            ..Default::default()
        };

        let a = generate(&config, state, 5.0, &raster()).unwrap();
        let b = generate(&config, state, 5.0, &raster()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn state_threads_pattern_phase() {
        let mut config = WaveformConfig::default();
        config.r_pattern = DynamicPattern::new(true, 3, 2);
        let period = config.beat_period();

        let first = generate(&config, GeneratorState::new(), period, &raster()).unwrap();
        assert_eq!(first.beats.len(), 1);
        assert_eq!(first.beats[0].qrs_count, 1);

        let second = generate(&config, first.state, period, &raster()).unwrap();
        assert_eq!(second.beats[0].qrs_count, 3);
        assert_eq!(second.state.beat_counter, 2);
    }

    #[test]
    fn rejects_bad_inputs() {
        let config = WaveformConfig::default();
        let state = GeneratorState::new();

        assert!(matches!(
            generate(&config, state, -1.0, &raster()),
            Err(SynthError::InvalidDuration { .. })
        ));
        assert!(matches!(
            generate(&config, state, 1.0, &Raster::new(0.0, 0.0)),
            Err(SynthError::InvalidRaster { .. })
        ));

        let stopped = WaveformConfig {
            heart_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            generate(&stopped, state, 1.0, &raster()),
            Err(SynthError::NonPositiveHeartRate { .. })
        ));
    }

    #[test]
    fn oversized_requests_fail_before_allocating() {
        let config = WaveformConfig::default();
        let state = GeneratorState::new();

        // 1e5 time units at 70 bpm is ~117k beats but 15M points.
        assert!(matches!(
            generate(&config, state, 1e5, &raster()),
            Err(SynthError::TooManySamples { .. })
        ));
        assert!(matches!(
            generate(&config, state, 1e6, &raster()),
            Err(SynthError::TooManyBeats { requested }) if requested > MAX_BEATS_PER_CALL
        ));
        assert!(generate(&config, state, f64::MAX, &raster()).is_err());
    }

    #[test]
    fn amplitude_scale_maps_heights() {
        let mut config = WaveformConfig::default();
        config.amplitude_scale = 50.0;
        let raster = raster();
        let out = generate(&config, GeneratorState::new(), 1.0, &raster).unwrap();

        let peak = out
            .points
            .iter()
            .map(|p| raster.amplitude_of(p, config.amplitude_scale))
            .fold(f64::MIN, f64::max);
        assert!(peak <= config.shape.r.height + 1e-9);
        assert!(peak > config.shape.r.height * 0.9);
    }
}
