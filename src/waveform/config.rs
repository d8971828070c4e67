//! Waveform configuration: pulse shapes, segment lengths, dynamic patterns
//! and custom beat overrides.
//!
//! A [`WaveformConfig`] is an immutable snapshot. Consumers build a new one
//! and hand it over wholesale; nothing edits a live configuration field by
//! field.

use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Accepted heart rates in beats per minute.
pub const HEART_RATE_RANGE: RangeInclusive<f64> = 20.0..=250.0;
/// Smallest accepted amplitude scale (distance units per amplitude unit).
pub const MIN_AMPLITUDE_SCALE: f64 = 10.0;

/// Height and breadth of one pulse.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseShape {
    /// Signed peak amplitude (millivolt-equivalent)
    pub height: f64,
    /// Duration in time units before rate scaling; 0 disables the pulse
    pub breadth: f64,
}

impl PulseShape {
    pub const fn new(height: f64, breadth: f64) -> Self {
        Self { height, breadth }
    }
}

impl Default for PulseShape {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// The thirteen shape fields a custom beat may override: five pulses and
/// three baseline segments.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatShape {
    pub p: PulseShape,
    pub q: PulseShape,
    pub r: PulseShape,
    pub s: PulseShape,
    pub t: PulseShape,
    /// Gap between a P pulse and whatever follows it
    pub pq: f64,
    /// Gap between the last S pulse and the T pulse
    pub st: f64,
    /// Gap closing the beat after the T pulse
    pub tp: f64,
}

impl Default for BeatShape {
    fn default() -> Self {
        Self {
            p: PulseShape::new(0.15, 0.08),
            q: PulseShape::new(-0.1, 0.025),
            r: PulseShape::new(1.2, 0.05),
            s: PulseShape::new(-0.25, 0.025),
            t: PulseShape::new(0.2, 0.16),
            pq: 0.08,
            st: 0.12,
            tp: 0.3,
        }
    }
}

impl BeatShape {
    /// Combined breadth of one Q, R, S triplet.
    pub fn qrs_breadth(&self) -> f64 {
        self.q.breadth + self.r.breadth + self.s.breadth
    }

    /// Beat duration before rate scaling.
    ///
    /// Every P pulse brings its own PQ gap. A single Q, R, S triplet is
    /// counted whenever the beat has any complex at all; extra complexes of a
    /// burst run into the trailing segments. ST, T and TP close the beat.
    pub fn unscaled_duration(&self, p_count: u32, qrs_count: u32) -> f64 {
        let p_block = p_count as f64 * (self.p.breadth + self.pq);
        let qrs_block = if qrs_count > 0 { self.qrs_breadth() } else { 0.0 };
        p_block + qrs_block + self.st + self.t.breadth + self.tp
    }

    /// Time from the first P pulse to the end of TP when every complex is
    /// laid out, consecutive complexes separated by half a PQ gap. Exceeds
    /// [`BeatShape::unscaled_duration`] for bursts of more than one complex.
    pub fn layout_span(&self, p_count: u32, qrs_count: u32) -> f64 {
        let extra = qrs_count.saturating_sub(1) as f64 * (self.qrs_breadth() + self.pq / 2.0);
        self.unscaled_duration(p_count, qrs_count) + extra
    }

    /// Shape with every breadth and segment length multiplied by `factor`.
    /// Heights are untouched.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |pulse: PulseShape| PulseShape::new(pulse.height, pulse.breadth * factor);
        Self {
            p: scale(self.p),
            q: scale(self.q),
            r: scale(self.r),
            s: scale(self.s),
            t: scale(self.t),
            pq: self.pq * factor,
            st: self.st * factor,
            tp: self.tp * factor,
        }
    }

    fn heights(&self) -> [(&'static str, f64); 5] {
        [
            ("p.height", self.p.height),
            ("q.height", self.q.height),
            ("r.height", self.r.height),
            ("s.height", self.s.height),
            ("t.height", self.t.height),
        ]
    }

    fn durations(&self) -> [(&'static str, f64); 8] {
        [
            ("p.breadth", self.p.breadth),
            ("q.breadth", self.q.breadth),
            ("r.breadth", self.r.breadth),
            ("s.breadth", self.s.breadth),
            ("t.breadth", self.t.breadth),
            ("pq", self.pq),
            ("st", self.st),
            ("tp", self.tp),
        ]
    }
}

/// A custom beat overrides the shape fields only; heart rate and amplitude
/// scale always come from the base configuration.
pub type CustomBeatOverride = BeatShape;

/// Periodic burst: every `interval`-th beat uses `count` pulses instead of
/// the default.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DynamicPattern {
    pub enabled: bool,
    pub count: u32,
    /// 0 never triggers
    pub interval: u32,
}

impl DynamicPattern {
    pub const fn new(enabled: bool, count: u32, interval: u32) -> Self {
        Self {
            enabled,
            count,
            interval,
        }
    }

    /// Whether this pattern can ever replace the default count.
    pub fn can_trigger(&self) -> bool {
        self.enabled && self.interval > 0
    }
}

/// Custom beat substitution: the override list is played in order, then
/// `repeat_interval` ordinary beats, then the list again.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct CustomBeats {
    pub enabled: bool,
    pub repeat_interval: u32,
    pub beats: Vec<CustomBeatOverride>,
}

impl Default for CustomBeats {
    fn default() -> Self {
        Self {
            enabled: false,
            repeat_interval: 10,
            beats: Vec::new(),
        }
    }
}

impl CustomBeats {
    /// Custom mode with no overrides behaves as if it were disabled.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.beats.is_empty()
    }
}

/// Complete synthesis configuration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformConfig {
    /// Beats per minute
    pub heart_rate: f64,
    /// Distance units per amplitude unit
    pub amplitude_scale: f64,
    pub shape: BeatShape,
    /// P pulses per beat when no P burst is due
    pub p_count: u32,
    pub r_pattern: DynamicPattern,
    pub p_pattern: DynamicPattern,
    pub custom: CustomBeats,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            heart_rate: 70.0,
            amplitude_scale: 100.0,
            shape: BeatShape::default(),
            p_count: 1,
            r_pattern: DynamicPattern::new(false, 2, 5),
            p_pattern: DynamicPattern::new(false, 0, 3),
            custom: CustomBeats::default(),
        }
    }
}

impl WaveformConfig {
    /// Period of one beat in time units.
    pub fn beat_period(&self) -> f64 {
        60.0 / self.heart_rate
    }

    /// Check every field a synthesis run depends on.
    ///
    /// Besides plain range checks this rejects any shape that could yield a
    /// beat of zero length for some combination of P and QRS counts the
    /// dynamic patterns can select.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.heart_rate.is_finite() || !HEART_RATE_RANGE.contains(&self.heart_rate) {
            return Err(ConfigError::HeartRateOutOfRange {
                value: self.heart_rate,
            });
        }
        if !self.amplitude_scale.is_finite() || self.amplitude_scale < MIN_AMPLITUDE_SCALE {
            return Err(ConfigError::AmplitudeScaleOutOfRange {
                value: self.amplitude_scale,
            });
        }

        let p_counts = candidate_counts(self.p_count, &self.p_pattern);
        let qrs_counts = candidate_counts(1, &self.r_pattern);

        let customs = self
            .custom
            .is_active()
            .then_some(self.custom.beats.as_slice())
            .unwrap_or_default();
        let shapes = std::iter::once((None, &self.shape))
            .chain(customs.iter().enumerate().map(|(i, s)| (Some(i), s)));

        for (custom_beat, shape) in shapes {
            validate_shape(shape, custom_beat)?;
            for &p_count in &p_counts {
                for &qrs_count in &qrs_counts {
                    if shape.unscaled_duration(p_count, qrs_count) <= 0.0 {
                        return Err(ConfigError::EmptyBeat {
                            custom_beat,
                            p_count,
                            qrs_count,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

fn candidate_counts(default: u32, pattern: &DynamicPattern) -> Vec<u32> {
    let mut counts = vec![default];
    if pattern.can_trigger() && pattern.count != default {
        counts.push(pattern.count);
    }
    counts
}

fn validate_shape(shape: &BeatShape, custom_beat: Option<usize>) -> Result<(), ConfigError> {
    for (field, value) in shape.heights() {
        if !value.is_finite() {
            return Err(ConfigError::InvalidField {
                field,
                value,
                custom_beat,
            });
        }
    }
    for (field, value) in shape.durations() {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidField {
                field,
                value,
                custom_beat,
            });
        }
    }
    Ok(())
}

/// Reasons a configuration is refused.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Heart rate missing, non-finite or outside [`HEART_RATE_RANGE`]
    HeartRateOutOfRange { value: f64 },
    /// Amplitude scale non-finite or below [`MIN_AMPLITUDE_SCALE`]
    AmplitudeScaleOutOfRange { value: f64 },
    /// A height is non-finite, or a breadth or segment length is negative or non-finite
    InvalidField {
        field: &'static str,
        value: f64,
        custom_beat: Option<usize>,
    },
    /// Some reachable beat would have no duration at all
    EmptyBeat {
        custom_beat: Option<usize>,
        p_count: u32,
        qrs_count: u32,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::HeartRateOutOfRange { value } => write!(
                f,
                "Heart rate {} bpm is outside {}..={} bpm",
                value,
                HEART_RATE_RANGE.start(),
                HEART_RATE_RANGE.end()
            ),
            ConfigError::AmplitudeScaleOutOfRange { value } => write!(
                f,
                "Amplitude scale {} is below the minimum of {}",
                value, MIN_AMPLITUDE_SCALE
            ),
            ConfigError::InvalidField {
                field,
                value,
                custom_beat: None,
            } => write!(f, "Invalid value {} for {}", value, field),
            ConfigError::InvalidField {
                field,
                value,
                custom_beat: Some(index),
            } => write!(
                f,
                "Invalid value {} for {} in custom beat {}",
                value, field, index
            ),
            ConfigError::EmptyBeat {
                custom_beat,
                p_count,
                qrs_count,
            } => {
                write!(
                    f,
                    "Beat with {} P pulses and {} QRS complexes has zero duration",
                    p_count, qrs_count
                )?;
                if let Some(index) = custom_beat {
                    write!(f, " (custom beat {})", index)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
