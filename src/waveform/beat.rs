//! Per-beat planning.
//!
//! Planning a beat decides which shape it uses, how many P pulses and QRS
//! complexes it carries, and where every pulse window sits in absolute time.
//! Sampling happens later in [`super::synth`]; nothing here produces points.

use crate::dsp::pulse::{PulseKind, PulseTrain, PulseWindow};

use super::config::{BeatShape, DynamicPattern, WaveformConfig};
use super::state::GeneratorState;
use super::synth::SynthError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a beat's shape came from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatSource {
    /// The base configuration's shape
    Base,
    /// The custom override at this index
    Custom(usize),
}

/// What a planned beat looks like from the outside.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatSummary {
    pub source: BeatSource,
    pub start: f64,
    pub duration: f64,
    pub p_count: u32,
    pub qrs_count: u32,
}

impl BeatSummary {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A fully laid out beat.
#[derive(Debug, Clone)]
pub struct BeatPlan {
    pub summary: BeatSummary,
    /// Shape after rate scaling
    pub shape: BeatShape,
    pub pulses: PulseTrain,
}

impl BeatPlan {
    /// Plan the next beat starting at `start`, advancing the pattern counters
    /// in `state`. The beat counter is left to the caller.
    pub fn next(
        config: &WaveformConfig,
        state: &mut GeneratorState,
        start: f64,
    ) -> Result<Self, SynthError> {
        if !(config.heart_rate > 0.0) {
            return Err(SynthError::NonPositiveHeartRate {
                value: config.heart_rate,
            });
        }

        let (source, shape) = select_shape(config, state);
        let p_count = burst_count(&config.p_pattern, &mut state.p_counter, config.p_count);
        let qrs_count = burst_count(&config.r_pattern, &mut state.r_counter, 1);

        let period = config.beat_period();
        let unscaled = shape.unscaled_duration(p_count, qrs_count);
        if !(unscaled > 0.0) || !unscaled.is_finite() {
            return Err(SynthError::EmptyBeat { p_count, qrs_count });
        }
        let shape = shape.scaled(period / unscaled);

        let pulses = layout(&shape, start, p_count, qrs_count);

        Ok(Self {
            summary: BeatSummary {
                source,
                start,
                duration: period,
                p_count,
                qrs_count,
            },
            shape,
            pulses,
        })
    }

    /// Span of every scaled breadth and segment actually laid out. Longer
    /// than the period for QRS bursts; sampling stops at the period.
    pub fn laid_out_duration(&self) -> f64 {
        self.shape
            .layout_span(self.summary.p_count, self.summary.qrs_count)
    }
}

/// Pick the shape for this beat, stepping the custom list bookkeeping.
fn select_shape(config: &WaveformConfig, state: &mut GeneratorState) -> (BeatSource, BeatShape) {
    let custom = &config.custom;
    if !custom.enabled {
        return (BeatSource::Base, config.shape);
    }

    if !custom.beats.is_empty() && state.waiting_normal_beats == 0 {
        // The list may have shrunk since the state was last used.
        if state.custom_beat_index >= custom.beats.len() {
            state.custom_beat_index = 0;
        }
        let index = state.custom_beat_index;
        state.custom_beat_index += 1;
        if state.custom_beat_index >= custom.beats.len() {
            state.custom_beat_index = 0;
            state.waiting_normal_beats = custom.repeat_interval;
        }
        return (BeatSource::Custom(index), custom.beats[index]);
    }

    if state.waiting_normal_beats > 0 {
        state.waiting_normal_beats -= 1;
    }
    (BeatSource::Base, config.shape)
}

/// Count for this beat: the burst count on every `interval`-th beat while the
/// pattern is enabled, otherwise `default`.
fn burst_count(pattern: &DynamicPattern, counter: &mut u32, default: u32) -> u32 {
    if !pattern.enabled {
        return default;
    }
    *counter = counter.saturating_add(1);
    if pattern.interval > 0 && *counter >= pattern.interval {
        *counter = 0;
        pattern.count
    } else {
        default
    }
}

/// Place every pulse window of a scaled beat.
///
/// P pulses repeat every P breadth + PQ gap. Each QRS complex abuts the one
/// before it with half a PQ gap in between, Q, R and S touching inside a
/// complex. ST separates the last S from T. Bursts of more than one complex
/// push T and TP towards or past the end of the beat period.
fn layout(shape: &BeatShape, start: f64, p_count: u32, qrs_count: u32) -> PulseTrain {
    let mut pulses = PulseTrain::with_capacity(p_count as usize + 3 * qrs_count as usize + 1);

    let p_step = shape.p.breadth + shape.pq;
    for i in 0..p_count {
        pulses.push(PulseWindow::new(
            PulseKind::P,
            start + i as f64 * p_step,
            shape.p.breadth,
            shape.p.height,
        ));
    }
    let mut offset = start + p_count as f64 * p_step;

    let mut complexes = Vec::with_capacity(qrs_count as usize);
    for i in 0..qrs_count {
        let q = offset;
        let r = q + shape.q.breadth;
        let s = r + shape.r.breadth;
        offset = s + shape.s.breadth;
        if i + 1 < qrs_count {
            offset += shape.pq / 2.0;
        }
        complexes.push((q, r, s));
    }
    for &(q, _, _) in &complexes {
        pulses.push(PulseWindow::new(PulseKind::Q, q, shape.q.breadth, shape.q.height));
    }
    for &(_, r, _) in &complexes {
        pulses.push(PulseWindow::new(PulseKind::R, r, shape.r.breadth, shape.r.height));
    }
    for &(_, _, s) in &complexes {
        pulses.push(PulseWindow::new(PulseKind::S, s, shape.s.breadth, shape.s.height));
    }

    offset += shape.st;
    pulses.push(PulseWindow::new(PulseKind::T, offset, shape.t.breadth, shape.t.height));

    pulses
}
