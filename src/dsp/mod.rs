//! Low-level signal primitives used by the waveform synthesizer.
//!
//! These are pure functions of time and allocation-free once built, so the
//! synthesizer can evaluate them per sample without touching the heap.

/// Raised-cosine pulses and prioritized pulse windows.
pub mod pulse;

pub use pulse::{raised_cosine, PulseKind, PulseTrain, PulseWindow};
