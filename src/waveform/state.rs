#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pattern counters carried from one synthesis call to the next.
///
/// The synthesizer takes this by value and returns the advanced copy, so the
/// caller decides whether pattern phase survives a regeneration. Outside of
/// generation the only thing that changes these counters is
/// [`GeneratorState::reset`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorState {
    /// Beats since the last R burst
    pub r_counter: u32,
    /// Beats since the last P burst
    pub p_counter: u32,
    /// Beats emitted since the last reset
    pub beat_counter: u64,
    /// Next override to play from the custom beat list
    pub custom_beat_index: usize,
    /// Ordinary beats still owed before the custom list plays again
    pub waiting_normal_beats: u32,
}

impl GeneratorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
