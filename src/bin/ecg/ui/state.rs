//! Draft configuration edited from the keyboard
//!
//! Key presses only touch the draft. Nothing reaches the engine until the
//! draft is applied as a whole.

use saavy_ecg::waveform::{config::HEART_RATE_RANGE, WaveformConfig};

/// Heart rate change per key press
pub const HEART_RATE_STEP: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Draft {
    config: WaveformConfig,
}

impl Draft {
    pub fn new(config: WaveformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WaveformConfig {
        &self.config
    }

    /// Move the heart rate by `delta`, staying inside the accepted range
    pub fn nudge_heart_rate(&mut self, delta: f64) {
        let rate = (self.config.heart_rate + delta)
            .clamp(*HEART_RATE_RANGE.start(), *HEART_RATE_RANGE.end());
        self.config.heart_rate = rate;
    }

    pub fn toggle_r_pattern(&mut self) {
        self.config.r_pattern.enabled = !self.config.r_pattern.enabled;
    }

    pub fn toggle_p_pattern(&mut self) {
        self.config.p_pattern.enabled = !self.config.p_pattern.enabled;
    }

    pub fn toggle_custom(&mut self) {
        self.config.custom.enabled = !self.config.custom.enabled;
    }

    /// Whether the draft differs from what the engine runs
    pub fn is_pending(&self, live: &WaveformConfig) -> bool {
        self.config != *live
    }

    /// Throw away edits
    pub fn revert(&mut self, live: &WaveformConfig) {
        self.config = live.clone();
    }
}
