use std::time::{Duration, Instant};

/// Turns frame timestamps into elapsed time between frames.
///
/// The first tick has nothing to measure against and reports zero, so the
/// pointer does not jump on the opening frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn tick(&mut self, now: Instant) -> Duration {
        let elapsed = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        elapsed
    }
}
