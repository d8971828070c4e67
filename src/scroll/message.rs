use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::waveform::WaveformConfig;

/// Whether pattern counters survive a reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuity {
    /// Carry the generator state over so bursts and custom beats keep their phase
    #[default]
    Keep,
    /// Zero the generator state
    Restart,
}

/// Commands for the scroll engine, applied at the start of a frame.
#[derive(Debug, Clone)]
pub enum EngineMessage {
    Apply {
        config: WaveformConfig,
        continuity: Continuity,
    },
    Reset,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<EngineMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<EngineMessage> {
    fn pop(&mut self) -> Option<EngineMessage> {
        Consumer::pop(self).ok()
    }
}

impl MessageReceiver for VecDeque<EngineMessage> {
    fn pop(&mut self) -> Option<EngineMessage> {
        self.pop_front()
    }
}
