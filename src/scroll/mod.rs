//! Scrolling sweep display.
//!
//! The [`ScrollEngine`] consumes synthesized points and never computes
//! waveform values itself. It is driven by one [`ScrollEngine::tick`] per
//! frame and reports what to draw through a [`TraceSurface`].

pub mod clock;
pub mod engine;
pub mod message;
pub mod surface;
pub mod viewport;

pub use clock::FrameClock;
pub use engine::{EngineError, ScrollEngine};
pub use message::{Continuity, EngineMessage, MessageReceiver};
pub use surface::{FrameRecord, TraceSurface};
pub use viewport::Viewport;
