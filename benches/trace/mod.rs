//! Benchmarks for the synthesizer and scroll engine.

mod scroll;
mod synth;

pub use scroll::bench_scroll;
pub use synth::bench_synth;
