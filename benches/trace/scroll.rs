//! Benchmarks for per-frame scroll engine work.

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion};
use saavy_ecg::scroll::{FrameRecord, ScrollEngine, Viewport};
use saavy_ecg::waveform::WaveformConfig;

use crate::VIEWPORT_WIDTHS;

const FRAME: Duration = Duration::from_millis(16);

pub fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll/tick");

    for &width in VIEWPORT_WIDTHS {
        let viewport = Viewport::new(width, 400.0);

        // Revealing the first sweep
        let mut engine = ScrollEngine::new(WaveformConfig::default(), viewport)
            .expect("default config is valid");
        group.bench_with_input(BenchmarkId::new("first_sweep", width), &width, |b, _| {
            b.iter(|| {
                engine.tick(black_box(FRAME));
                if !engine.is_first_sweep() {
                    engine.reset();
                }
            })
        });

        // Band redraw, wraps included
        let mut engine = ScrollEngine::new(WaveformConfig::default(), viewport)
            .expect("default config is valid");
        while engine.is_first_sweep() {
            engine.tick(FRAME);
        }
        group.bench_with_input(BenchmarkId::new("continuous", width), &width, |b, _| {
            b.iter(|| engine.tick(black_box(FRAME)))
        });

        // Tick plus handing the frame to a surface
        let mut frame = FrameRecord::new();
        group.bench_with_input(BenchmarkId::new("tick_render", width), &width, |b, _| {
            b.iter(|| {
                engine.tick(black_box(FRAME));
                engine.render(&mut frame);
            })
        });
    }

    group.finish();
}
