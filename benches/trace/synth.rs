//! Benchmarks for beat synthesis.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_ecg::waveform::{generate, BeatShape, DynamicPattern, GeneratorState, Raster, WaveformConfig};

use crate::VIEWPORT_WIDTHS;

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/generate");
    let raster = Raster::new(150.0, 200.0);

    for &width in VIEWPORT_WIDTHS {
        let duration = raster.duration_for(width);

        // Plain sinus rhythm
        let config = WaveformConfig::default();
        group.bench_with_input(BenchmarkId::new("default", width), &width, |b, _| {
            b.iter(|| generate(black_box(&config), GeneratorState::new(), duration, &raster))
        });

        // Bursts and custom beats on every path
        let mut config = WaveformConfig::default();
        config.r_pattern = DynamicPattern::new(true, 3, 2);
        config.p_pattern = DynamicPattern::new(true, 2, 3);
        config.custom.enabled = true;
        config.custom.repeat_interval = 2;
        config.custom.beats.push(BeatShape::default());
        group.bench_with_input(BenchmarkId::new("patterned", width), &width, |b, _| {
            b.iter(|| generate(black_box(&config), GeneratorState::new(), duration, &raster))
        });
    }

    group.finish();
}
