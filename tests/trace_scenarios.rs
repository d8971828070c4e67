use std::time::Duration;

use saavy_ecg::{
    scroll::{ScrollEngine, Viewport},
    waveform::{
        generate, BeatShape, BeatSource, DynamicPattern, GeneratorState, Raster, WaveformConfig,
    },
};

const STEP: f64 = 1.0 / 150.0;

fn raster() -> Raster {
    Raster::new(150.0, 200.0)
}

/// Amplitudes of the samples belonging to each beat.
fn beat_amplitudes(config: &WaveformConfig, duration: f64) -> Vec<Vec<f64>> {
    let raster = raster();
    let out = generate(config, GeneratorState::new(), duration, &raster).unwrap();
    out.beats
        .iter()
        .map(|beat| {
            out.points
                .iter()
                .filter(|p| {
                    let t = p.x / raster.pixels_per_second;
                    t >= beat.start - 1e-9 && t < beat.end() - 1e-9
                })
                .map(|p| raster.amplitude_of(p, config.amplitude_scale))
                .collect()
        })
        .collect()
}

/// Runs of samples above `threshold` in absolute value. Quiet stretches of
/// at most `max_gap` samples do not split a run.
fn deflections(samples: &[f64], threshold: f64, max_gap: usize) -> usize {
    let mut runs = 0;
    let mut quiet = usize::MAX;
    for &v in samples {
        if v.abs() > threshold {
            if quiet > max_gap {
                runs += 1;
            }
            quiet = 0;
        } else {
            quiet = quiet.saturating_add(1);
        }
    }
    runs
}

#[test]
fn default_rhythm_two_beats() {
    let config = WaveformConfig::default();
    let period = 60.0 / 70.0;
    let out = generate(&config, GeneratorState::new(), 2.0 * period, &raster()).unwrap();

    assert_eq!(out.beats.len(), 2);
    assert_eq!(out.state.beat_counter, 2);
    for beat in &out.beats {
        assert!((beat.duration - period).abs() < STEP);
        assert_eq!(beat.p_count, 1);
        assert_eq!(beat.qrs_count, 1);
    }

    // Sample count per beat matches the period to within one step.
    let total = out.points.len() as f64 * STEP;
    assert!((total - 2.0 * period).abs() <= STEP);

    for samples in beat_amplitudes(&config, 2.0 * period) {
        let measured = samples.len() as f64 * STEP;
        assert!((measured - period).abs() <= STEP, "beat lasted {measured}");

        let peak = samples.iter().copied().fold(f64::MIN, f64::max);
        let trough = samples.iter().copied().fold(f64::MAX, f64::min);
        assert!(peak > 1.0, "R peak missing: {peak}");
        assert!(trough < -0.15, "S trough missing: {trough}");

        // P, the QRS complex and T are separated by flat segments.
        assert_eq!(deflections(&samples, 0.01, 3), 3);
    }
}

#[test]
fn r_burst_on_even_beats() {
    let mut config = WaveformConfig::default();
    config.r_pattern = DynamicPattern::new(true, 3, 2);
    let period = config.beat_period();

    let out = generate(&config, GeneratorState::new(), 8.0 * period, &raster()).unwrap();
    for (i, beat) in out.beats.iter().enumerate() {
        let expected = if (i + 1) % 2 == 0 { 3 } else { 1 };
        assert_eq!(beat.qrs_count, expected, "beat {}", i + 1);
        assert!((beat.duration - period).abs() < 1e-12);
    }

    // Every burst beat shows three separate R peaks above 1.0.
    let amplitudes = beat_amplitudes(&config, 8.0 * period);
    let r_peaks = |samples: &Vec<f64>| deflections(samples, 0.9, 0);
    assert_eq!(r_peaks(&amplitudes[0]), 1);
    assert_eq!(r_peaks(&amplitudes[1]), 3);
}

#[test]
fn custom_cycle_repeats_twice() {
    let mut config = WaveformConfig::default();
    config.custom.enabled = true;
    config.custom.repeat_interval = 3;
    for tp in [0.2, 0.4] {
        config.custom.beats.push(BeatShape {
            tp,
            ..BeatShape::default()
        });
    }
    let (n, r) = (2usize, 3usize);
    let period = config.beat_period();

    let out = generate(
        &config,
        GeneratorState::new(),
        (2 * (n + r)) as f64 * period,
        &raster(),
    )
    .unwrap();
    let sources: Vec<_> = out.beats.iter().map(|b| b.source).collect();

    let mut expected = Vec::new();
    for _ in 0..2 {
        expected.extend((0..n).map(BeatSource::Custom));
        expected.extend(std::iter::repeat(BeatSource::Base).take(r));
    }
    assert_eq!(sources, expected);
}

#[test]
fn regeneration_keeps_pattern_phase() {
    let mut config = WaveformConfig::default();
    config.p_pattern = DynamicPattern::new(true, 2, 3);
    let period = config.beat_period();

    let whole = generate(&config, GeneratorState::new(), 6.0 * period, &raster()).unwrap();

    let mut state = GeneratorState::new();
    let mut pieces = Vec::new();
    for _ in 0..3 {
        let out = generate(&config, state, 2.0 * period, &raster()).unwrap();
        pieces.extend(out.beats.iter().map(|b| b.p_count));
        state = out.state;
    }

    let counts: Vec<_> = whole.beats.iter().map(|b| b.p_count).collect();
    assert_eq!(counts, pieces);
    assert_eq!(state, whole.state);
}

#[test]
fn wrap_regenerates_before_band() {
    let mut config = WaveformConfig::default();
    config.r_pattern = DynamicPattern::new(true, 3, 2);
    let viewport = Viewport::new(300.0, 400.0);
    let mut engine = ScrollEngine::new(config, viewport).unwrap();
    let frame = Duration::from_millis(20);

    while engine.is_first_sweep() {
        engine.tick(frame);
    }
    let stale = engine.points().to_vec();
    let beats_before = engine.generator_state().beat_counter;

    engine.tick(frame);
    assert_eq!(engine.pointer(), 0.0);
    assert_ne!(engine.points(), stale.as_slice());
    assert!(engine.generator_state().beat_counter > beats_before);

    // The band around the new head position already shows the new trace.
    for i in engine.band() {
        assert_eq!(engine.drawn()[i], Some(engine.points()[i]));
    }
    assert_eq!(engine.marker(), Some(engine.points()[0]));
}

#[test]
fn long_run_stays_bounded() {
    let mut config = WaveformConfig::default();
    config.r_pattern = DynamicPattern::new(true, 2, 4);
    let mut engine = ScrollEngine::new(config, Viewport::new(500.0, 300.0)).unwrap();

    for _ in 0..2_000 {
        engine.tick(Duration::from_millis(16));
        assert_eq!(engine.drawn().len(), engine.points().len());
        assert!(engine.pointer() <= 500.0 + 150.0 * 0.016 + 1e-9);
    }
    assert!(engine.sweeps() >= 5);
}
