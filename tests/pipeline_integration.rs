//! End-to-end pipeline tests: render-side input through the visual worker
//! to the display-side handles.

use std::f32::consts::PI;
use std::time::Duration;

use oscilla::prelude::*;
use oscilla::{SAMPLE_RATE, SPECTRUM_BANDS, VU_DB_FLOOR};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Feed `blocks` analysis blocks of a sine at `freq`, in the 128-sample
/// bursts the render callback delivers.
fn feed_sine(audio: &mut AudioInput, freq: f32, blocks: usize) {
    let mut n = 0usize;
    for _ in 0..blocks * 8 {
        let mut burst = [0.0f32; 128];
        for s in burst.iter_mut() {
            *s = (2.0 * PI * freq * n as f32 / SAMPLE_RATE as f32).sin();
            n += 1;
        }
        audio.push_samples(&burst);
    }
}

fn band_nearest(frequencies: &[f32; SPECTRUM_BANDS], freq: f32) -> usize {
    let mut best = 0;
    for (i, &fc) in frequencies.iter().enumerate() {
        if (fc - freq).abs() < (frequencies[best] - freq).abs() {
            best = i;
        }
    }
    best
}

#[test]
fn test_sine_reaches_all_three_surfaces() {
    init_tracing();
    let (engine, mut audio) = VisualizerEngine::builder()
        .build()
        .expect("default config builds");

    feed_sine(&mut audio, 440.0, 4);
    std::thread::sleep(Duration::from_millis(300));

    let visuals = engine.visuals();

    let spectrum = visuals.spectrum().expect("spectrum published");
    let on_band = band_nearest(visuals.band_frequencies(), 440.0);
    let far_band = band_nearest(visuals.band_frequencies(), 8000.0);
    assert!(
        spectrum.bands[on_band] > spectrum.bands[far_band],
        "440 Hz band {} dB should exceed 8 kHz band {} dB",
        spectrum.bands[on_band],
        spectrum.bands[far_band]
    );

    let waveform = visuals.waveform().expect("waveform published");
    assert!(waveform.points.iter().any(|&p| p.abs() > 0.1));

    let vu = visuals.vu().expect("vu published");
    assert!(vu.rms_db > VU_DB_FLOOR);
    assert!(vu.peak_db > -6.0, "unit sine peak at {} dB", vu.peak_db);

    engine.shutdown();
}

#[test]
fn test_fft_mode_builds_and_publishes() {
    init_tracing();
    let (engine, mut audio) = VisualizerEngine::builder()
        .spectrum_mode(SpectrumMode::Fft)
        .build()
        .expect("fft config builds");

    feed_sine(&mut audio, 1000.0, 4);
    std::thread::sleep(Duration::from_millis(200));

    let visuals = engine.visuals();
    let spectrum = visuals.spectrum().expect("spectrum published");
    assert!(spectrum.bands.iter().any(|&b| b > -60.0));
    assert_eq!(visuals.band_frequencies()[0], 0.0);
}

#[test]
fn test_note_round_trip() {
    let (engine, mut audio) = VisualizerEngine::builder().build().unwrap();

    assert!(engine.post_note_on(60));
    assert!(engine.post_note_on(64));
    assert!(engine.post_note_on(67));

    let mut pitches = Vec::new();
    let drained = audio.drain_notes(|note| pitches.push(note.pitch));
    assert_eq!(drained, 3);
    assert_eq!(pitches, vec![60, 64, 67]);

    // Nothing left on a second drain.
    assert_eq!(audio.drain_notes(|_| {}), 0);
}

#[test]
fn test_reset_clears_meters() {
    let (engine, mut audio) = VisualizerEngine::builder().build().unwrap();

    feed_sine(&mut audio, 440.0, 4);
    std::thread::sleep(Duration::from_millis(200));
    let loud = engine.visuals().vu().expect("vu published");
    assert!(loud.peak_hold_db > -10.0);

    // Silence the tap, then reset. The hold must not survive the reset.
    audio.push_samples(&[0.0; 1024]);
    engine.reset();
    std::thread::sleep(Duration::from_millis(200));

    let quiet = engine.visuals().vu().expect("vu published");
    assert!(
        quiet.peak_hold_db < -20.0,
        "hold at {} dB after reset",
        quiet.peak_hold_db
    );
}

#[test]
fn test_trigger_level_runtime_validation() {
    let (engine, _audio) = VisualizerEngine::builder().build().unwrap();

    assert!(engine.set_trigger_level(0.25).is_ok());
    assert_eq!(engine.trigger_level(), 0.25);

    assert!(engine.set_trigger_level(2.0).is_err());
    assert!(engine.set_trigger_level(f32::NAN).is_err());
    // Rejected values leave the level untouched.
    assert_eq!(engine.trigger_level(), 0.25);
}

#[test]
fn test_shutdown_is_idempotent() {
    let (engine, _audio) = VisualizerEngine::builder().build().unwrap();
    engine.shutdown();
    engine.shutdown();
    // Drop runs shutdown a third time.
}

#[test]
fn test_no_frames_before_first_block() {
    let (engine, audio) = VisualizerEngine::builder().build().unwrap();
    assert_eq!(audio.pending_samples(), 0);

    let visuals = engine.visuals();
    assert!(visuals.spectrum().is_none());
    assert!(visuals.waveform().is_none());
    assert!(visuals.vu().is_none());
    assert_eq!(engine.dropped_blocks(), 0);
}
