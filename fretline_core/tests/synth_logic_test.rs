use std::f64::consts::TAU;
use std::sync::Arc;

use fretline_core::audio::{AudioNote, NoteSynth, SynthConfig};
use fretline_core::chart::Lane;

/// A quarter period into a 440 Hz cycle, where the sine peaks.
const PEAK_440: f64 = 0.5 + 1.0 / 1760.0;

fn note(pitch: u8, lane: Lane, start_time: f64, duration: f64) -> AudioNote {
    AudioNote {
        pitch,
        lane,
        start_time,
        duration,
    }
}

fn silent_tone_config() -> SynthConfig {
    SynthConfig {
        calibration_tone: None,
        ..SynthConfig::default()
    }
}

fn synth(notes: Vec<AudioNote>, config: SynthConfig) -> NoteSynth {
    NoteSynth::new(Arc::from(notes), config)
}

fn assert_close(actual: f32, expected: f64) {
    assert!(
        (f64::from(actual) - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_calibration_tone_plays_first_two_seconds() {
    let synth = synth(Vec::new(), SynthConfig::default());

    let (left, right) = synth.sample_at(1.0 / 1760.0);
    assert_close(left, 0.2);
    assert_close(right, 0.2);

    assert_eq!(synth.sample_at(2.0), (0.0, 0.0));
    assert_eq!(synth.sample_at(-0.1), (0.0, 0.0));
}

#[test]
fn test_lane_panning() {
    let cases = [(Lane::A, 0.8, 0.4), (Lane::W, 0.6, 0.6), (Lane::D, 0.4, 0.8)];
    for (lane, pan_l, pan_r) in cases {
        let synth = synth(vec![note(69, lane, 0.0, 1.0)], silent_tone_config());
        let (left, right) = synth.sample_at(PEAK_440);
        assert_close(left, 0.2 * pan_l);
        assert_close(right, 0.2 * pan_r);
    }
}

#[test]
fn test_simultaneous_notes_share_amplitude() {
    let synth = synth(
        vec![note(69, Lane::W, 0.0, 1.0), note(69, Lane::W, 0.0, 1.0)],
        silent_tone_config(),
    );
    let (left, right) = synth.sample_at(PEAK_440);
    assert_close(left, 0.12);
    assert_close(right, 0.12);
}

#[test]
fn test_note_boundaries_are_half_open_and_faded() {
    let synth = synth(vec![note(69, Lane::W, 1.0, 1.0)], silent_tone_config());
    assert_eq!(synth.sample_at(0.999), (0.0, 0.0));
    assert_eq!(synth.sample_at(2.0), (0.0, 0.0));

    let t = 1.02;
    let envelope = (t - 1.0) / 0.05;
    let expected = 0.2 * envelope * (TAU * 440.0 * t).sin() * 0.6;
    let (left, _) = synth.sample_at(t);
    assert_close(left, expected);

    let t = 1.97;
    let envelope = (2.0 - t) / 0.05;
    let expected = 0.2 * envelope * (TAU * 440.0 * t).sin() * 0.6;
    let (left, _) = synth.sample_at(t);
    assert_close(left, expected);
}

#[test]
fn test_output_is_hard_clipped() {
    let config = SynthConfig {
        note_amplitude: 5.0,
        ..silent_tone_config()
    };
    let synth = synth(vec![note(69, Lane::A, 0.0, 1.0)], config);
    assert_eq!(synth.sample_at(PEAK_440), (1.0, 1.0));
}

#[test]
fn test_master_volume_scales_mix() {
    let mut synth = synth(vec![note(69, Lane::A, 0.0, 1.0)], silent_tone_config());
    synth.set_volume(0.5);
    let (left, right) = synth.sample_at(PEAK_440);
    assert_close(left, 0.08);
    assert_close(right, 0.04);

    synth.set_volume(3.0);
    assert_eq!(synth.volume(), 1.0);
}

#[test]
fn test_render_interleaves_frames() {
    let synth = synth(vec![note(60, Lane::A, 0.0, 1.0)], silent_tone_config());
    let mut buffer = vec![0.0f32; 128];
    let more = synth.render(&mut buffer, 0.5);
    assert!(more);

    for (i, frame) in buffer.chunks_exact(2).enumerate() {
        let (left, right) = synth.sample_at(0.5 + i as f64 / 44_100.0);
        assert_eq!(frame[0], left);
        assert_eq!(frame[1], right);
    }

    let mut tail = vec![0.0f32; 2048];
    assert!(!synth.render(&mut tail, 0.99));
}

#[test]
fn test_end_time_covers_tone_and_notes() {
    let with_tone = synth(vec![note(60, Lane::A, 0.5, 0.5)], SynthConfig::default());
    assert_eq!(with_tone.end_time(), 2.0);

    let notes_only = synth(vec![note(60, Lane::A, 5.0, 1.5)], silent_tone_config());
    assert_eq!(notes_only.end_time(), 6.5);
}
