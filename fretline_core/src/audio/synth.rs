use std::f64::consts::TAU;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{lane_pan, pitch_to_frequency, AudioNote};

/// Diagnostic sine summed into both channels at the start of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTone {
    pub frequency: f64,
    pub duration: f64,
    pub amplitude: f32,
}

impl Default for CalibrationTone {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            duration: 2.0,
            amplitude: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub sample_rate: u32,
    /// Per-note peak before loudness normalisation.
    pub note_amplitude: f32,
    pub fade_seconds: f64,
    pub calibration_tone: Option<CalibrationTone>,
    pub master_volume: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            note_amplitude: 0.2,
            fade_seconds: 0.05,
            calibration_tone: Some(CalibrationTone::default()),
            master_volume: 1.0,
        }
    }
}

/// Stateless sine synthesizer. Every sample is a pure function of the time it
/// is rendered for, so buffers can be pulled at any cadence.
#[derive(Debug, Clone)]
pub struct NoteSynth {
    notes: Arc<[AudioNote]>,
    config: SynthConfig,
    volume: f32,
    end_time: f64,
}

impl NoteSynth {
    pub fn new(notes: Arc<[AudioNote]>, config: SynthConfig) -> Self {
        let tone_end = config.calibration_tone.map_or(0.0, |t| t.duration);
        let end_time = notes
            .iter()
            .map(AudioNote::end_time)
            .fold(tone_end, f64::max);
        let volume = config.master_volume.clamp(0.0, 1.0);
        Self {
            notes,
            config,
            volume,
            end_time,
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Time after which nothing sounds.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn notes(&self) -> &Arc<[AudioNote]> {
        &self.notes
    }

    /// Fills interleaved stereo frames, the first one at `elapsed` seconds of
    /// session time. Returns whether anything remains to be played after this
    /// buffer.
    pub fn render(&self, out: &mut [f32], elapsed: f64) -> bool {
        let rate = f64::from(self.config.sample_rate);
        let frames = out.len() / 2;
        for (i, frame) in out.chunks_exact_mut(2).enumerate() {
            let (left, right) = self.sample_at(elapsed + i as f64 / rate);
            frame[0] = left;
            frame[1] = right;
        }
        elapsed + frames as f64 / rate < self.end_time
    }

    /// One stereo frame at session time `t`, clipped to [-1, 1].
    pub fn sample_at(&self, t: f64) -> (f32, f32) {
        let mut left = 0.0f64;
        let mut right = 0.0f64;

        if let Some(tone) = self.config.calibration_tone {
            if t >= 0.0 && t < tone.duration {
                let s = f64::from(tone.amplitude) * (TAU * tone.frequency * t).sin();
                left += s;
                right += s;
            }
        }

        let active = self.notes.iter().filter(|n| n.is_active_at(t)).count();
        if active > 0 {
            let amplitude = f64::from(self.config.note_amplitude) / active as f64;
            for note in self.notes.iter().filter(|n| n.is_active_at(t)) {
                let s = amplitude
                    * self.envelope(note, t)
                    * (TAU * pitch_to_frequency(note.pitch) * t).sin();
                let (pan_l, pan_r) = lane_pan(note.lane);
                left += s * f64::from(pan_l);
                right += s * f64::from(pan_r);
            }
        }

        let volume = f64::from(self.volume);
        (
            (left * volume).clamp(-1.0, 1.0) as f32,
            (right * volume).clamp(-1.0, 1.0) as f32,
        )
    }

    /// Linear ramps over the first and last `fade_seconds` of a note.
    fn envelope(&self, note: &AudioNote, t: f64) -> f64 {
        let fade = self.config.fade_seconds;
        if fade <= 0.0 {
            return 1.0;
        }
        let fade_in = (t - note.start_time) / fade;
        let fade_out = (note.end_time() - t) / fade;
        fade_in.min(fade_out).clamp(0.0, 1.0)
    }
}
