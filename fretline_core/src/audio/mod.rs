//! The audio engine: a pull-driven stereo synthesizer over its own immutable
//! note list, clocked independently of gameplay.

#[cfg(feature = "cpal")]
pub mod backend;
pub mod mixer;
pub mod synth;

use thiserror::Error;

use crate::chart::Lane;

pub use mixer::{AudioPlayer, MixerCommand, SharedMixer, SynthMixer};
pub use synth::{CalibrationTone, NoteSynth, SynthConfig};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Init(String),
    #[error("audio mixer is not running")]
    NotReady,
}

/// A note as the synthesizer sees it. Built once per session, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioNote {
    pub pitch: u8,
    pub lane: Lane,
    pub start_time: f64,
    pub duration: f64,
}

impl AudioNote {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Sounding on `[start, end)`.
    pub fn is_active_at(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time()
    }
}

/// Equal temperament, A4 (pitch 69) = 440 Hz.
pub fn pitch_to_frequency(pitch: u8) -> f64 {
    440.0 * 2f64.powf((f64::from(pitch) - 69.0) / 12.0)
}

/// (left, right) channel weights.
pub fn lane_pan(lane: Lane) -> (f32, f32) {
    match lane {
        Lane::A => (0.8, 0.4),
        Lane::W => (0.6, 0.6),
        Lane::D => (0.4, 0.8),
    }
}
