use serde::{Deserialize, Serialize};

/// 120 BPM.
pub const DEFAULT_TEMPO_MICROS: u32 = 500_000;

/// Tick to second conversion.
///
/// Only the most recent tempo is kept, and it is applied to the absolute tick
/// count. Charts with a single tempo convert exactly; charts that change tempo
/// mid-song drift after the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tempo {
    micros_per_beat: u32,
    ticks_per_beat: u16,
}

impl Tempo {
    pub fn new(ticks_per_beat: u16) -> Self {
        Self {
            micros_per_beat: DEFAULT_TEMPO_MICROS,
            ticks_per_beat,
        }
    }

    pub fn micros_per_beat(&self) -> u32 {
        self.micros_per_beat
    }

    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    pub fn bpm(&self) -> f64 {
        if self.micros_per_beat == 0 {
            return 0.0;
        }
        60_000_000.0 / f64::from(self.micros_per_beat)
    }

    pub(crate) fn set_micros_per_beat(&mut self, micros_per_beat: u32) {
        self.micros_per_beat = micros_per_beat;
    }

    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        ticks as f64 * f64::from(self.micros_per_beat)
            / (f64::from(self.ticks_per_beat) * 1_000_000.0)
    }
}
