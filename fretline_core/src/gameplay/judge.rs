use serde::{Deserialize, Serialize};

/// Accuracy tier of a resolved note, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Judgment {
    Miss,
    Ok,
    Good,
    Perfect,
}

/// One-tier downgrades applied when a held note is released badly.
/// OK and Miss have no entry and are never downgraded.
const DOWNGRADE_TIERS: [(Judgment, Judgment); 2] = [
    (Judgment::Perfect, Judgment::Good),
    (Judgment::Good, Judgment::Ok),
];

impl Judgment {
    pub fn base_score(self) -> u32 {
        match self {
            Judgment::Perfect => 100,
            Judgment::Good => 75,
            Judgment::Ok => 50,
            Judgment::Miss => 0,
        }
    }

    pub fn is_hit(self) -> bool {
        self != Judgment::Miss
    }

    pub fn downgraded(self) -> Self {
        DOWNGRADE_TIERS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|&(_, to)| to)
            .unwrap_or(self)
    }

    pub fn label(self) -> &'static str {
        match self {
            Judgment::Perfect => "PERFECT",
            Judgment::Good => "GOOD",
            Judgment::Ok => "OK",
            Judgment::Miss => "MISS",
        }
    }
}

/// Timing windows in seconds (half-width) and hold rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeWindows {
    pub perfect: f64,
    pub good: f64,
    pub ok: f64,
    /// How long after its start a note can still be pressed, and when an
    /// untouched note is swept as missed.
    pub late_capture: f64,
    /// Notes longer than this must be held.
    pub sustain_threshold: f64,
    /// Holds completed beyond this fraction earn the bonus.
    pub sustain_bonus_ratio: f64,
    pub sustain_bonus_points: u32,
}

impl Default for JudgeWindows {
    fn default() -> Self {
        Self {
            perfect: 0.05,
            good: 0.10,
            ok: 0.15,
            late_capture: 0.2,
            sustain_threshold: 0.3,
            sustain_bonus_ratio: 0.8,
            sustain_bonus_points: 50,
        }
    }
}

impl JudgeWindows {
    pub fn judge(&self, time_diff: f64) -> Judgment {
        let abs_diff = time_diff.abs();
        if abs_diff <= self.perfect {
            Judgment::Perfect
        } else if abs_diff <= self.good {
            Judgment::Good
        } else if abs_diff <= self.ok {
            Judgment::Ok
        } else {
            Judgment::Miss
        }
    }

    pub fn is_sustained(&self, duration: f64) -> bool {
        duration > self.sustain_threshold
    }

    pub fn sustain_bonus(&self, progress: f64) -> u32 {
        if progress > self.sustain_bonus_ratio {
            (f64::from(self.sustain_bonus_points) * progress).round() as u32
        } else {
            0
        }
    }
}
