use serde::Serialize;

use super::judge::Judgment;

/// Combo above this earns `combo / 10` extra points per judgment.
const COMBO_BONUS_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub perfect_hits: u32,
    pub good_hits: u32,
    pub ok_hits: u32,
    pub missed_hits: u32,
    pub total_notes: u32,
}

impl SessionStats {
    pub fn new(total_notes: u32) -> Self {
        Self {
            total_notes,
            ..Self::default()
        }
    }

    pub fn record(&mut self, judgment: Judgment) {
        self.score += judgment.base_score();
        match judgment {
            Judgment::Perfect => self.perfect_hits += 1,
            Judgment::Good => self.good_hits += 1,
            Judgment::Ok => self.ok_hits += 1,
            Judgment::Miss => self.missed_hits += 1,
        }

        if judgment.is_hit() {
            self.combo += 1;
        } else {
            self.combo = 0;
        }
        self.max_combo = self.max_combo.max(self.combo);

        if self.combo > COMBO_BONUS_THRESHOLD {
            self.score += self.combo / 10;
        }
    }

    pub fn add_bonus(&mut self, points: u32) {
        self.score += points;
    }

    /// Notes judged so far, misses included.
    pub fn resolved(&self) -> u32 {
        self.perfect_hits + self.good_hits + self.ok_hits + self.missed_hits
    }

    /// Weighted hit ratio over resolved notes (Perfect 1.0, Good 0.75, OK 0.5).
    pub fn accuracy(&self) -> f64 {
        let resolved = self.resolved();
        if resolved == 0 {
            return 0.0;
        }
        let weighted = f64::from(self.perfect_hits)
            + 0.75 * f64::from(self.good_hits)
            + 0.5 * f64::from(self.ok_hits);
        weighted / f64::from(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_per_tier() {
        let mut stats = SessionStats::new(4);
        stats.record(Judgment::Perfect);
        stats.record(Judgment::Good);
        stats.record(Judgment::Ok);
        assert_eq!(stats.score, 225);
        assert_eq!(stats.combo, 3);

        stats.record(Judgment::Miss);
        assert_eq!(stats.score, 225);
        assert_eq!(stats.combo, 0);
        assert_eq!(stats.max_combo, 3);
        assert_eq!(stats.resolved(), 4);
    }

    #[test]
    fn combo_bonus_starts_after_ten() {
        let mut stats = SessionStats::new(12);
        for _ in 0..10 {
            stats.record(Judgment::Perfect);
        }
        assert_eq!(stats.score, 1000);

        stats.record(Judgment::Perfect);
        assert_eq!(stats.score, 1101);
        stats.record(Judgment::Perfect);
        assert_eq!(stats.score, 1202);
        assert_eq!(stats.max_combo, 12);
    }

    #[test]
    fn accuracy_weights_tiers() {
        let mut stats = SessionStats::new(4);
        assert_eq!(stats.accuracy(), 0.0);
        stats.record(Judgment::Perfect);
        stats.record(Judgment::Good);
        stats.record(Judgment::Ok);
        stats.record(Judgment::Miss);
        assert!((stats.accuracy() - 2.25 / 4.0).abs() < 1e-12);
    }
}
