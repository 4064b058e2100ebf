use std::fmt;

use serde::Serialize;

use super::{Lane, LaneNote, LANE_COUNT};

const FIRST_NOTES_SHOWN: usize = 10;
const FIRST_MINUTE: f64 = 60.0;

/// Quick look at a chart's timing before it is played.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    pub total_notes: usize,
    pub earliest_start: Option<f64>,
    pub latest_start: Option<f64>,
    pub notes_in_first_minute: usize,
    pub first_start_per_lane: [Option<f64>; LANE_COUNT],
    pub first_notes: Vec<LaneNote>,
}

impl ChartSummary {
    pub fn from_notes(notes: &[LaneNote]) -> Self {
        let mut sorted = notes.to_vec();
        sorted.sort_by(|a, b| a.note.start_time.total_cmp(&b.note.start_time));

        let mut first_start_per_lane = [None; LANE_COUNT];
        for n in &sorted {
            let slot = &mut first_start_per_lane[n.lane.index()];
            if slot.is_none() {
                *slot = Some(n.note.start_time);
            }
        }

        Self {
            total_notes: sorted.len(),
            earliest_start: sorted.first().map(|n| n.note.start_time),
            latest_start: sorted.last().map(|n| n.note.start_time),
            notes_in_first_minute: sorted
                .iter()
                .take_while(|n| n.note.start_time <= FIRST_MINUTE)
                .count(),
            first_start_per_lane,
            first_notes: sorted.into_iter().take(FIRST_NOTES_SHOWN).collect(),
        }
    }
}

impl fmt::Display for ChartSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total notes: {}", self.total_notes)?;
        if self.total_notes == 0 {
            return Ok(());
        }

        writeln!(f, "First {} notes:", self.first_notes.len())?;
        for (i, n) in self.first_notes.iter().enumerate() {
            writeln!(
                f,
                "  {:2}. start {:7.2}s  duration {:5.2}s  pitch {:3}  lane {}",
                i + 1,
                n.note.start_time,
                n.note.duration,
                n.note.pitch,
                n.lane.key_label()
            )?;
        }

        if let (Some(earliest), Some(latest)) = (self.earliest_start, self.latest_start) {
            writeln!(f, "Earliest note: {earliest:.2}s")?;
            writeln!(f, "Latest note: {latest:.2}s")?;
        }
        writeln!(f, "Notes in first 60 seconds: {}", self.notes_in_first_minute)?;

        writeln!(f, "First note per lane:")?;
        for lane in Lane::ALL {
            match self.first_start_per_lane[lane.index()] {
                Some(start) => writeln!(f, "  Lane {}: {start:.2}s", lane.key_label())?,
                None => writeln!(f, "  Lane {}: no notes", lane.key_label())?,
            }
        }
        Ok(())
    }
}
