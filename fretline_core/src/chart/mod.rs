//! Lane assignment, chart loading and session preparation.

mod adapter;
mod summary;

use std::path::Path;

use fretline_chart::{ChartError, RawNote};
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub use adapter::{prepare_session, SessionPlan, TimedNote};
pub use summary::ChartSummary;

pub const LANE_COUNT: usize = 3;

/// Highest pitch of the low lane is one below this.
pub const MID_LANE_LOW_PITCH: u8 = 60;
/// Highest pitch still routed to the middle lane.
pub const MID_LANE_HIGH_PITCH: u8 = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    A,
    W,
    D,
}

impl Lane {
    pub const ALL: [Lane; LANE_COUNT] = [Lane::A, Lane::W, Lane::D];

    pub fn index(self) -> usize {
        match self {
            Lane::A => 0,
            Lane::W => 1,
            Lane::D => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn for_pitch(pitch: u8) -> Self {
        if pitch < MID_LANE_LOW_PITCH {
            Lane::A
        } else if pitch <= MID_LANE_HIGH_PITCH {
            Lane::W
        } else {
            Lane::D
        }
    }

    pub fn key_label(self) -> &'static str {
        match self {
            Lane::A => "A",
            Lane::W => "W",
            Lane::D => "D",
        }
    }
}

/// Inclusive pitch window; notes outside it are dropped before lane assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchRange {
    pub low: u8,
    pub high: u8,
}

impl PitchRange {
    /// Roughly the range of a six-string guitar.
    pub const GUITAR: PitchRange = PitchRange { low: 40, high: 84 };

    pub fn contains(&self, pitch: u8) -> bool {
        (self.low..=self.high).contains(&pitch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneNote {
    #[serde(flatten)]
    pub note: RawNote,
    pub lane: Lane,
}

pub fn assign_lanes(notes: &[RawNote], range: Option<PitchRange>) -> Vec<LaneNote> {
    notes
        .iter()
        .filter(|n| range.map_or(true, |r| r.contains(n.pitch)))
        .map(|&note| LaneNote {
            note,
            lane: Lane::for_pitch(note.pitch),
        })
        .collect()
}

/// Built-in notes used when a chart cannot be decoded. One per lane, then a
/// sustained note and a closing tap.
pub fn demo_notes() -> Vec<RawNote> {
    let note = |pitch, velocity, start_time, duration| RawNote {
        pitch,
        velocity,
        start_time,
        duration,
    };
    vec![
        note(52, 80, 1.0, 0.5),
        note(67, 85, 1.5, 0.5),
        note(76, 90, 2.0, 0.5),
        note(52, 80, 2.5, 1.0),
        note(69, 85, 3.0, 0.5),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSource {
    File,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedChart {
    pub notes: Vec<RawNote>,
    pub source: ChartSource,
}

impl LoadedChart {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ChartSource::Fallback { .. })
    }
}

/// Loads a chart file. A missing or unreadable file is an error; a file that
/// cannot be decoded is replaced by [`demo_notes`].
pub fn load_chart(path: impl AsRef<Path>) -> Result<LoadedChart, ChartError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ChartError::missing_file(path.display().to_string()));
    }

    match fretline_chart::parse_file(path) {
        Ok(chart) => {
            info!(
                "loaded {} notes from {} ({} tracks)",
                chart.notes.len(),
                path.display(),
                chart.tracks_parsed
            );
            Ok(LoadedChart {
                notes: chart.notes,
                source: ChartSource::File,
            })
        }
        Err(e) if !e.is_format_error() => Err(e),
        Err(e) => {
            warn!("failed to parse {}, using demonstration notes: {e}", path.display());
            Ok(LoadedChart {
                notes: demo_notes(),
                source: ChartSource::Fallback {
                    reason: e.to_string(),
                },
            })
        }
    }
}

/// Same as [`load_chart`] for bytes already in memory; never fails.
pub fn load_chart_bytes(bytes: &[u8]) -> LoadedChart {
    match fretline_chart::parse(bytes) {
        Ok(notes) => LoadedChart {
            notes,
            source: ChartSource::File,
        },
        Err(e) => {
            warn!("failed to parse chart, using demonstration notes: {e}");
            LoadedChart {
                notes: demo_notes(),
                source: ChartSource::Fallback {
                    reason: e.to_string(),
                },
            }
        }
    }
}
