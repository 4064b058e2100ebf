use std::sync::Arc;

use fretline_chart::RawNote;
use log::info;

use super::{assign_lanes, Lane, LaneNote};
use crate::audio::AudioNote;
use crate::config::SessionConfig;

/// A note placed on the session timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedNote {
    pub pitch: u8,
    pub lane: Lane,
    pub start_time: f64,
    pub duration: f64,
}

/// Everything both engines need for one session.
///
/// `notes` seeds the gameplay notes and `audio_notes` feeds the synthesizer.
/// The two lists hold the same notes in the same order but share no storage;
/// the audio list is immutable once built.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub notes: Vec<TimedNote>,
    pub audio_notes: Arc<[AudioNote]>,
    /// Always the configured session length, however long the content is.
    pub session_length: f64,
}

impl SessionPlan {
    /// Shifts notes so the earliest starts after the lead-in, drops notes that
    /// start after the session ends and clips the rest to the session end.
    pub fn build(notes: &[LaneNote], config: &SessionConfig) -> Self {
        let session_length = config.session_length_seconds;
        let earliest = notes
            .iter()
            .map(|n| n.note.start_time)
            .fold(f64::INFINITY, f64::min);

        let mut timed = Vec::with_capacity(notes.len());
        for n in notes {
            let start_time = n.note.start_time - earliest + config.lead_in_seconds;
            if start_time > session_length {
                continue;
            }
            let duration = if start_time + n.note.duration > session_length {
                session_length - start_time
            } else {
                n.note.duration
            };
            timed.push(TimedNote {
                pitch: n.note.pitch,
                lane: n.lane,
                start_time,
                duration,
            });
        }

        let audio_notes: Arc<[AudioNote]> = timed
            .iter()
            .map(|n| AudioNote {
                pitch: n.pitch,
                lane: n.lane,
                start_time: n.start_time,
                duration: n.duration,
            })
            .collect();

        Self {
            notes: timed,
            audio_notes,
            session_length,
        }
    }

    pub fn total_notes(&self) -> usize {
        self.notes.len()
    }
}

/// Parser output to session plan: pitch filter, lane assignment, timeline.
pub fn prepare_session(raw: &[RawNote], config: &SessionConfig) -> SessionPlan {
    let mapped = assign_lanes(raw, config.pitch_range);
    let plan = SessionPlan::build(&mapped, config);
    info!(
        "prepared {} of {} notes for a {:.1}s session",
        plan.total_notes(),
        raw.len(),
        plan.session_length
    );
    plan
}
