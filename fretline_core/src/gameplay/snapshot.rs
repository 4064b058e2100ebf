use serde::Serialize;

use super::judge::Judgment;
use super::score::SessionStats;
use super::session::{Game, GameState};
use crate::chart::{Lane, LANE_COUNT};

/// Read-only picture of one frame for whatever draws the game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub state: GameState,
    pub clock: f64,
    pub session_length: f64,
    /// Fraction of the session elapsed, 0..=1.
    pub progress: f64,
    pub time_remaining: f64,
    pub notes: Vec<NoteView>,
    pub stats: SessionStats,
    pub lanes_pressed: [bool; LANE_COUNT],
    pub audio_playing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteView {
    pub index: usize,
    pub lane: Lane,
    pub screen_y: f32,
    /// Length of the hold trail above the head, 0 for short notes.
    pub tail_length: f32,
    pub sustained: bool,
    pub hit: bool,
    pub judgment: Judgment,
    pub pressed: bool,
    pub being_held: bool,
    pub sustain_progress: f64,
}

impl Game {
    pub fn snapshot(&self) -> GameSnapshot {
        let judge = self.judge_windows();
        let playfield = self.playfield();
        let notes = self
            .notes()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.active)
            .map(|(index, n)| {
                let sustained = judge.is_sustained(n.duration);
                NoteView {
                    index,
                    lane: n.lane,
                    screen_y: n.screen_y,
                    tail_length: if sustained {
                        playfield.tail_length(n.duration)
                    } else {
                        0.0
                    },
                    sustained,
                    hit: n.hit,
                    judgment: n.judgment,
                    pressed: n.pressed,
                    being_held: n.being_held,
                    sustain_progress: n.sustain_progress,
                }
            })
            .collect();

        let session_length = self.session_length();
        let clock = self.clock();
        let progress = if session_length > 0.0 {
            (clock / session_length).clamp(0.0, 1.0)
        } else {
            1.0
        };

        GameSnapshot {
            state: self.state(),
            clock,
            session_length,
            progress,
            time_remaining: (session_length - clock).max(0.0),
            notes,
            stats: *self.stats(),
            lanes_pressed: self.lanes_pressed(),
            audio_playing: self.audio_playing(),
        }
    }
}
