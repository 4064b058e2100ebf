use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use super::judge::{JudgeWindows, Judgment};
use super::score::SessionStats;
use crate::audio::mixer::AudioPlayer;
use crate::chart::{Lane, SessionPlan, TimedNote, LANE_COUNT};
use crate::config::{GameConfig, PlayfieldConfig};
use crate::input::events::FrameInput;
use crate::time::{Conductor, TimeSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    Menu,
    Playing,
    GameOver,
}

/// Gameplay state of one note. Never removed during a session; `active`
/// only says whether it still scrolls and can be interacted with.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionNote {
    pub start_time: f64,
    pub duration: f64,
    pub lane: Lane,
    pub pitch: u8,
    pub screen_y: f32,
    pub active: bool,
    /// Resolved. Set exactly once, after which `judgment` is final.
    pub hit: bool,
    pub judgment: Judgment,
    pub pressed: bool,
    pub press_start_time: f64,
    pub being_held: bool,
    pub sustain_progress: f64,
}

impl SessionNote {
    fn new(note: &TimedNote, playfield: &PlayfieldConfig) -> Self {
        Self {
            start_time: note.start_time,
            duration: note.duration,
            lane: note.lane,
            pitch: note.pitch,
            screen_y: playfield.screen_y(note.start_time, 0.0),
            active: true,
            hit: false,
            judgment: Judgment::Miss,
            pressed: false,
            press_start_time: 0.0,
            being_held: false,
            sustain_progress: 0.0,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// The gameplay engine: owns the session notes and statistics and advances
/// them once per frame from its own clock and the frame's lane flags.
pub struct Game {
    plan: SessionPlan,
    judge: JudgeWindows,
    playfield: PlayfieldConfig,
    conductor: Conductor,
    state: GameState,
    clock: f64,
    notes: Vec<SessionNote>,
    stats: SessionStats,
    lanes_pressed: [bool; LANE_COUNT],
    audio: Option<AudioPlayer>,
}

impl Game {
    pub fn new(plan: SessionPlan, config: &GameConfig, time: Arc<dyn TimeSource>) -> Self {
        let stats = SessionStats::new(plan.total_notes() as u32);
        Self {
            plan,
            judge: config.judge,
            playfield: config.playfield.clone(),
            conductor: Conductor::new(time),
            state: GameState::Menu,
            clock: 0.0,
            notes: Vec::new(),
            stats,
            lanes_pressed: [false; LANE_COUNT],
            audio: None,
        }
    }

    /// Attaches the audio engine's handle. Without one the game plays silently.
    pub fn with_audio(mut self, player: AudioPlayer) -> Self {
        self.audio = Some(player);
        self
    }

    /// Starts a fresh session from the plan. Allowed from any state.
    pub fn start(&mut self) {
        self.notes = self
            .plan
            .notes
            .iter()
            .map(|n| SessionNote::new(n, &self.playfield))
            .collect();
        self.stats = SessionStats::new(self.notes.len() as u32);
        self.lanes_pressed = [false; LANE_COUNT];
        self.clock = 0.0;
        self.conductor.start();
        self.state = GameState::Playing;

        if let Some(audio) = self.audio.as_mut() {
            audio.stop();
            if let Err(err) = audio.start(Arc::clone(&self.plan.audio_notes)) {
                warn!("audio unavailable, playing silently: {err}");
            }
        }
        info!(
            "session started: {} notes, {:.1}s",
            self.notes.len(),
            self.plan.session_length
        );
    }

    pub fn end(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.state = GameState::GameOver;
        if let Some(audio) = self.audio.as_mut() {
            audio.stop();
        }
        info!(
            "session over: score {} max combo {} ({} perfect, {} good, {} ok, {} missed)",
            self.stats.score,
            self.stats.max_combo,
            self.stats.perfect_hits,
            self.stats.good_hits,
            self.stats.ok_hits,
            self.stats.missed_hits
        );
    }

    pub fn return_to_menu(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            audio.stop();
        }
        self.conductor.stop();
        self.clock = 0.0;
        self.state = GameState::Menu;
    }

    /// Advances one frame. Does nothing outside `Playing`.
    pub fn update(&mut self, input: &FrameInput) {
        if self.state != GameState::Playing {
            return;
        }

        let now = self.conductor.time();
        self.clock = now;
        if now > self.plan.session_length {
            self.end();
            return;
        }

        for lane in Lane::ALL {
            let flags = input.lane(lane);
            self.lanes_pressed[lane.index()] = flags.held;
            if flags.just_pressed {
                self.handle_press(lane, now);
            }
            if flags.just_released {
                self.handle_release(lane, now);
            }
        }

        self.update_sustains(input, now);
        self.sweep_misses(now);
        self.update_positions(now);

        if self.stats.resolved() as usize >= self.notes.len() {
            self.end();
        }
    }

    fn handle_press(&mut self, lane: Lane, now: f64) {
        let late_capture = self.judge.late_capture;
        let mut closest: Option<(usize, f64)> = None;
        for (i, note) in self.notes.iter().enumerate() {
            if !note.active || note.hit || note.pressed || note.lane != lane {
                continue;
            }
            let distance = note.start_time - now;
            if distance <= -late_capture {
                continue;
            }
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((i, distance));
            }
        }
        let Some((index, _)) = closest else {
            return;
        };

        let judgment = self.judge.judge(now - self.notes[index].start_time);
        if judgment == Judgment::Miss {
            return;
        }

        if self.judge.is_sustained(self.notes[index].duration) {
            let note = &mut self.notes[index];
            note.pressed = true;
            note.being_held = true;
            note.judgment = judgment;
            note.press_start_time = now;
            debug!("hold started on {lane:?} note {index}: {}", judgment.label());
        } else {
            self.resolve(index, judgment);
        }
    }

    fn handle_release(&mut self, lane: Lane, now: f64) {
        let Some(index) = self
            .notes
            .iter()
            .position(|n| n.active && n.pressed && !n.hit && n.lane == lane)
        else {
            return;
        };

        let note = &self.notes[index];
        let release = self.judge.judge(now - note.end_time());
        let judgment = if release == Judgment::Miss {
            note.judgment.downgraded()
        } else {
            note.judgment
        };
        let bonus = self.judge.sustain_bonus(note.sustain_progress);
        if self.resolve(index, judgment) {
            self.stats.add_bonus(bonus);
        }
    }

    fn update_sustains(&mut self, input: &FrameInput, now: f64) {
        for index in 0..self.notes.len() {
            let note = &mut self.notes[index];
            if !note.being_held || note.hit {
                continue;
            }

            if input.lane(note.lane).held {
                note.sustain_progress = ((now - note.start_time) / note.duration).clamp(0.0, 1.0);
                if now >= note.end_time() {
                    let judgment = note.judgment;
                    let bonus = self.judge.sustain_bonus(note.sustain_progress);
                    if self.resolve(index, judgment) {
                        self.stats.add_bonus(bonus);
                    }
                }
            } else {
                self.resolve(index, Judgment::Miss);
            }
        }
    }

    fn sweep_misses(&mut self, now: f64) {
        let grace = self.judge.late_capture;
        for index in 0..self.notes.len() {
            let note = &self.notes[index];
            if note.active && !note.hit && !note.pressed && now > note.start_time + grace {
                self.resolve(index, Judgment::Miss);
            }
        }
    }

    fn update_positions(&mut self, now: f64) {
        let bottom = self.playfield.visible_bottom();
        for note in self.notes.iter_mut().filter(|n| n.active) {
            note.screen_y = self.playfield.screen_y(note.start_time, now);
            if note.screen_y - self.playfield.tail_length(note.duration) > bottom {
                note.active = false;
            }
        }
    }

    /// Freezes a note's judgment and scores it. Returns false if the note was
    /// already resolved.
    fn resolve(&mut self, index: usize, judgment: Judgment) -> bool {
        let note = &mut self.notes[index];
        if note.hit {
            return false;
        }
        note.hit = true;
        note.active = false;
        note.pressed = false;
        note.being_held = false;
        note.judgment = judgment;
        self.stats.record(judgment);
        debug!(
            "note {index} on {:?} judged {} (combo {})",
            note.lane,
            judgment.label(),
            self.stats.combo
        );
        true
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Session time as of the last update.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn session_length(&self) -> f64 {
        self.plan.session_length
    }

    pub fn notes(&self) -> &[SessionNote] {
        &self.notes
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn lanes_pressed(&self) -> [bool; LANE_COUNT] {
        self.lanes_pressed
    }

    pub fn audio_playing(&self) -> bool {
        self.audio.as_ref().is_some_and(AudioPlayer::is_playing)
    }

    pub fn judge_windows(&self) -> &JudgeWindows {
        &self.judge
    }

    pub fn playfield(&self) -> &PlayfieldConfig {
        &self.playfield
    }
}
