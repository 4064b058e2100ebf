use std::{fmt, sync::Arc, thread, time::Duration};

use fretline_core::chart::SessionPlan;
use fretline_core::config::GameConfig;
use fretline_core::gameplay::{Game, GameState, SessionStats};
use fretline_core::input::events::LaneEvent;
use fretline_core::input::{InputQueue, InputTracker};
use fretline_core::time::{Conductor, ManualClock, SystemClock, TimeSource};
use log::{info, warn};
use serde::Serialize;

pub struct SimulateOptions {
    pub offset_seconds: f64,
    pub fps: u32,
    pub realtime: bool,
    pub audio: bool,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub stats: SessionStats,
    pub accuracy: f64,
    pub clock: f64,
    pub frames: u64,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "Score: {}", s.score)?;
        writeln!(f, "Max combo: {}", s.max_combo)?;
        writeln!(
            f,
            "Perfect: {}  Good: {}  OK: {}  Miss: {}  ({} of {} notes)",
            s.perfect_hits,
            s.good_hits,
            s.ok_hits,
            s.missed_hits,
            s.resolved(),
            s.total_notes
        )?;
        writeln!(f, "Accuracy: {:.1}%", self.accuracy * 100.0)?;
        writeln!(f, "Ended at {:.2}s after {} frames", self.clock, self.frames)
    }
}

/// Key edges an ideal player would produce, shifted by `offset`. Short notes
/// are tapped; sustained notes are held until their end.
fn autoplay_events(plan: &SessionPlan, config: &GameConfig, offset: f64) -> Vec<(f64, LaneEvent)> {
    let mut events = Vec::with_capacity(plan.notes.len() * 2);
    for note in &plan.notes {
        let press = note.start_time + offset;
        let release = if config.judge.is_sustained(note.duration) {
            note.start_time + note.duration + offset
        } else {
            press
        };
        events.push((press, LaneEvent { lane: note.lane, pressed: true }));
        events.push((release, LaneEvent { lane: note.lane, pressed: false }));
    }
    events.sort_by(|a, b| a.0.total_cmp(&b.0));
    events
}

#[cfg(feature = "audio")]
type AudioOutput = Option<fretline_core::audio::backend::AudioStream>;
#[cfg(not(feature = "audio"))]
type AudioOutput = ();

/// Opens the output device and hands the game its player. The returned
/// stream must outlive the session.
#[cfg(feature = "audio")]
fn open_audio(game: Game, config: &GameConfig, time: &Arc<dyn TimeSource>) -> (Game, AudioOutput) {
    use fretline_core::audio::{backend::AudioStream, SynthMixer};

    let (mixer, player) = SynthMixer::new(config.synth.clone(), Arc::clone(time));
    match AudioStream::new(mixer.into_shared()) {
        Ok(stream) => (game.with_audio(player), Some(stream)),
        Err(err) => {
            warn!("{err}; playing silently");
            (game, None)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_audio(game: Game, _config: &GameConfig, _time: &Arc<dyn TimeSource>) -> (Game, AudioOutput) {
    warn!("built without audio output; playing silently");
    (game, ())
}

pub fn run_simulation(
    plan: SessionPlan,
    config: &GameConfig,
    options: &SimulateOptions,
) -> anyhow::Result<SimulationReport> {
    let realtime = options.realtime || options.audio;
    if options.audio && !options.realtime {
        warn!("--audio follows the wall clock; running in realtime");
    }

    let manual = ManualClock::new();
    let time: Arc<dyn TimeSource> = if realtime {
        Arc::new(SystemClock::new())
    } else {
        Arc::new(manual.clone())
    };

    let events = autoplay_events(&plan, config, options.offset_seconds);
    let game = Game::new(plan, config, Arc::clone(&time));

    let (mut game, _audio) = if options.audio {
        open_audio(game, config, &time)
    } else {
        (game, Default::default())
    };

    let frame = 1.0 / f64::from(options.fps);
    let queue = InputQueue::new();
    let mut tracker = InputTracker::new();
    let mut player_clock = Conductor::new(time);
    let mut next_event = 0;
    let mut frames = 0u64;

    game.start();
    player_clock.start();
    info!(
        "autoplaying at {} fps with {:+.0} ms offset",
        options.fps,
        options.offset_seconds * 1000.0
    );

    while game.state() == GameState::Playing {
        if realtime {
            thread::sleep(Duration::from_secs_f64(frame));
        } else {
            manual.advance(frame);
        }

        let now = player_clock.time();
        while let Some(&(at, event)) = events.get(next_event) {
            if at > now {
                break;
            }
            queue.push(event);
            next_event += 1;
        }

        let input = tracker.next_frame(&queue);
        game.update(&input);
        frames += 1;
    }

    let stats = *game.stats();
    Ok(SimulationReport {
        accuracy: stats.accuracy(),
        stats,
        clock: game.clock(),
        frames,
    })
}
