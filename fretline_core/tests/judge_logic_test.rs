use std::sync::Arc;

use fretline_chart::RawNote;
use fretline_core::chart::{prepare_session, Lane};
use fretline_core::config::GameConfig;
use fretline_core::gameplay::{Game, JudgeWindows, Judgment};
use fretline_core::input::events::FrameInput;
use fretline_core::time::ManualClock;

fn raw(pitch: u8, start_time: f64, duration: f64) -> RawNote {
    RawNote {
        pitch,
        velocity: 100,
        start_time,
        duration,
    }
}

/// Game over `notes` with the first note landing at 2.0s, started at clock 0.
fn started_game(notes: &[RawNote]) -> (Game, ManualClock) {
    let config = GameConfig::default();
    let plan = prepare_session(notes, &config.session);
    let clock = ManualClock::new();
    let mut game = Game::new(plan, &config, Arc::new(clock.clone()));
    game.start();
    (game, clock)
}

#[test]
fn test_judgment_thresholds() {
    let windows = JudgeWindows::default();
    assert_eq!(windows.judge(0.0), Judgment::Perfect);
    assert_eq!(windows.judge(0.04), Judgment::Perfect);
    assert_eq!(windows.judge(-0.04), Judgment::Perfect);
    assert_eq!(windows.judge(0.09), Judgment::Good);
    assert_eq!(windows.judge(-0.09), Judgment::Good);
    assert_eq!(windows.judge(0.14), Judgment::Ok);
    assert_eq!(windows.judge(0.20), Judgment::Miss);
    assert_eq!(windows.judge(-1.0), Judgment::Miss);
}

#[test]
fn test_judgment_window_edges_are_inclusive() {
    let windows = JudgeWindows::default();
    assert_eq!(windows.judge(0.05), Judgment::Perfect);
    assert_eq!(windows.judge(0.051), Judgment::Good);
    assert_eq!(windows.judge(0.10), Judgment::Good);
    assert_eq!(windows.judge(0.15), Judgment::Ok);
    assert_eq!(windows.judge(0.151), Judgment::Miss);
}

#[test]
fn test_sustain_classification() {
    let windows = JudgeWindows::default();
    assert!(!windows.is_sustained(0.3));
    assert!(windows.is_sustained(0.31));
}

#[test]
fn test_press_scores_by_offset() {
    let (mut game, clock) = started_game(&[raw(50, 0.0, 0.2), raw(50, 1.0, 0.2), raw(50, 2.0, 0.2)]);

    clock.set(2.08);
    game.update(&FrameInput::idle().press(Lane::A));
    clock.set(2.5);
    game.update(&FrameInput::idle().release(Lane::A));
    clock.set(2.88);
    game.update(&FrameInput::idle().press(Lane::A));

    let notes = game.notes();
    assert_eq!(notes[0].judgment, Judgment::Good);
    assert_eq!(notes[1].judgment, Judgment::Ok);
    assert!(!notes[2].hit);
    assert_eq!(game.stats().score, 125);
}

#[test]
fn test_press_outside_window_leaves_note_untouched() {
    let (mut game, clock) = started_game(&[raw(50, 0.0, 0.2)]);

    clock.set(1.5);
    game.update(&FrameInput::idle().press(Lane::A));

    let note = &game.notes()[0];
    assert!(!note.hit);
    assert!(note.active);
    assert_eq!(game.stats().resolved(), 0);

    clock.set(2.0);
    game.update(&FrameInput::idle().release(Lane::A).press(Lane::A));
    assert_eq!(game.notes()[0].judgment, Judgment::Perfect);
}

#[test]
fn test_late_press_inside_capture_is_ignored_then_swept() {
    let (mut game, clock) = started_game(&[raw(50, 0.0, 0.2)]);

    clock.set(2.19);
    game.update(&FrameInput::idle().press(Lane::A));
    assert!(!game.notes()[0].hit);

    clock.set(2.21);
    game.update(&FrameInput::idle().hold(Lane::A));
    assert!(game.notes()[0].hit);
    assert_eq!(game.notes()[0].judgment, Judgment::Miss);
    assert_eq!(game.stats().missed_hits, 1);
}

#[test]
fn test_press_only_judges_its_own_lane() {
    let (mut game, clock) = started_game(&[raw(50, 0.0, 0.2), raw(80, 0.0, 0.2)]);

    clock.set(2.0);
    game.update(&FrameInput::idle().press(Lane::D));

    assert!(!game.notes()[0].hit);
    assert!(game.notes()[1].hit);
    assert_eq!(game.notes()[1].lane, Lane::D);
}

#[test]
fn test_press_picks_smallest_signed_distance() {
    let (mut game, clock) = started_game(&[raw(50, 0.0, 0.2), raw(50, 0.1, 0.2)]);

    clock.set(2.05);
    game.update(&FrameInput::idle().press(Lane::A));

    assert!(game.notes()[0].hit);
    assert!(!game.notes()[1].hit);
}

#[test]
fn test_press_on_held_lane_skips_pressed_note() {
    let (mut game, clock) = started_game(&[raw(50, 0.0, 1.0)]);

    clock.set(2.0);
    game.update(&FrameInput::idle().press(Lane::A));
    assert!(game.notes()[0].being_held);

    clock.set(2.1);
    game.update(&FrameInput::idle().press(Lane::A));

    let note = &game.notes()[0];
    assert!(note.being_held);
    assert!(!note.hit);
    assert_eq!(note.judgment, Judgment::Perfect);
    assert_eq!(game.stats().resolved(), 0);
}
