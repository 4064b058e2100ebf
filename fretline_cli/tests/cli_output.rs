use std::{
    env, fs,
    path::PathBuf,
    process::{Command, Output},
};

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

fn temp_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("fretline_cli_{}_{}", std::process::id(), name))
}

/// Format 0, one track, 480 ticks per beat at the default 120 BPM:
/// pitch 50 at 0.0s and pitch 80 at 0.5s, each lasting 0.25s.
fn two_note_chart() -> Vec<u8> {
    let track: &[u8] = &[
        0x00, 0x90, 50, 100, //
        0x81, 0x70, 0x80, 50, 0, //
        0x81, 0x70, 0x90, 80, 100, //
        0x81, 0x70, 0x80, 80, 0, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&480u16.to_be_bytes());
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
    bytes.extend_from_slice(track);
    bytes
}

fn write_chart(name: &str, bytes: &[u8]) -> PathBuf {
    let path = temp_path(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fretline"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

#[test]
fn inspect_prints_summary() {
    let chart = write_chart("inspect.mid", &two_note_chart());
    let output = run(&["inspect", chart.to_str().unwrap()]);
    let _ = fs::remove_file(&chart);

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("Total notes: 2"));
    assert!(stdout.contains("Earliest note: 0.00s"));
    assert!(stdout.contains("Latest note: 0.50s"));
    assert!(stdout.contains("Lane W: no notes"));
}

#[test]
fn inspect_undecodable_chart_falls_back() {
    let chart = write_chart("garbage.mid", b"RIFF this is not a chart");
    let output = run(&["inspect", chart.to_str().unwrap()]);
    let _ = fs::remove_file(&chart);

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("Chart could not be decoded (M1001"));
    assert!(stdout.contains("Total notes: 5"));
}

#[test]
fn missing_chart_is_fatal() {
    let missing = temp_path("missing.mid");
    let _ = fs::remove_file(&missing);

    let output = run(&["simulate", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: failed to load chart: "));
    assert!(stderr.contains("Caused by:"));
    assert!(stderr.contains("M3001: chart file not found"));
}

#[test]
fn dump_writes_notes_with_lanes() {
    let chart = write_chart("dump.mid", &two_note_chart());
    let out = temp_path("dump.json");
    let output = run(&["dump", chart.to_str().unwrap(), "-o", out.to_str().unwrap()]);
    let _ = fs::remove_file(&chart);

    assert!(output.status.success());
    let json = fs::read_to_string(&out).unwrap();
    let _ = fs::remove_file(&out);
    let notes: serde_json::Value = serde_json::from_str(&json).unwrap();
    let notes = notes.as_array().unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["pitch"], 50);
    assert_eq!(notes[0]["lane"], "A");
    assert_eq!(notes[0]["duration"], 0.25);
    assert_eq!(notes[1]["pitch"], 80);
    assert_eq!(notes[1]["lane"], "D");
    assert_eq!(notes[1]["start_time"], 0.5);
}

#[test]
fn simulate_autoplay_hits_everything() {
    let chart = write_chart("simulate.mid", &two_note_chart());
    let output = run(&["simulate", chart.to_str().unwrap(), "--json"]);
    let _ = fs::remove_file(&chart);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stats"]["score"], 200);
    assert_eq!(report["stats"]["perfect_hits"], 2);
    assert_eq!(report["stats"]["missed_hits"], 0);
    assert_eq!(report["stats"]["max_combo"], 2);
    assert_eq!(report["accuracy"], 1.0);
    assert!(report["clock"].as_f64().unwrap() < 3.0);
}

#[test]
fn simulate_late_autoplay_misses() {
    let chart = write_chart("late.mid", &two_note_chart());
    let output = run(&["simulate", chart.to_str().unwrap(), "--json", "--offset-ms", "400"]);
    let _ = fs::remove_file(&chart);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stats"]["score"], 0);
    assert_eq!(report["stats"]["missed_hits"], 2);
}

#[test]
fn render_writes_float_wav() {
    let chart = write_chart("render.mid", &two_note_chart());
    let out = temp_path("render.wav");
    let output = run(&["render", chart.to_str().unwrap(), "-o", out.to_str().unwrap()]);
    let _ = fs::remove_file(&chart);

    assert!(output.status.success());
    let bytes = fs::read(&out).unwrap();
    let _ = fs::remove_file(&out);
    assert_eq!(&bytes[..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    assert!(bytes.len() >= 30 * 44_100 * 2 * 4);
}
