use regex::Regex;
use std::fs;
use std::process::{Command, Output};

fn teapick(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_teapick"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

struct SessionRow {
    frames: usize,
    hands: usize,
    picks: u32,
}

/// Pulls the leading numeric columns of `name`'s row out of the summary table.
fn parse_row(stdout: &str, name: &str) -> Option<SessionRow> {
    let pattern = format!(
        r"\|\s*{}\s*\|\s*(\d+)\s*\|\s*(\d+)\s*\|\s*(\d+)\s*\|",
        regex::escape(name)
    );
    let ansi = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
    let plain = ansi.replace_all(stdout, "");
    let re = Regex::new(&pattern).unwrap();
    let caps = re.captures(&plain)?;
    Some(SessionRow {
        frames: caps[1].parse().ok()?,
        hands: caps[2].parse().ok()?,
        picks: caps[3].parse().ok()?,
    })
}

#[test]
fn test_cli_simulate_counts_cycles() {
    let output = teapick(&["simulate", "--cycles", "4", "--jitter", "0"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let row = parse_row(&stdout, "simulated").expect("summary row missing");
    assert_eq!(row.frames, 120);
    assert_eq!(row.hands, 120);
    assert_eq!(row.picks, 4);
    assert!(stdout.contains("First Pick"));
    assert!(!stdout.contains("Rising Picker"));
}

#[test]
fn test_cli_simulate_without_camera() {
    let output = teapick(&["simulate", "--no-camera", "--cycles", "2"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let row = parse_row(&stdout, "simulated").expect("summary row missing");
    assert_eq!(row.frames, 60);
    assert_eq!(row.hands, 0);
    assert_eq!(row.picks, 0);
    assert!(stdout.contains("no hand detected"));
}

#[test]
fn test_cli_rejects_invalid_thresholds() {
    let output = teapick(&["simulate", "--release-threshold", "0.01"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_flag_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analyzer.json");
    // Thresholds this tight never register the synthetic pinch.
    fs::write(&path, r#"{ "pinch_threshold": 0.001, "release_threshold": 0.002 }"#).unwrap();
    let config = path.to_str().unwrap();

    let output = teapick(&["simulate", "--cycles", "3", "--config-file", config]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(parse_row(&stdout, "simulated").unwrap().picks, 0);

    let output = teapick(&[
        "simulate",
        "--cycles",
        "3",
        "--config-file",
        config,
        "--pinch-threshold",
        "0.05",
        "--release-threshold",
        "0.08",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(parse_row(&stdout, "simulated").unwrap().picks, 3);
}

#[test]
fn test_cli_validates_after_merging_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analyzer.json");
    // Invalid on its own: the default release threshold sits below 0.09.
    fs::write(&path, r#"{ "pinch_threshold": 0.09 }"#).unwrap();
    let config = path.to_str().unwrap();

    let output = teapick(&["simulate", "--cycles", "1", "--config-file", config]);
    assert_eq!(output.status.code(), Some(1));

    let output = teapick(&[
        "simulate",
        "--cycles",
        "1",
        "--config-file",
        config,
        "--release-threshold",
        "0.12",
    ]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_cli_replay_reports_each_file() {
    let dir = tempfile::tempdir().unwrap();
    let hand: Vec<[f32; 3]> = (0..21)
        .map(|i| match i {
            4 => [0.5, 0.5, 0.0],
            8 => [0.5, 0.5, 0.0],
            12 => [0.25, 0.0, 0.0],
            16 => [0.0, 0.25, 0.0],
            20 => [0.15, 0.2, 0.0],
            _ => [0.0, 0.0, 0.0],
        })
        .collect();
    let frames = serde_json::json!([
        { "timestamp": 0.0, "hands": [{ "handedness": "Right", "landmarks": hand }] },
        { "timestamp": 0.1, "hands": [] }
    ]);

    let good = dir.path().join("morning.json");
    fs::write(&good, frames.to_string()).unwrap();
    let missing = dir.path().join("evening.json");

    let output = teapick(&[
        "replay",
        good.to_str().unwrap(),
        missing.to_str().unwrap(),
    ]);
    // One session replayed, one failed.
    assert_eq!(output.status.code(), Some(2));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let row = parse_row(&stdout, "morning").expect("summary row missing");
    assert_eq!(row.frames, 2);
    assert_eq!(row.hands, 1);
    assert_eq!(row.picks, 1);
    assert!(parse_row(&stdout, "evening").is_none());
}
