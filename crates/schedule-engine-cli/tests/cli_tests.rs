//! Integration tests for the `schedule2cal` CLI binary.
//!
//! These run the built binary through `assert_cmd`, covering stdin/stdout
//! piping, file I/O, configuration sources, text previews and validation.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const NOW: &str = "2025-09-24T18:00:00Z";

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn schedule2cal() -> Command {
    let mut cmd = Command::cargo_bin("schedule2cal").unwrap();
    // Keep the user's environment from leaking into the engine config.
    for var in [
        "SCHEDULE2CAL_TIMEZONE",
        "SCHEDULE2CAL_REFERENCE_YEAR",
        "SCHEDULE2CAL_EXAM_DURATION_MINUTES",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn parse_json(stdout: &[u8]) -> Vec<Value> {
    serde_json::from_slice(stdout).expect("stdout must be a JSON array")
}

// ─────────────────────────────────────────────────────────────────────────────
// parse
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn parse_stdin_to_stdout() {
    let input = "CS 101 - Intro\nMWF 10:00 - 10:50 AM KEMPER 2110\nFinal Exam: Mon. Dec.15 at 8:00am\n";
    let output = schedule2cal()
        .args(["parse", "--now", NOW])
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let events = parse_json(&output);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["summary"], "CS 101 - Intro Lecture");
    assert_eq!(events[0]["start"]["dateTime"], "2025-09-24T10:00:00-07:00");
    assert_eq!(
        events[0]["recurrence"][0],
        "RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20251212T235959Z"
    );
    assert_eq!(events[1]["summary"], "CS 101 - Intro Final Exam");
    assert_eq!(events[1]["end"]["dateTime"], "2025-12-15T10:00:00-08:00");
}

#[test]
fn parse_file_to_file() {
    let output_path = std::env::temp_dir().join("schedule2cal-test-parse-output.json");
    let _ = std::fs::remove_file(&output_path);

    schedule2cal()
        .args(["parse", "-i", &fixture("schedule.txt"), "--now", NOW, "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let events = parse_json(content.as_bytes());
    let summaries: Vec<&str> = events
        .iter()
        .map(|e| e["summary"].as_str().unwrap())
        .collect();
    assert_eq!(
        summaries,
        vec![
            "CS 101 - Intro Lecture",
            "CS 101 - Intro Final Exam",
            "ECS 036A - Software Development Lecture",
            "ECS 036A - Software Development Discussion",
            "ECS 036A - Software Development Final Exam",
        ]
    );
    assert_eq!(events[4]["location"], "WELLMAN 2");

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn parse_text_preview() {
    schedule2cal()
        .args([
            "parse",
            "-i",
            &fixture("schedule.txt"),
            "--now",
            NOW,
            "--format",
            "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("CS 101 - Intro Lecture"))
        .stdout(predicate::str::contains("Location: KEMPER 2110"))
        .stdout(predicate::str::contains(
            "Starts:   September 24, 2025 at 10:00 AM",
        ))
        .stdout(predicate::str::contains(
            "Repeats:  Weekly on Mon, Wed, Fri until Dec 12, 2025 (35 sessions)",
        ))
        .stdout(predicate::str::contains("Starts:   December 15, 2025 at 8:00 AM"))
        .stdout(predicate::str::contains("already ended").not());
}

#[test]
fn preview_marks_past_events() {
    schedule2cal()
        .args([
            "parse",
            "-i",
            &fixture("schedule.txt"),
            "--now",
            "2026-01-05T18:00:00Z",
            "--format",
            "text",
        ])
        .env("SCHEDULE2CAL_REFERENCE_YEAR", "2025")
        .assert()
        .success()
        .stdout(predicate::str::contains("(already ended)"));
}

#[test]
fn parse_with_config_file() {
    let output = schedule2cal()
        .args([
            "parse",
            "-i",
            &fixture("schedule.txt"),
            "--now",
            NOW,
            "--config",
            &fixture("new_york.toml"),
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let events = parse_json(&output);
    assert_eq!(events[0]["start"]["timeZone"], "America/New_York");
    // Three-hour finals from the config file.
    assert_eq!(events[1]["start"]["dateTime"], "2025-12-15T08:00:00-05:00");
    assert_eq!(events[1]["end"]["dateTime"], "2025-12-15T11:00:00-05:00");
}

#[test]
fn environment_overrides_config_file() {
    let output = schedule2cal()
        .args([
            "parse",
            "-i",
            &fixture("schedule.txt"),
            "--now",
            NOW,
            "--config",
            &fixture("new_york.toml"),
        ])
        .env("SCHEDULE2CAL_EXAM_DURATION_MINUTES", "90")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let events = parse_json(&output);
    assert_eq!(events[1]["end"]["dateTime"], "2025-12-15T09:30:00-05:00");
}

#[test]
fn missing_config_file_is_an_error() {
    schedule2cal()
        .args([
            "parse",
            "-i",
            &fixture("schedule.txt"),
            "--config",
            "/nonexistent/schedule2cal.toml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn parse_rejects_disallowed_characters() {
    schedule2cal()
        .args(["parse", "--now", NOW])
        .write_stdin("CS 101 - Intro <script>\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse schedule"));
}

#[test]
fn parse_rejects_empty_input() {
    schedule2cal()
        .args(["parse", "--now", NOW])
        .write_stdin("   \n")
        .assert()
        .failure();
}

#[test]
fn parse_rejects_bad_now() {
    schedule2cal()
        .args(["parse", "--now", "yesterday"])
        .write_stdin("CS 101 - Intro\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("RFC 3339"));
}

#[test]
fn parse_fails_on_missing_meridiem() {
    schedule2cal()
        .args(["parse", "--now", NOW])
        .write_stdin("CS 101 - Intro\nMWF 10:00 - 10:50 KEMPER 2110\n")
        .assert()
        .failure();
}

#[test]
fn parse_nonexistent_input_file() {
    schedule2cal()
        .args(["parse", "-i", "/nonexistent/schedule.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// validate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_reports_ongoing_events() {
    schedule2cal()
        .args(["validate", "-i", &fixture("events.json"), "--now", NOW])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok       #1 CS 101 - Intro Lecture (ongoing)"))
        .stdout(predicate::str::contains(
            "ok       #2 CS 101 - Intro Final Exam (ongoing)",
        ));
}

#[test]
fn validate_reports_ended_events() {
    schedule2cal()
        .args([
            "validate",
            "-i",
            &fixture("events.json"),
            "--now",
            "2025-12-14T00:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 CS 101 - Intro Lecture (ended)"))
        .stdout(predicate::str::contains("#2 CS 101 - Intro Final Exam (ongoing)"));
}

#[test]
fn validate_fails_on_structural_errors() {
    schedule2cal()
        .args(["validate", "-i", &fixture("broken_events.json"), "--now", NOW])
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid  #1"))
        .stdout(predicate::str::contains("location"))
        .stdout(predicate::str::contains("ok       #2"))
        .stderr(predicate::str::contains("1 of 2 events failed validation"));
}

#[test]
fn validate_accepts_parse_output() {
    let output = schedule2cal()
        .args(["parse", "-i", &fixture("schedule.txt"), "--now", NOW])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    schedule2cal()
        .args(["validate", "--now", NOW])
        .write_stdin(output)
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid").not());
}

#[test]
fn validate_rejects_non_json() {
    schedule2cal()
        .arg("validate")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    schedule2cal()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn logs_go_to_stderr() {
    let output = schedule2cal()
        .args(["--log-level", "info", "parse", "--now", NOW])
        .write_stdin("CS 101 - Intro\nMWF 10:00 - 10:50 AM KEMPER 2110\n")
        .assert()
        .success()
        .get_output()
        .clone();

    assert!(String::from_utf8_lossy(&output.stderr).contains("schedule parsed"));
    // stdout is still pure JSON.
    parse_json(&output.stdout);
}
