//! Command-line tests for the splitclip binary

use assert_cmd::Command;
use predicates::prelude::*;

fn splitclip() -> Command {
    let mut cmd = Command::cargo_bin("splitclip").unwrap();
    cmd.env_remove("SPLITCLIP_CONFIG")
        .env_remove("RUST_LOG")
        .current_dir(std::env::temp_dir());
    cmd
}

#[test]
fn test_help_lists_commands() {
    splitclip()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("trim"))
        .stdout(predicate::str::contains("divide"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn test_plan_divide_prints_both_halves() {
    splitclip()
        .args(["plan", "--input", "/videos/clip.mp4", "--duration", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first-half"))
        .stdout(predicate::str::contains("second-half"))
        .stdout(predicate::str::contains("clip_part1.mp4"))
        .stdout(predicate::str::contains("clip_part2.mp4"));
}

#[test]
fn test_plan_trim_targets_source_path() {
    splitclip()
        .args([
            "plan", "--input", "/videos/clip.mp4", "--duration", "10", "--start", "2", "--end", "00:06",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("trimmed"))
        .stdout(predicate::str::contains("/videos/clip.mp4"))
        .stdout(predicate::str::contains("clip_part1").not());
}

#[test]
fn test_plan_trim_past_end_fails() {
    splitclip()
        .args([
            "plan", "--input", "/videos/clip.mp4", "--duration", "10", "--start", "2", "--end", "12",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("end exceeds clip duration"));
}

#[test]
fn test_plan_start_requires_end() {
    splitclip()
        .args(["plan", "--input", "/videos/clip.mp4", "--duration", "10", "--start", "2"])
        .assert()
        .failure();
}

#[test]
fn test_trim_missing_input_fails() {
    splitclip()
        .args(["trim", "--input", "/nonexistent/clip.mp4", "--start", "0", "--end", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_unknown_preset_is_rejected() {
    splitclip()
        .args(["--preset", "ultra", "plan", "--input", "clip.mp4", "--duration", "10"])
        .assert()
        .failure();
}

#[test]
fn test_plan_reports_configured_composition() {
    splitclip()
        .args([
            "--composition", "reencode", "plan", "--input", "/videos/clip.mov", "--duration", "10", "--start", "1",
            "--end", "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"composition\": \"reencode\""))
        .stdout(predicate::str::contains("\"container\": \"mov\""));
}
