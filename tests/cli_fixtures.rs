use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pedal_cli"))
}

fn fixture_file(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

#[test]
fn grade_fixture_succeeds() {
    let output = cli()
        .args(["grade", "--fixture", "clean_fast"])
        .output()
        .expect("failed to run pedal_cli grade");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("replay report JSON payload");
    assert_eq!(json["fixture"], "clean_fast");
    assert_eq!(json["rep_count"], 2);
    assert_eq!(json["summary"]["best_streak"], 2);
    assert_eq!(json["reps"][0]["passed"], true);
    assert_eq!(
        json["reps"][0]["headline"],
        "Rep 1: PASS · TTB 100 ms · Rel 470 ms"
    );
}

#[test]
fn grade_fixture_detects_mismatch() {
    let output = cli()
        .args([
            "grade",
            "--fixture",
            "clean_fast",
            "--expect",
            &fixture_file("clean_fast_incorrect.expect.json"),
        ])
        .output()
        .expect("failed to run mismatch grade");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(
        stderr.contains("\"failures\""),
        "expected diff JSON in stderr, got {stderr}"
    );
}

#[test]
fn grade_writes_report_file() {
    let path = std::env::temp_dir().join(format!("pedal_cli_report_{}.json", std::process::id()));
    let output = cli()
        .args([
            "grade",
            "--fixture",
            "slow_application",
            "--output",
            path.to_str().expect("UTF-8 temp path"),
        ])
        .output()
        .expect("failed to run grade with output");
    assert!(output.status.success());

    let json: Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("report written"))
            .expect("report JSON");
    assert_eq!(json["reps"][0]["verdict"]["faults"][0]["fault"], "application_off_goal");
    std::fs::remove_file(&path).ok();
}

#[test]
fn stream_emits_one_line_per_rep() {
    let output = cli()
        .args(["stream", "--fixture", "clean_fast"])
        .output()
        .expect("failed to run stream");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let event: Value = serde_json::from_str(line).expect("rep event JSON line");
        assert!(event["metrics"]["ttb_ms"].is_number());
    }
}

#[test]
fn unknown_fixture_fails() {
    let output = cli()
        .args(["grade", "--fixture", "does_not_exist"])
        .output()
        .expect("failed to run grade");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn dump_fixtures_lists_assets() {
    let output = cli()
        .arg("dump-fixtures")
        .output()
        .expect("failed to run dump-fixtures");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    assert!(
        stdout.contains("clean_fast ->"),
        "expected fixture listing, got {stdout}"
    );
    assert!(stdout.contains("mixed_session"));
    assert!(!stdout.contains("incorrect"));
}
