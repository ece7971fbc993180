use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("panellink"))
}

#[test]
fn help_lists_decode() {
    cmd().arg("--help").assert().success().stdout(contains("decode"));
    cmd().arg("decode").arg("--help").assert().success();
}

#[test]
fn decodes_standard_ack_to_json() {
    let assert = cmd()
        .arg("decode")
        .arg("0d 02 02 02 43 f9 0a")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(stdout.trim()).expect("valid json");
    assert_eq!(value["protocol"], "standard");
    assert_eq!(value["name"], "ACK");
    assert_eq!(value["checksum_ok"], true);
}

#[test]
fn inserts_missing_start_marker() {
    cmd()
        .arg("decode")
        .arg("02 02 02 43 f9 0a")
        .assert()
        .success()
        .stdout(contains("\"ACK\""));
}

#[test]
fn decodes_powerlink_counts_response() {
    let assert = cmd()
        .arg("decode")
        .arg("0d b0 03 52 0b ff 08 ff 06 19 08 00 02 01 01 fa 43 7d 0a")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(stdout.trim()).expect("valid json");
    assert_eq!(value["protocol"], "powerlink");
    assert_eq!(value["command_name"], "DEVICE_COUNTS");
    assert_eq!(value["payload"]["kind"], "device_counts");
    assert_eq!(value["payload"]["sensors"], 8);
    assert_eq!(value["checksum_ok"], true);
}

#[test]
fn reads_frames_from_stdin() {
    let assert = cmd()
        .arg("decode")
        .write_stdin("# comment line\n0d 02 02 02 43 f9 0a\n\n0d 02 02 02 43 f9 0a\n")
        .assert()
        .success()
        .stderr(contains("2 frame(s) decoded"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    assert_eq!(stdout.trim().lines().count(), 2);
}

#[test]
fn invalid_hex_shows_error_and_hint() {
    cmd()
        .arg("decode")
        .arg("zz")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn truncated_frame_shows_error() {
    cmd()
        .arg("decode")
        .arg("0d b0 03")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    cmd()
        .arg("decode")
        .arg("0d 02 02 02 43 f9 0a")
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure();
}

#[test]
fn pretty_output_is_multiline_json() {
    let assert = cmd()
        .arg("decode")
        .arg("--pretty")
        .arg("0d 02 02 02 43 f9 0a")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    assert!(stdout.trim().lines().count() > 1);
    let value: Value = serde_json::from_str(stdout.trim()).expect("valid json");
    assert_eq!(value["command"], 2);
}

#[test]
fn quiet_suppresses_summary() {
    cmd()
        .arg("decode")
        .arg("--quiet")
        .arg("0d 02 02 02 43 f9 0a")
        .assert()
        .success()
        .stderr(contains("decoded").not());
}
