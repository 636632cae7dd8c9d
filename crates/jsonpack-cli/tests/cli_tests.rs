//! Integration tests for the `jsonpack` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the pack,
//! unpack, and stats subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, error handling, and roundtrip correctness.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the sample.json fixture.
fn sample_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.json")
}

/// Helper: path to the catalog.json fixture (repetition-heavy payload).
fn catalog_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/catalog.json")
}

/// Helper: read the sample.json fixture as a string.
fn sample_json() -> String {
    std::fs::read_to_string(sample_json_path()).expect("sample.json fixture must exist")
}

// ─────────────────────────────────────────────────────────────────────────────
// Pack subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn pack_stdin_to_stdout() {
    Command::cargo_bin("jsonpack")
        .unwrap()
        .arg("pack")
        .write_stdin(r#"{"a":1,"b":1}"#)
        .assert()
        .success()
        .stdout(predicate::eq("a|b^1^^$0|2|1|2]"));
}

#[test]
fn pack_file_to_stdout() {
    Command::cargo_bin("jsonpack")
        .unwrap()
        .args(["pack", "-i", sample_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("name|Alice"))
        .stdout(predicate::str::contains("^"));
}

#[test]
fn pack_file_to_file() {
    let output_path = "/tmp/jsonpack-test-pack-output.jsonpack";
    let _ = std::fs::remove_file(output_path);

    Command::cargo_bin("jsonpack")
        .unwrap()
        .args(["pack", "-i", sample_json_path(), "-o", output_path])
        .assert()
        .success();

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    assert_eq!(content.split('^').count(), 4, "packed text has 4 sections");
}

#[test]
fn pack_rejects_invalid_json() {
    Command::cargo_bin("jsonpack")
        .unwrap()
        .arg("pack")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to pack JSON"));
}

#[test]
fn pack_rejects_missing_input_file() {
    Command::cargo_bin("jsonpack")
        .unwrap()
        .args(["pack", "-i", "/nonexistent/input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Unpack subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unpack_stdin_to_stdout() {
    Command::cargo_bin("jsonpack")
        .unwrap()
        .arg("unpack")
        .write_stdin("a|b^1^^$0|2|1|2]")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a\": 1"))
        .stdout(predicate::str::contains("\"b\": 1"));
}

#[test]
fn unpack_rejects_malformed_input() {
    Command::cargo_bin("jsonpack")
        .unwrap()
        .arg("unpack")
        .write_stdin("only^three^sections")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to unpack"));
}

#[test]
fn pack_then_unpack_roundtrips_through_files() {
    let packed_path = "/tmp/jsonpack-test-roundtrip.jsonpack";
    let json_path = "/tmp/jsonpack-test-roundtrip.json";
    let _ = std::fs::remove_file(packed_path);
    let _ = std::fs::remove_file(json_path);

    Command::cargo_bin("jsonpack")
        .unwrap()
        .args(["pack", "-i", sample_json_path(), "-o", packed_path])
        .assert()
        .success();

    Command::cargo_bin("jsonpack")
        .unwrap()
        .args(["unpack", "-i", packed_path, "-o", json_path])
        .assert()
        .success();

    let original: serde_json::Value = serde_json::from_str(&sample_json()).unwrap();
    let roundtripped: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(original, roundtripped);
}

// ─────────────────────────────────────────────────────────────────────────────
// Stats subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stats_reports_sizes_and_reduction() {
    Command::cargo_bin("jsonpack")
        .unwrap()
        .args(["stats", "-i", catalog_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("JSON size:"))
        .stdout(predicate::str::contains("Packed size:"))
        .stdout(predicate::str::contains("Reduction:"));
}

#[test]
fn stats_shows_positive_reduction_for_repetitive_payload() {
    // catalog.json repeats statuses/warehouses/quantities; the dictionary
    // encoding must come out smaller than the minified JSON
    let output = Command::cargo_bin("jsonpack")
        .unwrap()
        .args(["stats", "-i", catalog_json_path()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let reduction_line = stdout
        .lines()
        .find(|l| l.starts_with("Reduction:"))
        .expect("stats output has a Reduction line");
    assert!(
        !reduction_line.contains("-"),
        "expected a positive reduction, got: {reduction_line}"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// General CLI behavior
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn no_subcommand_shows_usage() {
    Command::cargo_bin("jsonpack")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("jsonpack")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jsonpack"));
}
