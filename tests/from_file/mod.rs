//! Integration tests running the crate binary against files on disk: the full E2E path.

use std::path::PathBuf;
use std::process::Command;

use mockito::Server;

#[test]
fn summarize_prints_report_of_results_file() {
    let expected = std::fs::read_to_string(fixture_path("results_expected.txt"))
        .expect("failed to read expected output fixture");

    let output = Command::new(env!("CARGO_BIN_EXE_choice-eval-rs"))
        .arg("summarize")
        .arg(fixture_path("results.jsonl"))
        .output()
        .expect("failed to execute binary");

    assert!(
        output.status.success(),
        "binary exited with non-zero status.\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("binary output was not valid UTF-8");
    assert_eq!(stdout, expected);
}

#[test]
fn run_evaluates_dataset_against_http_endpoint() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"answer": "A"}"#)
        .expect(3)
        .create();
    let out_dir = tempfile::tempdir().expect("failed to create temp dir");

    let output = Command::new(env!("CARGO_BIN_EXE_choice-eval-rs"))
        .arg("run")
        .arg(fixture_path("three_records.csv"))
        .arg("--endpoint")
        .arg(format!("{}/v1/chat/completions", server.url()))
        .arg("--output-dir")
        .arg(out_dir.path())
        .args(["--workers", "2", "--batch-size", "2"])
        .env_remove("EVAL_OUTPUT_DIR")
        .output()
        .expect("failed to execute binary");

    assert!(
        output.status.success(),
        "binary exited with non-zero status.\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    mock.assert();

    let stdout = String::from_utf8(output.stdout).expect("binary output was not valid UTF-8");
    assert!(stdout.contains("Total Samples: 3\n"), "stdout: {stdout}");
    assert!(stdout.contains("Correct Answers: 2\n"), "stdout: {stdout}");
    assert!(stdout.contains("Accuracy (excluding invalids): 66.67%\n"), "stdout: {stdout}");

    let report = std::fs::read_to_string(out_dir.path().join("accuracy_metadata.txt"))
        .expect("report written");
    assert_eq!(report, stdout);

    let results = std::fs::read_to_string(out_dir.path().join("results.jsonl")).unwrap();
    assert_eq!(results.lines().count(), 3);

    let progress = std::fs::read_to_string(out_dir.path().join("progress.jsonl")).unwrap();
    let last = progress.lines().last().expect("final snapshot written");
    assert!(last.contains(r#""kind":"final""#), "last snapshot: {last}");
}

#[test]
fn run_fails_on_missing_dataset() {
    let out_dir = tempfile::tempdir().expect("failed to create temp dir");

    let output = Command::new(env!("CARGO_BIN_EXE_choice-eval-rs"))
        .arg("run")
        .arg(fixture_path("does_not_exist.csv"))
        .arg("--output-dir")
        .arg(out_dir.path())
        .output()
        .expect("failed to execute binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot open dataset"));
}

/// Returns the absolute path to a test fixture file in `tests/data/`.
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}
