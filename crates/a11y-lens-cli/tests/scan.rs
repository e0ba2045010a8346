use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("a11y-lens-cli").unwrap();
    cmd.env_remove("A11Y_LENS_PROVIDER")
        .env_remove("A11Y_LENS_API_KEY")
        .env_remove("A11Y_LENS_ENDPOINT")
        .env_remove("A11Y_LENS_MODEL")
        .env_remove("A11Y_LENS_ACK")
        .env("A11Y_LENS_PROVIDER", "noop");
    cmd
}

#[test]
fn scan_with_noop_provider_reports_clean_files() {
    let temp = tempfile::tempdir().unwrap();
    write(&temp.path().join("index.html"), "<p>hello</p>");

    cmd()
        .args([
            "scan",
            temp.path().to_str().unwrap(),
            "--level",
            "AA",
            "--wcag-version",
            "2.1",
            "--format",
            "list",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scanning 1 file(s) for WCAG 2.1 (AA)"))
        .stdout(predicate::str::contains("index.html"))
        .stdout(predicate::str::contains("No accessibility issues found."));
}

#[test]
fn scan_empty_directory_reports_nothing_to_do() {
    let temp = tempfile::tempdir().unwrap();

    cmd()
        .args([
            "scan",
            temp.path().to_str().unwrap(),
            "--level",
            "A",
            "--wcag-version",
            "2.0",
            "--format",
            "table",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No supported files found"));
}

#[test]
fn invalid_format_falls_back_to_table() {
    let temp = tempfile::tempdir().unwrap();
    write(&temp.path().join("page.html"), "<p>hi</p>");

    cmd()
        .args([
            "scan",
            temp.path().to_str().unwrap(),
            "--level",
            "AA",
            "--wcag-version",
            "2.2",
            "--format",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No accessibility issues found."));
}

#[test]
fn interactive_prompts_fill_missing_level_and_version() {
    let temp = tempfile::tempdir().unwrap();
    write(&temp.path().join("page.html"), "<p>hi</p>");

    // bogus level first; the prompt loops until a valid one arrives
    let stdin = format!("AAAA\naa\n2.1\nlist\n{}\n", temp.path().display());
    cmd()
        .arg("scan")
        .write_stdin(stdin)
        .assert()
        .success()
        .stdout(predicate::str::contains("WCAG 2.1 (AA)"))
        .stdout(predicate::str::contains("No accessibility issues found."));
}

#[test]
fn missing_api_key_is_fatal_for_real_provider() {
    let temp = tempfile::tempdir().unwrap();
    write(&temp.path().join("page.html"), "<p>hi</p>");

    cmd()
        .env("A11Y_LENS_PROVIDER", "openai")
        .args([
            "scan",
            temp.path().to_str().unwrap(),
            "--level",
            "AA",
            "--wcag-version",
            "2.1",
            "--format",
            "table",
            "--yes",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A11Y_LENS_API_KEY"));
}

#[test]
fn declined_consent_aborts_before_any_call() {
    let temp = tempfile::tempdir().unwrap();
    write(&temp.path().join("page.html"), "<p>hi</p>");

    cmd()
        .env("A11Y_LENS_PROVIDER", "openai")
        .env("A11Y_LENS_API_KEY", "test-key")
        .env("A11Y_LENS_ENDPOINT", "http://127.0.0.1:9")
        .args([
            "scan",
            temp.path().to_str().unwrap(),
            "--level",
            "AA",
            "--wcag-version",
            "2.1",
            "--format",
            "table",
        ])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("scan aborted"));
}

#[test]
fn json_format_emits_parseable_output() {
    let temp = tempfile::tempdir().unwrap();
    write(&temp.path().join("page.html"), "<p>hi</p>");

    let output = cmd()
        .args([
            "scan",
            temp.path().to_str().unwrap(),
            "--level",
            "A",
            "--wcag-version",
            "2.0",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let json_start = stdout.find('{').expect("json object in output");
    let value: serde_json::Value =
        serde_json::from_str(stdout[json_start..].trim()).expect("valid json report");
    assert!(value["findings"].as_array().unwrap().is_empty());
}
