//! Integration tests for pynotes CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

const SAMPLE: &str = r#""""Utilities."""

import os  # stdlib


def cwd():
    """Return the working directory."""
    return os.getcwd()
"#;

fn run_pynotes(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_pynotes"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn write_sample(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, SAMPLE).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_pynotes(&["--help"]);

    assert!(success);
    assert!(stdout.contains("pynotes"));
    assert!(stdout.contains("--count"));
    assert!(stdout.contains("--remove"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--backup"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_pynotes(&["--version"]);

    assert!(success);
    assert!(stdout.contains("pynotes"));
}

#[test]
fn test_count_single_file_table() {
    let temp = tempdir().unwrap();
    let file = write_sample(temp.path(), "utils.py");

    let (stdout, _, success) = run_pynotes(&[&file]);

    assert!(success);
    assert!(stdout.contains("# stdlib"));
    assert!(stdout.contains("Return the working directory."));
    assert!(stdout.contains("Comment lines: 3"));
    assert!(stdout.contains("Total lines: 9"));
}

#[test]
fn test_count_single_file_json() {
    let temp = tempdir().unwrap();
    let file = write_sample(temp.path(), "utils.py");

    let (stdout, _, success) = run_pynotes(&[&file, "--count", "--output", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(parsed["comment_line_count"], 3);
    assert_eq!(parsed["total_line_count"], 9);
    assert_eq!(parsed["comments"][1]["line"], 3);
    assert_eq!(parsed["comments"][1]["content"], "# stdlib");
    assert!(parsed["comment_letter_ratio"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_count_directory_json() {
    let temp = tempdir().unwrap();
    write_sample(temp.path(), "a.py");
    write_sample(temp.path(), "pkg/b.py");
    write_sample(temp.path(), "tests/test_b.py");

    let (stdout, _, success) = run_pynotes(&[
        temp.path().to_str().unwrap(),
        "-o",
        "json",
        "--exclude",
        "**/tests/**",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(parsed["files"].as_array().unwrap().len(), 2);
    assert!(parsed["failures"].as_array().unwrap().is_empty());
}

#[test]
fn test_count_directory_table() {
    let temp = tempdir().unwrap();
    write_sample(temp.path(), "a.py");
    write_sample(temp.path(), "pkg/b.py");

    let (stdout, _, success) = run_pynotes(&[temp.path().to_str().unwrap()]);

    assert!(success);
    assert!(stdout.contains("a.py"));
    assert!(stdout.contains("b.py"));
    assert!(stdout.contains("Total (2 files)"));
}

#[test]
fn test_remove_single_file() {
    let temp = tempdir().unwrap();
    let file = write_sample(temp.path(), "utils.py");

    let (stdout, _, success) = run_pynotes(&[&file, "--remove"]);

    assert!(success);
    assert!(stdout.contains("removed 3 of 9 lines"));

    let stripped = fs::read_to_string(&file).unwrap();
    assert_eq!(stripped.lines().count(), SAMPLE.lines().count());
    assert!(stripped.contains("import os\n"));
    assert!(!stripped.contains("Utilities"));
    assert_eq!(
        fs::read_to_string(temp.path().join("utils.py.bak")).unwrap(),
        SAMPLE
    );
}

#[test]
fn test_remove_directory_json() {
    let temp = tempdir().unwrap();
    write_sample(temp.path(), "a.py");
    write_sample(temp.path(), "pkg/b.py");

    let (stdout, _, success) = run_pynotes(&[temp.path().to_str().unwrap(), "-r", "-o", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let files = parsed["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["removed"], 3);
    assert!(temp.path().join("pkg/b.py.bak").exists());
}

#[test]
fn test_conflicting_flags() {
    let temp = tempdir().unwrap();
    let file = write_sample(temp.path(), "utils.py");

    let (_, stderr, success) = run_pynotes(&[&file, "-c", "-r"]);

    assert!(!success);
    assert!(stderr.contains("cannot be used with"));
    assert_eq!(fs::read_to_string(&file).unwrap(), SAMPLE);
}

#[test]
fn test_invalid_path() {
    let (_, stderr, success) = run_pynotes(&["/nonexistent/path"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_non_python_file() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("notes.txt");
    fs::write(&file, "# not python\n").unwrap();

    let (_, stderr, success) = run_pynotes(&[file.to_str().unwrap()]);

    assert!(!success);
    assert!(stderr.contains("not a Python file"));
}

#[test]
fn test_directory_failure_is_isolated() {
    let temp = tempdir().unwrap();
    write_sample(temp.path(), "good.py");
    fs::write(temp.path().join("bad.py"), [0xff, 0xfe, 0x00]).unwrap();

    let (stdout, stderr, success) =
        run_pynotes(&[temp.path().to_str().unwrap(), "--output", "json"]);

    assert!(!success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(parsed["files"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["failures"].as_array().unwrap().len(), 1);
    assert!(stderr.contains("bad.py"));
}
