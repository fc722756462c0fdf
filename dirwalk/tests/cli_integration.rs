//! Integration tests for dirwalk CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

fn run_dirwalk(args: &[&str]) -> (String, String, bool) {
    let mut cmd_args = vec!["run", "-q", "-p", "dirwalk", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .current_dir(env!("CARGO_MANIFEST_DIR").to_string() + "/..")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn create_package(dir: &Path) {
    for (rel, content) in [
        ("package.json", "{}"),
        ("index.js", ""),
        (".gitignore", "coverage/\n"),
        ("coverage/lcov.info", ""),
        ("lib/util.js", ""),
        ("lib/debug.log", ""),
        ("node_modules/dep/index.js", ""),
    ] {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn lines(stdout: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = stdout.lines().collect();
    lines.sort();
    lines
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_dirwalk(&["--help"]);

    assert!(success);
    assert!(stdout.contains("dirwalk"));
    assert!(stdout.contains("--recurse"));
    assert!(stdout.contains("--ignore-file"));
    assert!(stdout.contains("--never-ignore"));
    assert!(stdout.contains("--output"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_dirwalk(&["--version"]);

    assert!(success);
    assert!(stdout.contains("dirwalk"));
}

#[test]
fn test_default_is_not_recursive() {
    let temp = tempdir().unwrap();
    create_package(temp.path());

    let (stdout, _, success) = run_dirwalk(&[temp.path().to_str().unwrap()]);

    assert!(success);
    assert_eq!(lines(&stdout), vec![".gitignore", "index.js", "package.json"]);
}

#[test]
fn test_npm_preset_recursive() {
    let temp = tempdir().unwrap();
    create_package(temp.path());

    let (stdout, _, success) = run_dirwalk(&[
        temp.path().to_str().unwrap(),
        "--recursive",
        "--preset",
        "npm",
        "--default-ignore",
        "*.log",
    ]);

    assert!(success);
    assert_eq!(
        lines(&stdout),
        vec![".gitignore", "index.js", "lib/util.js", "package.json"]
    );
}

#[test]
fn test_json_output() {
    let temp = tempdir().unwrap();
    create_package(temp.path());

    let (stdout, _, success) = run_dirwalk(&[
        temp.path().to_str().unwrap(),
        "-r",
        "--ignore-file",
        ".npmignore, .gitignore",
        "-x",
        "node_modules/",
        "--output",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let entries = parsed["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert!(entries.iter().any(|e| e["relname"] == "lib/debug.log"));
    assert!(entries.iter().all(|e| e["type"] == "file"));
    assert_eq!(parsed["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_config_file() {
    let temp = tempdir().unwrap();
    create_package(temp.path());
    let config = temp.path().join("walker.json");
    fs::write(
        &config,
        r#"{ "defaultIgnore": ["node_modules/", "coverage/", "walker.json"], "neverIgnore": [] }"#,
    )
    .unwrap();

    let (stdout, _, success) = run_dirwalk(&[
        temp.path().to_str().unwrap(),
        "-r",
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(success);
    assert_eq!(
        lines(&stdout),
        vec![
            ".gitignore",
            "index.js",
            "lib/debug.log",
            "lib/util.js",
            "package.json"
        ]
    );
}

#[test]
fn test_missing_path_is_lenient_by_default() {
    let (stdout, stderr, success) = run_dirwalk(&["/nonexistent/path"]);

    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("error:"));
}

#[test]
fn test_missing_path_fails_when_strict() {
    let (_, stderr, success) = run_dirwalk(&["/nonexistent/path", "--strict"]);

    assert!(!success);
    assert!(stderr.contains("/nonexistent/path"));
}

#[test]
fn test_invalid_pattern() {
    let (_, stderr, success) = run_dirwalk(&[".", "--never-ignore", "[oops"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("[oops"));
}
