//! CLI integration tests
//!
//! Run the `domslim` binary against snapshot files written to a temp dir.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "viewport": {"width": 800, "height": 600},
    "page": {"width": 800, "height": 600},
    "root": {
        "type": "element", "tag": "body",
        "children": [
            {"type": "element", "tag": "div", "attributes": [["class", "outer p-4"]],
             "children": [
                {"type": "element", "tag": "div", "attributes": [["class", "inner"]],
                 "children": [
                    {"type": "element", "tag": "a", "attributes": [["href", "/cart"], ["data-id", "7"]],
                     "children": [{"type": "text", "text": "Cart"}]}
                 ]}
             ]},
            {"type": "element", "tag": "script", "children": [{"type": "text", "text": "x()"}]},
            {"type": "element", "tag": "h1", "children": [{"type": "text", "text": "Shop"}]}
        ]
    }
}"#;

fn write_snapshot(temp_dir: &TempDir, contents: &str) -> PathBuf {
    let path = temp_dir.path().join("page.json");
    fs::write(&path, contents).unwrap();
    path
}

fn domslim(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_domslim"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_simplify_prints_simplified_markup() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&temp_dir, SNAPSHOT);

    let output = domslim(&["simplify", snapshot.to_str().unwrap(), "--quiet-matches"]);

    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = [
        "<body>",
        "  <a href=\"/cart\" class=\"inner outer\">",
        "    Cart",
        "  </a>",
        "  <h1>",
        "    Shop",
        "  </h1>",
        "</body>",
    ]
    .join("\n");
    assert_eq!(stdout.trim_end(), expected);
}

#[test]
fn test_cli_simplify_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&temp_dir, SNAPSHOT);
    let out_path = temp_dir.path().join("simplified.html");

    let output = domslim(&[
        "simplify",
        snapshot.to_str().unwrap(),
        "--output",
        out_path.to_str().unwrap(),
        "--profile",
        "prod",
        "--max-visits",
        "16",
    ]);

    assert!(output.status.success());
    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("<body>"));
    assert!(!written.contains("script"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Simplified to"));
}

#[test]
fn test_cli_render_keeps_everything() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&temp_dir, SNAPSHOT);

    let output = domslim(&["render", snapshot.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<script>"));
    assert!(stdout.contains("data-id=\"7\""));
}

#[test]
fn test_cli_reports_invalid_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&temp_dir, "{\"root\": 1}");

    let output = domslim(&["simplify", snapshot.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn test_cli_reports_missing_file() {
    let output = domslim(&["render", "/nonexistent/page.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}
