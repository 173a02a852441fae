// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests that run the `cascade` binary.
//!
//! Each test writes stylesheets into a temporary directory, runs a
//! subcommand and checks the exit status and output streams.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn cascade(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cascade"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run cascade")
}

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn check_clean_directory_succeeds() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.css", "a { color: red; }");
    write(dir.path(), "b.less", "@width: 10px;\n.b { width: @width; .c { color: blue } }");
    write(dir.path(), "c.scss", "$w: 1px;\n// note\n.d { &:hover { width: $w } }");

    let output = cascade(&["check", dir.path().to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn check_reports_errors_and_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "bad.css", "a { color: ; }\nb { color: red }");

    let output = cascade(&["check", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("1 error found in 1 file(s)"), "stderr: {err}");
}

#[test]
fn check_json_output_is_one_object_per_diagnostic() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "vars.css", "@var: 1px;");

    let output = cascade(&["check", file.to_str().unwrap(), "--format", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 1, "stdout: {out}");
    let json: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(json["category"], "failed-predicate");
    assert_eq!(json["span_start"], 0);
}

#[test]
fn dialect_flag_overrides_extension() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "vars.css", "@var: 1px;");

    let output = cascade(&["check", file.to_str().unwrap(), "--dialect", "less"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn tokens_lists_every_token() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "a.css", "a{}");

    let output = cascade(&["tokens", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output).lines().collect::<Vec<_>>(),
        vec!["1:0 Ident \"a\"", "1:1 LBrace \"{\"", "1:2 RBrace \"}\"", "1:3 Eof \"\""]
    );
}

#[test]
fn tree_prints_dump_and_query_result() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "a.css", "a { b: c } d { e: f }");

    let output = cascade(&["tree", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("root [0..21]\n  styleSheet [0..21]\n"));

    let output = cascade(&[
        "tree",
        file.to_str().unwrap(),
        "--query",
        "styleSheet/body/bodyItem|1",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "d { e: f }\n");
}

#[test]
fn missing_path_fails() {
    let dir = TempDir::new().unwrap();
    let output = cascade(&["check", dir.path().join("missing").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not exist"));
}
