use std::{fs, path::PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

fn cubit() -> Command {
    Command::cargo_bin("cubit").expect("binary should be built")
}

fn script(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("script should be written");
    path
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn run_prints_output() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = script(
        &dir,
        "main.cb",
        "let colors = ['red', 'green'];\nlet colors = append(colors, 'blue');\nprint(colors);\nprint(get(colors, 2) * 2);\n",
    );

    let output = cubit().arg("run").arg(&path).output().expect("cubit should run");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "[red, green, blue]\nblueblue\n");
}

#[test]
fn runtime_error_exits_with_failure() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = script(&dir, "main.cb", "print(1);\nprint(get([], 0));\nprint(2);\n");

    let output = cubit().arg("run").arg(&path).output().expect("cubit should run");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "1\n");

    let err = stderr(&output);
    assert!(err.starts_with("traceback on:\n"), "stderr: {err}");
    assert!(err.contains("-> line 2 -> get\n"), "stderr: {err}");
    assert!(err.contains("Error name: Runtime error\n"), "stderr: {err}");
    assert!(
        err.contains("Details: Failed to index: index 0 out of range for list of length 0"),
        "stderr: {err}"
    );
}

#[test]
fn check_reports_syntax_errors() {
    let dir = TempDir::new().expect("temp dir should be created");
    let valid = script(&dir, "valid.cb", "print(1 / 0);");
    let invalid = script(&dir, "invalid.cb", "let x = (1;");

    // division by zero is a runtime error, so checking succeeds without output from the script
    let output = cubit().arg("check").arg(&valid).output().expect("cubit should run");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).ends_with("has no syntax errors\n"));

    let output = cubit().arg("c").arg(&invalid).output().expect("cubit should run");
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error name: Invalid syntax\nDetails: Expected ')'\n"), "stderr: {err}");
    assert!(err.ends_with("let x = (1;\n          ^\n"), "stderr: {err}");
}

#[test]
fn eval_uses_stdin_path() {
    let output = cubit()
        .args(["eval", "print('a' + 'b');"])
        .output()
        .expect("cubit should run");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "ab\n");

    let output = cubit()
        .args(["e", "print(missing);"])
        .output()
        .expect("cubit should run");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("File '<stdin>' -> line 1 -> { program }\n"));
}

#[test]
fn colored_headings() {
    let output = cubit()
        .args(["--color", "eval", "1 +;"])
        .output()
        .expect("cubit should run");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("\x1b[1;31mError name: Illegal syntax\x1b[0m"));
}

#[test]
fn unreadable_file() {
    let dir = TempDir::new().expect("temp dir should be created");
    let output = cubit()
        .arg("run")
        .arg(dir.path().join("missing.cb"))
        .output()
        .expect("cubit should run");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot read `"));
}
