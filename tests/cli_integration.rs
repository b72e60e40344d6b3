//! Integration tests for the `gv` CLI.
//!
//! Each test writes a task file into a temp directory, runs `gv` as a
//! subprocess from that directory, and checks stdout and files on disk.

use std::fs;
use std::path::Path;
use std::process::Command;

const TASKS: &str = "\
# Tasks

- [ ] Draft outline #project/work/docs
- [x] Review API #project/work/api
- [x] Publish #project/work/docs
- [ ] Water plants #project/home
";

fn write_tasks(dir: &Path) {
    fs::write(dir.join("tasks.md"), TASKS).unwrap();
}

/// Run `gv`, returning (stdout, stderr, success).
fn run_gv(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_gv"))
        .args(args)
        .current_dir(dir)
        .env_remove("GROVE_LOG")
        .output()
        .expect("failed to run gv");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `gv` expecting success, return stdout.
fn run_gv_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_gv(dir, args);
    if !success {
        panic!(
            "gv {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// paths
// ---------------------------------------------------------------------------

#[test]
fn test_paths_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path());

    let out = run_gv_ok(tmp.path(), &["paths", "tasks.md"]);
    assert_eq!(
        out,
        "home       0/1\nwork       2/3\nwork/api   1/1\nwork/docs  1/2\n"
    );
}

#[test]
fn test_paths_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path());

    let out = run_gv_ok(tmp.path(), &["paths", "tasks.md", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[1]["path"], "work");
    assert_eq!(items[1]["direct"], 0);
    assert_eq!(items[1]["total"], 3);
    assert_eq!(items[1]["total_completed"], 2);
    assert_eq!(items[3]["level"], 2);
}

// ---------------------------------------------------------------------------
// print
// ---------------------------------------------------------------------------

#[test]
fn test_print_default_collapses_top_projects() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path());

    let out = run_gv_ok(tmp.path(), &["print", "tasks.md"]);
    assert_eq!(out, "  home 0/1\n\u{25B8} work 2/3\n");
}

#[test]
fn test_print_expand_all_does_not_write_state() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path());

    let out = run_gv_ok(tmp.path(), &["print", "tasks.md", "--expand-all"]);
    assert_eq!(
        out,
        "  home 0/1\n\u{25BE} work 2/3\n    api 1/1\n    docs 1/2\n"
    );
    assert!(!tmp.path().join(".grove-state.json").exists());
}

#[test]
fn test_print_level() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path());

    let out = run_gv_ok(tmp.path(), &["print", "tasks.md", "--level", "2"]);
    assert!(out.contains("\u{25BE} work 2/3"));
    assert!(out.contains("    docs 1/2"));
}

#[test]
fn test_print_uses_saved_state() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path());
    let state = serde_json::json!({
        "grove-project-tree-state": r#"{"expandedNodes":["work"],"selectedNodes":["work/api"]}"#
    });
    fs::write(tmp.path().join(".grove-state.json"), state.to_string()).unwrap();

    let out = run_gv_ok(tmp.path(), &["print", "tasks.md", "--json"]);
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1]["path"], "work");
    assert_eq!(rows[1]["expanded"], true);
    assert_eq!(rows[2]["path"], "work/api");
    assert_eq!(rows[2]["selected"], true);
    assert_eq!(rows[2]["text"], "api 1/1");
    assert!(rows[0].get("selected").is_none());
}

#[test]
fn test_print_state_dir_override() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path());
    let state_dir = tmp.path().join("state");
    fs::create_dir_all(&state_dir).unwrap();
    fs::write(
        state_dir.join(".grove-state.json"),
        serde_json::json!({
            "grove-project-tree-state": r#"{"expandedNodes":["work"]}"#
        })
        .to_string(),
    )
    .unwrap();

    let out = run_gv_ok(
        tmp.path(),
        &["print", "tasks.md", "--state-dir", state_dir.to_str().unwrap()],
    );
    assert!(out.contains("    api 1/1"));
}

#[test]
fn test_print_with_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path());
    fs::write(
        tmp.path().join("custom.toml"),
        "[tree]\nshow_toggle = false\nindent_size = 4\n",
    )
    .unwrap();

    let out = run_gv_ok(
        tmp.path(),
        &["print", "tasks.md", "--expand-all", "--config", "custom.toml"],
    );
    assert_eq!(out, "home 0/1\nwork 2/3\n    api 1/1\n    docs 1/2\n");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_missing_task_file_fails() {
    let tmp = tempfile::TempDir::new().unwrap();

    let (_, stderr, success) = run_gv(tmp.path(), &["paths", "nope.md"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
    assert!(stderr.contains("nope.md"));
}

#[test]
fn test_bad_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path());
    fs::write(tmp.path().join("grove.toml"), "[tree\n").unwrap();

    let (_, stderr, success) = run_gv(tmp.path(), &["paths", "tasks.md"]);
    assert!(!success);
    assert!(stderr.contains("grove.toml"));
}
