//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with a private data directory and verify
//! outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command against `data_dir` and return (stdout, stderr, code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_focustrack"))
        .args(args)
        .env("FOCUSTRACK_DATA_DIR", data_dir)
        .env_remove("FOCUSTRACK_TASKS_FILE")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Like `run_cli`, feeding `input` to stdin and then closing it.
fn run_cli_with_input(data_dir: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_focustrack"))
        .args(args)
        .env("FOCUSTRACK_DATA_DIR", data_dir)
        .env_remove("FOCUSTRACK_TASKS_FILE")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI command");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn tasks_json(data_dir: &Path) -> Vec<serde_json::Value> {
    let stdout = run_ok(data_dir, &["task", "list", "--json"]);
    serde_json::from_str(&stdout).expect("task list --json prints a JSON array")
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(
        dir.path(),
        &["task", "add", "Write report", "--description", "Q3 numbers"],
    );
    assert!(out.contains("Task added: Write report"));

    let out = run_ok(dir.path(), &["task", "list"]);
    assert!(out.contains("0: Write report - PENDING"));
    assert!(out.contains("Progress: 0.0%"));

    let saved = std::fs::read_to_string(dir.path().join("tasks.txt")).unwrap();
    assert_eq!(saved.trim_end(), "Write report|Q3 numbers|PENDING|0");
}

#[test]
fn test_task_list_empty() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["task", "list"]);
    assert!(out.contains("No tasks available."));
    assert!(tasks_json(dir.path()).is_empty());
}

#[test]
fn test_task_edit_complete_delete() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["task", "add", "First"]);
    run_ok(dir.path(), &["task", "add", "Second"]);

    run_ok(dir.path(), &["task", "edit", "1", "--title", "Second (renamed)"]);
    run_ok(dir.path(), &["task", "complete", "0"]);

    let tasks = tasks_json(dir.path());
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["status"], "COMPLETED");
    assert_eq!(tasks[1]["title"], "Second (renamed)");
    assert_eq!(tasks[1]["description"], "");

    run_ok(dir.path(), &["task", "delete", "0"]);
    let tasks = tasks_json(dir.path());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Second (renamed)");
}

#[test]
fn test_invalid_index_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "complete", "3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("Invalid task index 3"));
}

#[test]
fn test_task_add_rejects_pipe_and_keeps_backslashes() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "a|b"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid value for 'title'"));
    assert!(!dir.path().join("tasks.txt").exists());

    run_ok(dir.path(), &["task", "add", r"C:\reports\q3", "--description", r"see \notes"]);
    let saved = std::fs::read_to_string(dir.path().join("tasks.txt")).unwrap();
    assert_eq!(saved.trim_end(), r"C:\reports\q3|see \notes|PENDING|0");
}

#[test]
fn test_tasks_file_flag_overrides_default_location() {
    let dir = tempfile::tempdir().unwrap();
    let custom = dir.path().join("elsewhere").join("list.txt");
    let custom_arg = custom.to_str().unwrap();
    run_ok(dir.path(), &["--tasks-file", custom_arg, "task", "add", "Moved"]);

    assert!(custom.exists());
    assert!(!dir.path().join("tasks.txt").exists());
    let out = run_ok(dir.path(), &["task", "list", "--tasks-file", custom_arg]);
    assert!(out.contains("0: Moved - PENDING"));
}

#[test]
fn test_timer_presets() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["timer", "presets"]);
    assert!(out.contains("pomodoro"));
    assert!(out.contains("short-break"));
    assert!(out.contains("long-break"));

    let out = run_ok(dir.path(), &["timer", "presets", "--json"]);
    let rows: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["key"], "pomodoro");
    assert_eq!(rows[0]["work_secs"], 1500);
    assert_eq!(rows[2]["break_secs"], 600);
}

#[test]
fn test_timer_run_completes_cycle_and_counts_it() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["task", "add", "Quick task"]);

    let out = run_ok(
        dir.path(),
        &["timer", "run", "0", "--work-sec", "2", "--break-sec", "1", "--name", "Tiny"],
    );
    assert!(out.contains("Timer started for task: Quick task"));
    assert!(out.contains("Strategy: Tiny"));
    assert!(out.contains("Work phase complete!"));
    assert!(out.contains("Timer cycle complete for task: Quick task"));

    let tasks = tasks_json(dir.path());
    assert_eq!(tasks[0]["completed_cycles"], 1);
}

#[test]
fn test_timer_run_switches_preset_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["task", "add", "Long task"]);

    let (stdout, stderr, code) = run_cli_with_input(
        dir.path(),
        &["timer", "run", "0"],
        "s nap\ns short-break\nx\nc\n",
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");
    assert!(stdout.contains("Strategy: Pomodoro"));
    assert!(stdout.contains("Unknown timer preset: nap"));
    assert!(stdout.contains(
        "Switched preset. Strategy: Short Break - 15 minutes of focused work followed by a 3-minute break"
    ));
    assert!(stdout.contains("Phase reset."));
    assert!(stdout.contains("Timer cancelled for task: Long task"));

    let tasks = tasks_json(dir.path());
    assert_eq!(tasks[0]["completed_cycles"], 0);
}

#[test]
fn test_timer_run_rejects_zero_durations() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["task", "add", "Zero"]);
    let (_, stderr, code) = run_cli(dir.path(), &["timer", "run", "0", "--work-sec", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("cannot both be zero"));
}

#[test]
fn test_config_get_set_reset() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["config", "get", "timer.default_preset"]);
    assert_eq!(out.trim(), "pomodoro");

    run_ok(dir.path(), &["config", "set", "notifications.bell", "false"]);
    let out = run_ok(dir.path(), &["config", "get", "notifications.bell"]);
    assert_eq!(out.trim(), "false");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "timer.default_preset", "nap"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("nap"));

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);

    run_ok(dir.path(), &["config", "reset"]);
    let out = run_ok(dir.path(), &["config", "get", "notifications.bell"]);
    assert_eq!(out.trim(), "true");
}

#[test]
fn test_demo_runs_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["demo", "--step-secs", "0"]);
    assert!(out.contains("Finish report"));
    assert!(out.contains("Demo completed. Timers cancelled."));
    assert!(out.contains("Progress: 33.3%"));
    assert!(!dir.path().join("tasks.txt").exists());
}
