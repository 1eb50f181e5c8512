//! Plain-text rendering of tasks and timers.

use std::fmt::Write;

use focustrack_core::timer::format_clock;
use focustrack_core::{SessionSnapshot, TaskManager, TimerRegistry};

const BAR_WIDTH: usize = 30;

/// `[=====     ]` filled by elapsed share of `total`.
pub fn progress_bar(remaining: u64, total: u64, width: usize) -> String {
    let total = total.max(1);
    let elapsed = total.saturating_sub(remaining);
    let filled = (elapsed as f64 / total as f64 * width as f64) as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}

/// One countdown line for the foreground timer.
pub fn countdown_line(snapshot: &SessionSnapshot) -> String {
    format!(
        "{} {} {} - {}",
        progress_bar(snapshot.remaining_secs, snapshot.phase_total_secs, BAR_WIDTH),
        format_clock(snapshot.remaining_secs),
        snapshot.phase.label(),
        snapshot.task_title,
    )
}

pub fn active_timers(snapshots: &[SessionSnapshot]) -> String {
    let mut out = String::from("===== Active Timers =====\n");
    if snapshots.is_empty() {
        out.push_str("No active timers.\n");
        return out;
    }
    for (i, s) in snapshots.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} - {}: {}",
            i + 1,
            s.task_title,
            s.phase.label(),
            format_clock(s.remaining_secs)
        );
    }
    out
}

/// Indexed task list with completion progress. Tasks with a running timer in
/// `registry` are flagged.
pub fn task_list(manager: &TaskManager, registry: Option<&TimerRegistry>) -> String {
    let mut out = String::from("===== Task List =====\n");
    if manager.is_empty() {
        out.push_str("No tasks available.\n");
        return out;
    }
    for (i, task) in manager.tasks().iter().enumerate() {
        let active = registry.is_some_and(|r| r.has_active_timer(task.id));
        let _ = writeln!(
            out,
            "{i}: {} - {}{}",
            task.title,
            task.status(),
            if active { " [active]" } else { "" }
        );
        if !task.description.is_empty() {
            let _ = writeln!(out, "   {}", task.description);
        }
        if task.completed_cycles() > 0 {
            let _ = writeln!(out, "   Completed cycles: {}", task.completed_cycles());
        }
    }
    let _ = write!(out, "\nProgress: {:.1}%\n", manager.completion_rate());
    out
}
