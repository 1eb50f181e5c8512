//! Scripted walk-through with in-memory tasks. Nothing is written to disk.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use focustrack_core::timer::format_clock;
use focustrack_core::{Phase, Preset, Task, TaskId, TaskManager, TimerListener, TimerRegistry};

use super::CmdResult;
use crate::render;

/// Prints the countdown in place and credits finished work phases.
struct DemoListener {
    title: String,
    task_id: TaskId,
    phase: Phase,
    manager: Arc<Mutex<TaskManager>>,
}

impl TimerListener for DemoListener {
    fn on_tick(&mut self, remaining_secs: u64) {
        print!(
            "\r{} - {} phase: {}",
            self.title,
            self.phase,
            format_clock(remaining_secs)
        );
        let _ = std::io::stdout().flush();
    }

    fn on_phase_complete(&mut self, was_work_phase: bool) {
        println!("\n{} phase complete!", self.phase);
        if was_work_phase {
            self.manager
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .increment_cycles(self.task_id);
            self.phase = Phase::Break;
        } else {
            self.phase = Phase::Work;
        }
    }

    fn on_timer_complete(&mut self) {
        println!("\nTimer cycle completed!");
    }
}

fn print_tasks(manager: &Mutex<TaskManager>) {
    let manager = manager.lock().unwrap_or_else(PoisonError::into_inner);
    for task in manager.tasks() {
        println!("{task}");
    }
}

pub fn run(step_secs: u64) -> CmdResult {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(walkthrough(Duration::from_secs(step_secs)))
}

async fn walkthrough(step: Duration) -> CmdResult {
    let manager = Arc::new(Mutex::new(TaskManager::with_tasks(vec![
        Task::new("Finish report", "Due tomorrow"),
        Task::new("Read chapter 4", "Pages 45-62"),
        Task::new("Implement timer feature", "For the course project"),
    ])));
    let tasks: Vec<Task> = manager
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .tasks()
        .to_vec();

    println!("Current tasks:");
    print_tasks(&manager);
    println!("\nDemonstrating the timer presets:");

    let registry = TimerRegistry::new(tokio::runtime::Handle::current());
    let plan = [Preset::Pomodoro, Preset::ShortBreak, Preset::LongBreak];
    for (n, (task, preset)) in tasks.iter().zip(plan).enumerate() {
        let config = preset.config();
        println!(
            "\n{}. Starting {} timer for '{}'",
            n + 1,
            config.name(),
            task.title
        );
        println!("Strategy: {} - {}", config.name(), config.description());

        let handle = registry.start_timer(task, config);
        handle.set_listener(DemoListener {
            title: task.title.clone(),
            task_id: task.id,
            phase: Phase::Work,
            manager: Arc::clone(&manager),
        });
        tokio::time::sleep(step).await;

        if n == 0 {
            println!("\nPausing the timer...");
            registry.pause(task.id);
        }
    }

    println!();
    let listed = manager.lock().unwrap_or_else(PoisonError::into_inner).clone();
    print!("{}", render::task_list(&listed, Some(&registry)));
    print!("{}", render::active_timers(&registry.active_sessions()));

    // Completing a task ends its timer.
    let last = &tasks[tasks.len() - 1];
    registry.cancel(last.id);
    manager
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .complete(tasks.len() - 1)?;
    println!("\nCompleted '{}' and cancelled its timer.", last.title);

    registry.clear_all();
    println!("Demo completed. Timers cancelled.");

    println!("\nFinal task status:");
    print_tasks(&manager);
    let rate = manager
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .completion_rate();
    println!("\nProgress: {rate:.1}%");
    Ok(())
}
