//! Foreground timer commands.

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Subcommand};
use focustrack_core::{
    Config, PhaseConfig, Preset, SessionEvent, Task, TaskManager, TimerRegistry,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use super::{CmdResult, Workspace};
use crate::render;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run one work/break cycle for a task in the foreground
    ///
    /// While running, type a command and press Enter: p pause, r resume,
    /// x reset the current phase, s <preset> switch preset, c cancel,
    /// d mark the task completed.
    Run {
        /// Task index as shown by `task list`
        index: usize,
        /// Preset key (defaults to timer.default_preset)
        #[arg(long)]
        preset: Option<Preset>,
        #[command(flatten)]
        custom: CustomDurations,
    },
    /// List the built-in presets
    Presets {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Any duration flag switches from a preset to a custom configuration.
#[derive(Args)]
pub struct CustomDurations {
    #[arg(long, conflicts_with = "preset")]
    work_min: Option<u64>,
    #[arg(long, conflicts_with = "preset")]
    work_sec: Option<u64>,
    #[arg(long, conflicts_with = "preset")]
    break_min: Option<u64>,
    #[arg(long, conflicts_with = "preset")]
    break_sec: Option<u64>,
    /// Name of the custom configuration
    #[arg(long, default_value = "Custom")]
    name: String,
    /// Description of the custom configuration
    #[arg(long, default_value = "")]
    description: String,
}

impl CustomDurations {
    fn is_set(&self) -> bool {
        self.work_min.is_some()
            || self.work_sec.is_some()
            || self.break_min.is_some()
            || self.break_sec.is_some()
    }
}

fn phase_config(
    config: &Config,
    preset: Option<Preset>,
    custom: CustomDurations,
) -> CmdResult<PhaseConfig> {
    if custom.is_set() {
        let config = PhaseConfig::custom(
            custom.name,
            custom.description,
            (custom.work_min.unwrap_or(0), custom.work_sec.unwrap_or(0)),
            (custom.break_min.unwrap_or(0), custom.break_sec.unwrap_or(0)),
        )?;
        return Ok(config);
    }
    Ok(preset.unwrap_or_else(|| config.default_preset()).config())
}

#[derive(Serialize)]
struct PresetRow {
    key: &'static str,
    #[serde(flatten)]
    config: PhaseConfig,
}

fn print_presets(json: bool) -> CmdResult {
    if json {
        let rows: Vec<PresetRow> = Preset::ALL
            .into_iter()
            .map(|p| PresetRow {
                key: p.key(),
                config: p.config(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for preset in Preset::ALL {
        let config = preset.config();
        println!(
            "{:<12} {} - {}",
            preset.key(),
            config.name(),
            config.description()
        );
    }
    Ok(())
}

pub fn run(action: TimerAction, tasks_file: Option<PathBuf>) -> CmdResult {
    match action {
        TimerAction::Presets { json } => print_presets(json),
        TimerAction::Run {
            index,
            preset,
            custom,
        } => {
            let workspace = Workspace::open(tasks_file)?;
            let manager = workspace.load_tasks();
            let task = manager.get(index)?.clone();
            let config = phase_config(&workspace.config, preset, custom)?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(run_foreground(workspace, manager, task, config));
            // A pending stdin read would otherwise block shutdown.
            runtime.shutdown_background();
            result
        }
    }
}

const COMMAND_HELP: &str = "p pause, r resume, x reset, s <preset> switch, c cancel, d done";

/// A line typed while a timer runs in the foreground.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Pause,
    Resume,
    Reset,
    Switch(Preset),
    Cancel,
    Done,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = match (words.next(), words.next()) {
            (Some("p"), None) => Command::Pause,
            (Some("r"), None) => Command::Resume,
            (Some("x"), None) => Command::Reset,
            (Some("c"), None) => Command::Cancel,
            (Some("d"), None) => Command::Done,
            (Some("s"), Some(key)) => {
                let preset = Preset::from_str(key).map_err(|e| {
                    let keys = Preset::ALL.map(|p| p.key()).join(", ");
                    format!("{e} (one of: {keys})")
                })?;
                Command::Switch(preset)
            }
            (Some("s"), None) => return Err("Usage: s <preset>".into()),
            _ => return Err(format!("Unknown command '{line}' ({COMMAND_HELP})")),
        };
        if words.next().is_some() {
            return Err(format!("Unknown command '{line}' ({COMMAND_HELP})"));
        }
        Ok(command)
    }
}

enum Outcome {
    Finished,
    Cancelled,
    TaskCompleted,
}

struct Foreground {
    workspace: Workspace,
    manager: TaskManager,
    task: Task,
    registry: TimerRegistry,
    bell: bool,
}

impl Foreground {
    fn save(&self) {
        if let Err(e) = self.workspace.save_tasks(&self.manager) {
            eprintln!("\nerror: {e}");
        }
    }

    fn ring(&self) {
        if self.bell {
            print!("\x07");
        }
    }

    fn redraw(&self) {
        if let Some(handle) = self.registry.session(self.task.id) {
            print!("\r{}", render::countdown_line(&handle.snapshot()));
            let _ = std::io::stdout().flush();
        }
    }

    fn on_event(&mut self, event: SessionEvent) -> Option<Outcome> {
        match event {
            SessionEvent::Tick { .. }
            | SessionEvent::Reset { .. }
            | SessionEvent::ConfigChanged { .. } => self.redraw(),
            SessionEvent::PhaseCompleted {
                was_work_phase: true,
                ..
            } => {
                let cycles = self.manager.increment_cycles(self.task.id);
                self.save();
                self.ring();
                println!();
                println!("Work phase complete! Time for a break.");
                if let Some(cycles) = cycles {
                    println!("Completed cycles for {}: {cycles}", self.task.title);
                }
            }
            SessionEvent::PhaseCompleted {
                was_work_phase: false,
                ..
            } => {
                self.ring();
                println!();
                println!("Break complete!");
            }
            SessionEvent::CycleCompleted { .. } => {
                println!("Timer cycle complete for task: {}", self.task.title);
                return Some(Outcome::Finished);
            }
            _ => {}
        }
        None
    }

    fn on_command(&mut self, line: &str) -> Option<Outcome> {
        if line.is_empty() {
            return None;
        }
        match line.parse::<Command>() {
            Ok(command) => self.apply(command),
            Err(message) => {
                println!("\n{message}");
                None
            }
        }
    }

    fn apply(&mut self, command: Command) -> Option<Outcome> {
        let id = self.task.id;
        match command {
            Command::Pause => match self.registry.pause(id) {
                Some(_) => println!("\nTimer paused."),
                None => println!("\nTimer is not running."),
            },
            Command::Resume => match self.registry.resume(id) {
                Some(_) => println!("\nTimer resumed."),
                None => println!("\nTimer is not paused."),
            },
            Command::Reset => {
                if self.registry.reset(id).is_some() {
                    println!("\nPhase reset.");
                }
            }
            Command::Switch(preset) => {
                let config = preset.config();
                let line = format!("Strategy: {} - {}", config.name(), config.description());
                if self.registry.change_config(id, config).is_some() {
                    println!("\nSwitched preset. {line}");
                }
            }
            Command::Cancel => {
                self.registry.cancel(id);
                println!("\nTimer cancelled for task: {}", self.task.title);
                return Some(Outcome::Cancelled);
            }
            Command::Done => {
                self.registry.cancel(id);
                if let Some(index) = self.manager.tasks().iter().position(|t| t.id == id) {
                    if let Ok(task) = self.manager.complete(index) {
                        println!("\nTask marked as completed: {}", task.title);
                    }
                }
                self.save();
                return Some(Outcome::TaskCompleted);
            }
        }
        None
    }
}

async fn run_foreground(
    workspace: Workspace,
    manager: TaskManager,
    task: Task,
    config: PhaseConfig,
) -> CmdResult {
    let notifications = &workspace.config.notifications;
    let bell = notifications.enabled && notifications.bell;
    let mut fg = Foreground {
        registry: TimerRegistry::new(Handle::current()),
        workspace,
        manager,
        task,
        bell,
    };

    println!("Timer started for task: {}", fg.task.title);
    println!("Strategy: {} - {}", config.name(), config.description());
    println!("Commands: {COMMAND_HELP}");

    let handle = fg.registry.start_timer(&fg.task, config);
    let (tx, mut events) = mpsc::unbounded_channel();
    handle.set_listener(move |event: &SessionEvent| {
        let _ = tx.send(event.clone());
    });
    fg.redraw();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        tokio::select! {
            Some(event) = events.recv() => {
                if let Some(outcome) = fg.on_event(event) {
                    break outcome;
                }
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if let Some(outcome) = fg.on_command(line.trim()) {
                        break outcome;
                    }
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    debug!(error = %e, "stdin closed");
                    stdin_open = false;
                }
            },
            _ = &mut ctrl_c => {
                fg.registry.cancel(fg.task.id);
                println!("\nTimer cancelled for task: {}", fg.task.title);
                break Outcome::Cancelled;
            }
        }
    };

    if !matches!(outcome, Outcome::Cancelled) {
        println!("Progress: {:.1}%", fg.manager.completion_rate());
    }
    fg.registry.clear_all();
    Ok(())
}
