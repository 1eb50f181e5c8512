use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "focustrack", version, about = "Task list with per-task Pomodoro timers")]
struct Cli {
    /// Task list file (overrides config and FOCUSTRACK_TASKS_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    tasks_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Walk through the timer registry with in-memory sample tasks
    Demo {
        /// Seconds each timer runs before the next step
        #[arg(long, default_value_t = 5)]
        step_secs: u64,
    },
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("focustrack=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action, cli.tasks_file),
        Commands::Timer { action } => commands::timer::run(action, cli.tasks_file),
        Commands::Config { action } => commands::config::run(action),
        Commands::Demo { step_secs } => commands::demo::run(step_secs),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
