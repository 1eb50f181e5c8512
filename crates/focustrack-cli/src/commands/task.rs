//! Task management commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;

use super::{CmdResult, Workspace};
use crate::render;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of the list
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List tasks with their indices
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Change a task's title and/or description
    Edit {
        /// Task index as shown by `task list`
        index: usize,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task index as shown by `task list`
        index: usize,
    },
    /// Mark a task as completed
    Complete {
        /// Task index as shown by `task list`
        index: usize,
    },
}

pub fn run(action: TaskAction, tasks_file: Option<PathBuf>) -> CmdResult {
    let workspace = Workspace::open(tasks_file)?;
    let mut manager = workspace.load_tasks();

    match action {
        TaskAction::Add { title, description } => {
            let task = manager.add(title, description)?;
            println!("Task added: {}", task.title);
            let index = manager.len() - 1;
            workspace.save_tasks(&manager)?;
            println!("Index: {index}");
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(manager.tasks())?);
            } else {
                print!("{}", render::task_list(&manager, None));
            }
        }
        TaskAction::Edit {
            index,
            title,
            description,
        } => {
            let current = manager.get(index)?;
            let title = title.unwrap_or_else(|| current.title.clone());
            let description = description.unwrap_or_else(|| current.description.clone());
            let task = manager.edit(index, title, description)?;
            println!("Task updated: {}", task.title);
            workspace.save_tasks(&manager)?;
        }
        TaskAction::Delete { index } => {
            let task = manager.delete(index)?;
            println!("Task deleted: {}", task.title);
            workspace.save_tasks(&manager)?;
        }
        TaskAction::Complete { index } => {
            let task = manager.complete(index)?;
            println!("Task marked as completed: {}", task.title);
            println!("Progress: {:.1}%", manager.completion_rate());
            workspace.save_tasks(&manager)?;
        }
    }
    Ok(())
}
