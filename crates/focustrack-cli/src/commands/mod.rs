use std::path::PathBuf;

use focustrack_core::{Config, TaskManager, TextFileStore};

pub mod config;
pub mod demo;
pub mod task;
pub mod timer;

pub type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Loaded configuration plus the task file it resolves to.
pub struct Workspace {
    pub config: Config,
    pub store: TextFileStore,
}

impl Workspace {
    /// `tasks_file` wins over everything `Config::tasks_file` consults.
    pub fn open(tasks_file: Option<PathBuf>) -> CmdResult<Self> {
        let config = Config::load()?;
        let path = match tasks_file {
            Some(path) => path,
            None => config.tasks_file()?,
        };
        Ok(Self {
            config,
            store: TextFileStore::new(path),
        })
    }

    pub fn load_tasks(&self) -> TaskManager {
        TaskManager::load_from(&self.store)
    }

    pub fn save_tasks(&self, manager: &TaskManager) -> CmdResult {
        manager.save_to(&self.store)?;
        Ok(())
    }
}
