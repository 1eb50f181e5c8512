//! Task persistence.
//!
//! The on-disk format is one task per line:
//!
//! ```text
//! title|description|STATUS|completedCycles
//! ```
//!
//! `STATUS` is `PENDING` or `COMPLETED`. Fields are written raw, so a title
//! or description containing `|` or a line break cannot be stored and is
//! rejected on save. Lines with fewer than three fields or an unknown status
//! are skipped; a bad cycle count loads as zero. A missing file is an empty
//! list.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, error, warn};

use crate::error::{Result, StoreError, ValidationError};
use crate::task::{Task, TaskStatus};

/// Loads and saves the ordered task list.
pub trait TaskStore: Send + Sync {
    fn load(&self) -> Result<Vec<Task>>;

    fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// Pipe-delimited text file store.
#[derive(Debug, Clone)]
pub struct TextFileStore {
    path: PathBuf,
}

impl TextFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for TextFileStore {
    fn load(&self) -> Result<Vec<Task>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no tasks file, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::ReadFailed {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };

        let mut tasks = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            match decode_line(line) {
                Some(task) => tasks.push(task),
                None if line.trim().is_empty() => {}
                None => warn!(line = line_no + 1, "skipping malformed task line"),
            }
        }
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let write_failed = |source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        let mut content = String::new();
        for task in tasks {
            content.push_str(&encode_line(task)?);
            content.push('\n');
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
        }

        if let Err(source) = std::fs::write(&self.path, content) {
            error!(path = %self.path.display(), error = %source, "failed to save tasks");
            return Err(write_failed(source).into());
        }
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// Keeps the list in memory. Used by tests and demo mode.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Result<Vec<Task>> {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(tasks
            .iter()
            .map(|t| Task::restore(&t.title, &t.description, t.status(), t.completed_cycles()))
            .collect())
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let mut stored = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        *stored = tasks.to_vec();
        Ok(())
    }
}

// ── Line codec ───────────────────────────────────────────────────────

/// Fails when `value` holds a character the line format uses as a
/// separator.
pub fn check_field(field: &str, value: &str) -> Result<(), ValidationError> {
    match value.chars().find(|c| matches!(c, '|' | '\n' | '\r')) {
        Some(c) => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("{c:?} cannot be stored in the task file"),
        }),
        None => Ok(()),
    }
}

pub fn encode_line(task: &Task) -> Result<String, ValidationError> {
    check_field("title", &task.title)?;
    check_field("description", &task.description)?;
    Ok(format!(
        "{}|{}|{}|{}",
        task.title,
        task.description,
        task.status().as_token(),
        task.completed_cycles()
    ))
}

pub fn decode_line(line: &str) -> Option<Task> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < 3 {
        return None;
    }
    let status = TaskStatus::from_token(fields[2].trim())?;
    let cycles = fields
        .get(3)
        .and_then(|c| c.trim().parse::<u32>().ok())
        .unwrap_or(0);
    Some(Task::restore(fields[0], fields[1], status, cycles))
}
