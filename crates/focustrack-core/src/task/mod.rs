//! Task model.
//!
//! A task carries a title, a description, a completion status and the number
//! of work phases completed against it. Identity is a process-local
//! [`TaskId`]; two tasks with identical fields are still different tasks.

mod manager;

pub use manager::TaskManager;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a task within one process.
///
/// Not persisted: the text store regenerates ids on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion status.
///
/// Pending -> Completed is the only transition; it cannot be undone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    /// Token used by the text store.
    pub fn as_token(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "PENDING" => Some(TaskStatus::Pending),
            "COMPLETED" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    status: TaskStatus,
    completed_cycles: u32,
}

impl Task {
    /// New pending task with zero completed cycles.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            completed_cycles: 0,
        }
    }

    /// Rebuild a task from stored fields. A fresh id is assigned.
    pub fn restore(
        title: impl Into<String>,
        description: impl Into<String>,
        status: TaskStatus,
        completed_cycles: u32,
    ) -> Self {
        Self {
            status,
            completed_cycles,
            ..Self::new(title, description)
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
    }

    /// Record one finished work phase. Saturates rather than wrapping.
    pub fn increment_cycles(&mut self) {
        self.completed_cycles = self.completed_cycles.saturating_add(1);
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} [{}] ({} cycles)",
            self.title, self.description, self.status, self.completed_cycles
        )
    }
}
