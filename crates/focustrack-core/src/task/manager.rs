//! Ordered task list with index-based editing.

use tracing::{info, warn};

use super::{Task, TaskId, TaskStatus};
use crate::error::{Result, ValidationError};
use crate::storage::task_file::check_field;
use crate::storage::TaskStore;

/// In-memory task list. Owned by the entry point and passed where needed.
#[derive(Debug, Clone, Default)]
pub struct TaskManager {
    tasks: Vec<Task>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Load from a store, falling back to an empty list when the store fails.
    pub fn load_from(store: &dyn TaskStore) -> Self {
        match store.load() {
            Ok(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                Self::with_tasks(tasks)
            }
            Err(e) => {
                warn!(error = %e, "could not load tasks, starting with an empty list");
                Self::new()
            }
        }
    }

    /// Persist through a store. Failures are returned, not retried.
    pub fn save_to(&self, store: &dyn TaskStore) -> Result<()> {
        store.save(&self.tasks)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Task, ValidationError> {
        let len = self.tasks.len();
        self.tasks
            .get(index)
            .ok_or(ValidationError::InvalidIndex { index, len })
    }

    pub fn get_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Percentage (0.0 ..= 100.0) of tasks marked completed.
    pub fn completion_rate(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        let completed = self
            .tasks
            .iter()
            .filter(|t| t.status() == TaskStatus::Completed)
            .count();
        completed as f64 * 100.0 / self.tasks.len() as f64
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a task. Titles and descriptions must fit on one task-file
    /// line: no `|` and no line breaks.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&Task, ValidationError> {
        let (title, description) = (title.into(), description.into());
        check_field("title", &title)?;
        check_field("description", &description)?;
        Ok(self.push(Task::new(title, description)))
    }

    pub fn push(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    pub fn edit(
        &mut self,
        index: usize,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&Task, ValidationError> {
        let (title, description) = (title.into(), description.into());
        let task = self.get_mut(index)?;
        check_field("title", &title)?;
        check_field("description", &description)?;
        task.title = title;
        task.description = description;
        Ok(task)
    }

    pub fn delete(&mut self, index: usize) -> Result<Task, ValidationError> {
        self.get(index)?;
        Ok(self.tasks.remove(index))
    }

    pub fn complete(&mut self, index: usize) -> Result<&Task, ValidationError> {
        let task = self.get_mut(index)?;
        task.mark_completed();
        Ok(task)
    }

    /// Bump the cycle count of the task with `id`. Returns the new count, or
    /// `None` when the task has been removed meanwhile.
    pub fn increment_cycles(&mut self, id: TaskId) -> Option<u32> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.increment_cycles();
        Some(task.completed_cycles())
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Task, ValidationError> {
        let len = self.tasks.len();
        self.tasks
            .get_mut(index)
            .ok_or(ValidationError::InvalidIndex { index, len })
    }
}
