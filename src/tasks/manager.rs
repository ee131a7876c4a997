//! Task Manager - lifecycle operations for tasks
//!
//! Thin service layer over the storage capabilities: it assigns identifiers
//! to new tasks and forwards everything else.

use super::models::*;
use super::storage::{StorageResult, TaskLister, TaskStorage};
use std::sync::Arc;

/// Manager for task operations
pub struct TaskManager {
    lister: Arc<dyn TaskLister>,
    storage: Arc<dyn TaskStorage>,
}

impl TaskManager {
    /// Create a new task manager
    pub fn new(lister: Arc<dyn TaskLister>, storage: Arc<dyn TaskStorage>) -> Self {
        Self { lister, storage }
    }

    /// Create a task and return its generated identifier
    pub async fn new_task(&self, builder: TaskBuilder) -> StorageResult<String> {
        let task = builder.into_task();
        self.storage.add(&task).await?;
        tracing::info!("Created task {} by {}", task.id, task.author);
        Ok(task.id)
    }

    /// Get a task by ID
    pub async fn task_with_id(&self, id: &str) -> StorageResult<Task> {
        self.storage.get(id).await
    }

    /// Mark a task as done
    pub async fn done_task(&self, id: &str, report: Report) -> StorageResult<()> {
        self.storage.done(id, &report).await
    }

    /// Reports recorded for a task
    pub async fn task_reports(&self, id: &str) -> StorageResult<Vec<Report>> {
        self.storage.reports(id).await
    }

    /// List all tasks
    pub async fn all_tasks(&self) -> StorageResult<Vec<Task>> {
        self.lister.all().await
    }

    pub async fn all_tasks_of_author(&self, author: &str) -> StorageResult<Vec<Task>> {
        self.lister.of_author(author).await
    }

    pub async fn all_tasks_done_by(&self, doer: &str) -> StorageResult<Vec<Task>> {
        self.lister.done_by(doer).await
    }
}
