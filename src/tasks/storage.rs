//! Storage capabilities consumed by the task manager

use super::models::{Report, Task};
use crate::neo4j::DecodeError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for task storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors returned by task storage implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend is unreachable or rejected a write
    #[error("failed to commit graph mutation: {0:#}")]
    Commit(anyhow::Error),

    /// The backend failed to run a query
    #[error("graph query failed: {0:#}")]
    Query(anyhow::Error),

    /// A result row does not have the expected shape
    #[error("failed to read data from storage: {0}")]
    Decode(#[from] DecodeError),

    /// No task has the identifier
    #[error("there is no task with id={0}")]
    NotFound(String),

    /// The backend did not answer in time
    #[error("graph query timed out after {0:?}")]
    Timeout(Duration),
}

/// Persistence of single tasks and their completion reports.
#[async_trait]
pub trait TaskStorage: Send + Sync {
    /// Stores a new, fully populated task.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Commit`] when the write does not go through.
    async fn add(&self, task: &Task) -> StorageResult<()>;

    /// Fetches a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no task has the identifier and
    /// [`StorageError::Decode`] when the stored task is malformed.
    async fn get(&self, id: &str) -> StorageResult<Task>;

    /// Records that the task was completed. Every call appends a new report.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no task has the identifier.
    async fn done(&self, id: &str, report: &Report) -> StorageResult<()>;

    /// Reports recorded for a task, oldest first.
    ///
    /// Unknown identifiers yield an empty list.
    async fn reports(&self, id: &str) -> StorageResult<Vec<Report>>;
}

/// Bulk listing of tasks.
#[async_trait]
pub trait TaskLister: Send + Sync {
    /// Every stored task, in backend order.
    ///
    /// # Errors
    ///
    /// Fails with [`StorageError::Decode`] if any task is malformed; no
    /// partial list is returned.
    async fn all(&self) -> StorageResult<Vec<Task>>;

    /// Tasks created by `author`. Not implemented: always empty.
    async fn of_author(&self, author: &str) -> StorageResult<Vec<Task>>;

    /// Tasks completed by `doer`. Not implemented: always empty.
    async fn done_by(&self, doer: &str) -> StorageResult<Vec<Task>>;
}
