//! Task domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub author: String,
    pub comment: String,
    pub deadline: DateTime<Utc>,
}

/// Everything needed to create a task, except its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBuilder {
    pub author: String,
    pub comment: String,
    pub deadline: DateTime<Utc>,
}

/// Who completed a task, and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub by: String,
    pub at: DateTime<Utc>,
}

impl TaskBuilder {
    pub fn new(
        author: impl Into<String>,
        comment: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            author: author.into(),
            comment: comment.into(),
            deadline,
        }
    }

    /// Turn the request into a task with a fresh UUID v4 identifier.
    ///
    /// Does not touch storage.
    pub fn into_task(self) -> Task {
        Task {
            id: Uuid::new_v4().to_string(),
            author: self.author,
            comment: self.comment,
            deadline: self.deadline,
        }
    }
}

impl Report {
    pub fn new(by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self { by: by.into(), at }
    }
}
