//! Task storage backed by the property graph
//!
//! Each task is a `Task` node carrying `taskID`, `author`, `comment` and
//! `deadline` (epoch seconds). Completing a task creates a `Report` node with
//! `by` and `at` (epoch seconds), linked from the task by a `DONE` edge.
//! This module is the only place that knows those names.

use super::models::{Report, Task};
use super::storage::{StorageError, StorageResult, TaskLister, TaskStorage};
use crate::neo4j::decode::column_names;
use crate::neo4j::query::CREATED_COLUMN;
use crate::neo4j::{
    decode_row, decode_rows, Column, DecodeError, FromGraphRow, GraphQuery, GraphRow, GraphStore,
    NodeMatch, RowReader,
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TASK_LABEL: &str = "Task";
const TASK_ID: &str = "taskID";
const TASK_AUTHOR: &str = "author";
const TASK_COMMENT: &str = "comment";
const TASK_DEADLINE: &str = "deadline";

const REPORT_LABEL: &str = "Report";
const REPORT_BY: &str = "by";
const REPORT_AT: &str = "at";

const DONE_EDGE: &str = "DONE";

/// Default bound on a single backend call
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

impl FromGraphRow for Task {
    const COLUMNS: &'static [Column] = &[
        Column::string(TASK_ID),
        Column::string(TASK_AUTHOR),
        Column::string(TASK_COMMENT),
        Column::integer(TASK_DEADLINE),
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, DecodeError> {
        Ok(Task {
            id: row.string(TASK_ID)?,
            author: row.string(TASK_AUTHOR)?,
            comment: row.string(TASK_COMMENT)?,
            deadline: row.timestamp(TASK_DEADLINE)?,
        })
    }
}

impl FromGraphRow for Report {
    const COLUMNS: &'static [Column] = &[Column::string(REPORT_BY), Column::integer(REPORT_AT)];

    fn from_row(row: &RowReader<'_>) -> Result<Self, DecodeError> {
        Ok(Report {
            by: row.string(REPORT_BY)?,
            at: row.timestamp(REPORT_AT)?,
        })
    }
}

/// Number of nodes a `CreateRelated` statement reports
struct Created(i64);

impl FromGraphRow for Created {
    const COLUMNS: &'static [Column] = &[Column::integer(CREATED_COLUMN)];

    fn from_row(row: &RowReader<'_>) -> Result<Self, DecodeError> {
        Ok(Created(row.integer(CREATED_COLUMN)?))
    }
}

/// Task storage over any [`GraphStore`].
///
/// Implements both [`TaskStorage`] and [`TaskLister`]. Every backend call is
/// bounded by the query timeout.
pub struct GraphTaskStorage {
    graph: Arc<dyn GraphStore>,
    query_timeout: Duration,
}

impl GraphTaskStorage {
    /// Create a storage over the given backend handle
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self {
            graph,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the bound on each backend call
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn create_task_query(task: &Task) -> GraphQuery {
        GraphQuery::CreateNode {
            label: TASK_LABEL,
            properties: vec![
                (TASK_ID, task.id.as_str().into()),
                (TASK_AUTHOR, task.author.as_str().into()),
                (TASK_COMMENT, task.comment.as_str().into()),
                (TASK_DEADLINE, task.deadline.timestamp().into()),
            ],
        }
    }

    fn task_by_id_query(id: &str) -> GraphQuery {
        GraphQuery::MatchNodes {
            node: NodeMatch::by_property(TASK_LABEL, TASK_ID, id),
            returns: column_names(Task::COLUMNS),
        }
    }

    fn all_tasks_query() -> GraphQuery {
        GraphQuery::MatchNodes {
            node: NodeMatch::label(TASK_LABEL),
            returns: column_names(Task::COLUMNS),
        }
    }

    fn mark_done_query(id: &str, report: &Report) -> GraphQuery {
        GraphQuery::CreateRelated {
            node: NodeMatch::by_property(TASK_LABEL, TASK_ID, id),
            edge: DONE_EDGE,
            target: REPORT_LABEL,
            properties: vec![
                (REPORT_BY, report.by.as_str().into()),
                (REPORT_AT, report.at.timestamp().into()),
            ],
        }
    }

    fn reports_query(id: &str) -> GraphQuery {
        GraphQuery::MatchRelated {
            node: NodeMatch::by_property(TASK_LABEL, TASK_ID, id),
            edge: DONE_EDGE,
            target: REPORT_LABEL,
            returns: column_names(Report::COLUMNS),
            order_by: Some(REPORT_AT),
        }
    }

    // ========================================================================
    // Backend calls
    // ========================================================================

    async fn bounded<T>(
        &self,
        call: impl Future<Output = anyhow::Result<T>>,
        wrap: fn(anyhow::Error) -> StorageError,
    ) -> StorageResult<T> {
        match tokio::time::timeout(self.query_timeout, call).await {
            Ok(result) => result.map_err(wrap),
            Err(_) => Err(StorageError::Timeout(self.query_timeout)),
        }
    }

    async fn fetch(&self, query: &GraphQuery) -> StorageResult<Vec<GraphRow>> {
        self.bounded(self.graph.execute(query), StorageError::Query)
            .await
    }
}

#[async_trait]
impl TaskStorage for GraphTaskStorage {
    async fn add(&self, task: &Task) -> StorageResult<()> {
        tracing::debug!("Adding task {}", task.id);
        let query = Self::create_task_query(task);
        self.bounded(self.graph.run(&query), StorageError::Commit)
            .await
    }

    async fn get(&self, id: &str) -> StorageResult<Task> {
        tracing::debug!("Fetching task {}", id);
        let rows = self.fetch(&Self::task_by_id_query(id)).await?;

        let row = rows
            .first()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        Ok(decode_row(row)?)
    }

    async fn done(&self, id: &str, report: &Report) -> StorageResult<()> {
        tracing::debug!("Marking task {} done by {}", id, report.by);
        let rows = self.fetch(&Self::mark_done_query(id, report)).await?;

        let created = match rows.first() {
            Some(row) => decode_row::<Created>(row)?.0,
            None => 0,
        };
        if created == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn reports(&self, id: &str) -> StorageResult<Vec<Report>> {
        tracing::debug!("Fetching reports of task {}", id);
        let rows = self.fetch(&Self::reports_query(id)).await?;
        Ok(decode_rows(&rows)?)
    }
}

#[async_trait]
impl TaskLister for GraphTaskStorage {
    async fn all(&self) -> StorageResult<Vec<Task>> {
        let rows = self.fetch(&Self::all_tasks_query()).await?;
        tracing::debug!("Decoding {} task rows", rows.len());
        Ok(decode_rows(&rows)?)
    }

    async fn of_author(&self, author: &str) -> StorageResult<Vec<Task>> {
        tracing::debug!("Listing tasks of author {} is not supported", author);
        Ok(Vec::new())
    }

    async fn done_by(&self, doer: &str) -> StorageResult<Vec<Task>> {
        tracing::debug!("Listing tasks done by {} is not supported", doer);
        Ok(Vec::new())
    }
}
