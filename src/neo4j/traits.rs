//! GraphStore trait definition
//!
//! Defines the abstract interface to the property-graph backend: a handle
//! that runs one parameterized [`GraphQuery`] at a time and hands back rows
//! of untyped values. `Neo4jClient` implements it over a Bolt connection
//! pool; tests use the in-memory `MockGraphStore`.

use super::models::GraphRow;
use super::query::GraphQuery;
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for graph database operations.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a statement and collect every result row
    async fn execute(&self, query: &GraphQuery) -> Result<Vec<GraphRow>>;

    /// Run a statement, discarding any result
    async fn run(&self, query: &GraphQuery) -> Result<()>;
}
