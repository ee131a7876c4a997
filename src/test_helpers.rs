//! Test helper factories and mock storage builders
//!
//! Provides convenience functions for creating test objects with sensible defaults,
//! and helpers for building storages and managers over the in-memory graph.
#![allow(dead_code)]

use crate::neo4j::mock::MockGraphStore;
use crate::tasks::*;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

// ============================================================================
// Mock storage builders
// ============================================================================

/// A task storage over an empty in-memory graph, plus the graph for inspection
pub fn mock_graph_storage() -> (Arc<MockGraphStore>, GraphTaskStorage) {
    let graph = Arc::new(MockGraphStore::new());
    let storage = GraphTaskStorage::new(graph.clone());
    (graph, storage)
}

/// A task manager over an empty in-memory graph
pub fn mock_task_manager() -> (Arc<MockGraphStore>, TaskManager) {
    let graph = Arc::new(MockGraphStore::new());
    let storage = Arc::new(GraphTaskStorage::new(graph.clone()));
    (graph, TaskManager::new(storage.clone(), storage))
}

/// A task manager over a pre-configured graph
pub fn task_manager_over(graph: MockGraphStore) -> TaskManager {
    let storage = Arc::new(GraphTaskStorage::new(Arc::new(graph)));
    TaskManager::new(storage.clone(), storage)
}

// ============================================================================
// Factories
// ============================================================================

pub fn test_task_builder() -> TaskBuilder {
    TaskBuilder::new(
        "Beniamin",
        "Very hard task",
        Utc::now() + Duration::hours(24),
    )
}

pub fn test_task() -> Task {
    test_task_builder().into_task()
}

pub fn test_task_by(author: &str) -> Task {
    TaskBuilder {
        author: author.to_string(),
        ..test_task_builder()
    }
    .into_task()
}

pub fn test_task_with_deadline(deadline: DateTime<Utc>) -> Task {
    TaskBuilder {
        deadline,
        ..test_task_builder()
    }
    .into_task()
}

pub fn test_report(by: &str) -> Report {
    Report::new(by, Utc::now())
}
