//! Tasks and their completion reports
//!
//! - [`models`]: `Task`, `TaskBuilder`, `Report`
//! - [`storage`]: `TaskStorage` / `TaskLister` capabilities and `StorageError`
//! - [`graph`]: `GraphTaskStorage`, the property-graph implementation of both
//! - [`manager`]: `TaskManager`, the service layer

pub mod graph;
pub mod manager;
pub mod models;
pub mod storage;

pub use graph::GraphTaskStorage;
pub use manager::TaskManager;
pub use models::*;
pub use storage::{StorageError, StorageResult, TaskLister, TaskStorage};
