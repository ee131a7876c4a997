//! In-memory mock implementation of GraphStore for testing.
//!
//! Keeps a small property graph (labelled nodes with properties, labelled
//! directed edges) behind `tokio::sync::RwLock`s and interprets each
//! [`GraphQuery`] against it with the same semantics as the Cypher rendering:
//! projecting a property a node does not have yields `Null`.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::models::{GraphRow, GraphValue};
use crate::neo4j::query::{GraphQuery, NodeMatch, Properties, CREATED_COLUMN};
use crate::neo4j::traits::GraphStore;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// A node of the mock graph
#[derive(Debug, Clone, PartialEq)]
pub struct MockNode {
    pub id: usize,
    pub label: String,
    pub properties: BTreeMap<String, GraphValue>,
}

/// A directed edge of the mock graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockEdge {
    pub from: usize,
    pub to: usize,
    pub label: String,
}

/// In-memory mock implementation of GraphStore for testing.
#[derive(Default)]
pub struct MockGraphStore {
    pub nodes: RwLock<Vec<MockNode>>,
    pub edges: RwLock<Vec<MockEdge>>,
    /// Every statement received, in order
    pub queries: RwLock<Vec<GraphQuery>>,
    /// When set, every call fails with this message
    pub failure: RwLock<Option<String>>,
    /// Artificial delay applied before each call
    pub latency: RwLock<Option<Duration>>,
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Builder / seeding methods for tests
    // ========================================================================

    /// Seed a node with arbitrary properties, bypassing any domain mapping
    pub async fn with_node(self, label: &str, properties: Vec<(&str, GraphValue)>) -> Self {
        self.insert_node(
            label,
            properties
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
        .await;
        self
    }

    /// Make every subsequent call fail
    pub async fn with_failure(self, message: &str) -> Self {
        *self.failure.write().await = Some(message.to_string());
        self
    }

    /// Delay every subsequent call
    pub async fn with_latency(self, latency: Duration) -> Self {
        *self.latency.write().await = Some(latency);
        self
    }

    // ========================================================================
    // Inspection helpers
    // ========================================================================

    /// Nodes carrying the label
    pub async fn nodes_with_label(&self, label: &str) -> Vec<MockNode> {
        self.nodes
            .read()
            .await
            .iter()
            .filter(|n| n.label == label)
            .cloned()
            .collect()
    }

    /// Nodes reached from `from` through edges with the label
    pub async fn related(&self, from: usize, edge: &str) -> Vec<MockNode> {
        let edges = self.edges.read().await;
        let nodes = self.nodes.read().await;
        edges
            .iter()
            .filter(|e| e.from == from && e.label == edge)
            .filter_map(|e| nodes.iter().find(|n| n.id == e.to).cloned())
            .collect()
    }

    pub async fn recorded_queries(&self) -> Vec<GraphQuery> {
        self.queries.read().await.clone()
    }

    // ========================================================================
    // Interpretation
    // ========================================================================

    async fn insert_node(&self, label: &str, properties: BTreeMap<String, GraphValue>) -> usize {
        let mut nodes = self.nodes.write().await;
        let id = nodes.len();
        nodes.push(MockNode {
            id,
            label: label.to_string(),
            properties,
        });
        id
    }

    async fn matching(&self, pattern: &NodeMatch) -> Vec<MockNode> {
        self.nodes
            .read()
            .await
            .iter()
            .filter(|n| n.label == pattern.label)
            .filter(|n| match &pattern.filter {
                Some((property, value)) => n.properties.get(*property) == Some(value),
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn before_call(&self, query: &GraphQuery) -> Result<()> {
        self.queries.write().await.push(query.clone());
        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.failure.read().await.as_ref() {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }

    async fn interpret(&self, query: &GraphQuery) -> Result<Vec<GraphRow>> {
        self.before_call(query).await?;

        match query {
            GraphQuery::CreateNode { label, properties } => {
                self.insert_node(label, to_property_map(properties)).await;
                Ok(Vec::new())
            }
            GraphQuery::MatchNodes { node, returns } => Ok(self
                .matching(node)
                .await
                .iter()
                .map(|n| project(n, returns))
                .collect()),
            GraphQuery::CreateRelated {
                node,
                edge,
                target,
                properties,
            } => {
                let sources = self.matching(node).await;
                for source in &sources {
                    let to = self
                        .insert_node(target, to_property_map(properties))
                        .await;
                    self.edges.write().await.push(MockEdge {
                        from: source.id,
                        to,
                        label: edge.to_string(),
                    });
                }
                Ok(vec![
                    GraphRow::new().with(CREATED_COLUMN, sources.len() as i64)
                ])
            }
            GraphQuery::MatchRelated {
                node,
                edge,
                target,
                returns,
                order_by,
            } => {
                let mut related = Vec::new();
                for source in self.matching(node).await {
                    related.extend(
                        self.related(source.id, edge)
                            .await
                            .into_iter()
                            .filter(|n| n.label == *target),
                    );
                }
                if let Some(order) = order_by {
                    related.sort_by(|a, b| {
                        compare(a.properties.get(*order), b.properties.get(*order))
                    });
                }
                Ok(related.iter().map(|n| project(n, returns)).collect())
            }
        }
    }
}

fn to_property_map(properties: &Properties) -> BTreeMap<String, GraphValue> {
    properties
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn project(node: &MockNode, returns: &[&'static str]) -> GraphRow {
    returns
        .iter()
        .map(|p| {
            (
                *p,
                node.properties.get(*p).cloned().unwrap_or(GraphValue::Null),
            )
        })
        .collect()
}

fn compare(a: Option<&GraphValue>, b: Option<&GraphValue>) -> Ordering {
    match (a, b) {
        (Some(GraphValue::Integer(x)), Some(GraphValue::Integer(y))) => x.cmp(y),
        (Some(GraphValue::String(x)), Some(GraphValue::String(y))) => x.cmp(y),
        // Cypher sorts nulls last
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn execute(&self, query: &GraphQuery) -> Result<Vec<GraphRow>> {
        self.interpret(query).await
    }

    async fn run(&self, query: &GraphQuery) -> Result<()> {
        self.interpret(query).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_task(id: &str) -> GraphQuery {
        GraphQuery::CreateNode {
            label: "Task",
            properties: vec![("taskID", id.into()), ("author", "a".into())],
        }
    }

    #[tokio::test]
    async fn test_create_and_match_nodes() {
        let store = MockGraphStore::new();
        store.run(&create_task("t1")).await.unwrap();
        store.run(&create_task("t2")).await.unwrap();

        let rows = store
            .execute(&GraphQuery::MatchNodes {
                node: NodeMatch::by_property("Task", "taskID", "t2"),
                returns: vec!["taskID", "author"],
            })
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("taskID"), Some(&GraphValue::from("t2")));
        assert_eq!(rows[0].get("author"), Some(&GraphValue::from("a")));
    }

    #[tokio::test]
    async fn test_missing_property_projects_null() {
        let store = MockGraphStore::new();
        store.run(&create_task("t1")).await.unwrap();

        let rows = store
            .execute(&GraphQuery::MatchNodes {
                node: NodeMatch::label("Task"),
                returns: vec!["comment"],
            })
            .await
            .unwrap();

        assert_eq!(rows[0].get("comment"), Some(&GraphValue::Null));
    }

    #[tokio::test]
    async fn test_create_related_counts_matches() {
        let store = MockGraphStore::new();
        store.run(&create_task("t1")).await.unwrap();

        let link = |id: &str| GraphQuery::CreateRelated {
            node: NodeMatch::by_property("Task", "taskID", id),
            edge: "DONE",
            target: "Report",
            properties: vec![("by", "m".into())],
        };

        let rows = store.execute(&link("t1")).await.unwrap();
        assert_eq!(rows[0].get(CREATED_COLUMN), Some(&GraphValue::Integer(1)));

        let rows = store.execute(&link("missing")).await.unwrap();
        assert_eq!(rows[0].get(CREATED_COLUMN), Some(&GraphValue::Integer(0)));

        assert_eq!(store.nodes_with_label("Report").await.len(), 1);
        assert_eq!(store.related(0, "DONE").await.len(), 1);
    }

    #[tokio::test]
    async fn test_match_related_orders_results() {
        let store = MockGraphStore::new();
        store.run(&create_task("t1")).await.unwrap();
        for at in [30_i64, 10, 20] {
            store
                .run(&GraphQuery::CreateRelated {
                    node: NodeMatch::by_property("Task", "taskID", "t1"),
                    edge: "DONE",
                    target: "Report",
                    properties: vec![("at", at.into())],
                })
                .await
                .unwrap();
        }

        let rows = store
            .execute(&GraphQuery::MatchRelated {
                node: NodeMatch::by_property("Task", "taskID", "t1"),
                edge: "DONE",
                target: "Report",
                returns: vec!["at"],
                order_by: Some("at"),
            })
            .await
            .unwrap();

        let ats: Vec<i64> = rows
            .iter()
            .filter_map(|r| r.get("at").and_then(GraphValue::as_i64))
            .collect();
        assert_eq!(ats, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_failure_is_reported_and_recorded() {
        let store = MockGraphStore::new().with_failure("connection reset").await;

        let err = store.run(&create_task("t1")).await.unwrap_err();

        assert_eq!(err.to_string(), "connection reset");
        assert_eq!(store.recorded_queries().await.len(), 1);
        assert!(store.nodes_with_label("Task").await.is_empty());
    }
}
