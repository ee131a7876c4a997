//! Neo4j client for interacting with the task graph

use super::models::{GraphRow, GraphValue};
use super::query::GraphQuery;
use crate::Config;
use anyhow::{anyhow, Context, Result};
use neo4rs::{query, BoltNull, BoltType, ConfigBuilder, Graph, Query, Row};
use std::sync::Arc;
use std::time::Duration;

/// Client for Neo4j operations.
///
/// Wraps a `neo4rs::Graph`, which is itself a pool of Bolt connections, so a
/// single client can be shared between concurrent callers through an `Arc`.
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

impl Neo4jClient {
    /// Connect to Neo4j using the application configuration
    pub async fn new(config: &Config) -> Result<Self> {
        let mut builder = ConfigBuilder::default()
            .uri(config.neo4j_uri.as_str())
            .user(config.neo4j_user.as_str())
            .password(config.neo4j_password.as_str())
            .max_connections(config.max_connections);
        if let Some(db) = &config.neo4j_database {
            builder = builder.db(db.as_str());
        }
        let neo4j_config = builder.build().context("Invalid Neo4j configuration")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to connect to Neo4j")?;
        tracing::info!("Connected to Neo4j at {}", config.neo4j_uri);

        let client = Self::from_graph(Arc::new(graph));

        // Initialize schema
        client.init_schema(config.query_timeout()).await?;

        Ok(client)
    }

    /// Build a client around an existing connection pool
    pub fn from_graph(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// Initialize the graph schema with constraints and indexes.
    ///
    /// Each statement is bounded by `timeout`; failures only warn.
    async fn init_schema(&self, timeout: Duration) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT task_id IF NOT EXISTS FOR (t:Task) REQUIRE t.taskID IS UNIQUE",
        ];

        let indexes = vec!["CREATE INDEX report_by IF NOT EXISTS FOR (r:Report) ON (r.by)"];

        for constraint in constraints {
            match tokio::time::timeout(timeout, self.graph.run(query(constraint))).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Constraint may already exist: {}", e),
                Err(_) => tracing::warn!("Creating constraint timed out after {:?}", timeout),
            }
        }

        for index in indexes {
            match tokio::time::timeout(timeout, self.graph.run(query(index))).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Index may already exist: {}", e),
                Err(_) => tracing::warn!("Creating index timed out after {:?}", timeout),
            }
        }

        Ok(())
    }

    /// Run a statement and collect its rows
    pub async fn execute(&self, q: &GraphQuery) -> Result<Vec<GraphRow>> {
        let columns = q.columns();
        let mut result = self
            .graph
            .execute(to_neo4j_query(q)?)
            .await
            .with_context(|| format!("Query failed: {}", q.cypher()))?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row_from_bolt(&row, &columns));
        }
        Ok(rows)
    }

    /// Run a statement, discarding its result
    pub async fn run(&self, q: &GraphQuery) -> Result<()> {
        self.graph
            .run(to_neo4j_query(q)?)
            .await
            .with_context(|| format!("Statement failed: {}", q.cypher()))?;
        Ok(())
    }
}

/// Render a typed statement into a parameterized `neo4rs` query
fn to_neo4j_query(q: &GraphQuery) -> Result<Query> {
    let mut neo4j_query = query(&q.cypher());
    for (name, value) in q.params() {
        neo4j_query = neo4j_query.param(&name, to_bolt(value)?);
    }
    Ok(neo4j_query)
}

fn to_bolt(value: &GraphValue) -> Result<BoltType> {
    Ok(match value {
        GraphValue::Null => BoltType::Null(BoltNull),
        GraphValue::Boolean(b) => BoltType::from(*b),
        GraphValue::Integer(i) => BoltType::from(*i),
        GraphValue::Float(f) => BoltType::from(*f),
        GraphValue::String(s) => BoltType::from(s.clone()),
        GraphValue::Other(kind) => return Err(anyhow!("Cannot bind a {} value as a parameter", kind)),
    })
}

fn from_bolt(value: BoltType) -> GraphValue {
    match value {
        BoltType::Null(_) => GraphValue::Null,
        BoltType::Boolean(b) => GraphValue::Boolean(b.value),
        BoltType::Integer(i) => GraphValue::Integer(i.value),
        BoltType::Float(f) => GraphValue::Float(f.value),
        BoltType::String(s) => GraphValue::String(s.value),
        BoltType::List(_) => GraphValue::Other("list"),
        BoltType::Map(_) => GraphValue::Other("map"),
        BoltType::Node(_) => GraphValue::Other("node"),
        BoltType::Relation(_) | BoltType::UnboundedRelation(_) => GraphValue::Other("relationship"),
        BoltType::Path(_) => GraphValue::Other("path"),
        BoltType::Bytes(_) => GraphValue::Other("bytes"),
        _ => GraphValue::Other("other"),
    }
}

/// Copy the expected columns out of a Bolt row; absent columns are skipped
fn row_from_bolt(row: &Row, columns: &[&'static str]) -> GraphRow {
    let mut graph_row = GraphRow::new();
    for column in columns {
        if let Ok(value) = row.get::<BoltType>(column) {
            graph_row.push(*column, from_bolt(value));
        }
    }
    graph_row
}
