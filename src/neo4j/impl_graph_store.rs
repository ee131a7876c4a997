//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::models::GraphRow;
use super::query::GraphQuery;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn execute(&self, query: &GraphQuery) -> anyhow::Result<Vec<GraphRow>> {
        self.execute(query).await
    }

    async fn run(&self, query: &GraphQuery) -> anyhow::Result<()> {
        self.run(query).await
    }
}
