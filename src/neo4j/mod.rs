//! Neo4j client, typed graph queries and row decoding

pub mod client;
pub mod decode;
mod impl_graph_store;
pub mod models;
pub mod query;
pub mod traits;

pub use client::Neo4jClient;
pub use decode::{decode_row, decode_rows, Column, DecodeError, FromGraphRow, RowReader};
pub use models::*;
pub use query::{GraphQuery, NodeMatch};
pub use traits::GraphStore;

#[cfg(test)]
pub(crate) mod mock;
