//! Typed graph statements and their Cypher rendering
//!
//! A [`GraphQuery`] describes one parameterized statement against the
//! property graph. Labels, edge types and property names are `&'static str`
//! constants chosen by the caller; user data only ever travels as parameters.
//! The Neo4j client renders queries with [`GraphQuery::cypher`] and binds
//! [`GraphQuery::params`], while the in-memory mock interprets them directly.

use super::models::GraphValue;

/// Column returned by [`GraphQuery::CreateRelated`]: number of nodes created
pub const CREATED_COLUMN: &str = "created";

/// Alias of the matched node in rendered Cypher
const NODE_ALIAS: &str = "n";
/// Alias of the related node in rendered Cypher
const TARGET_ALIAS: &str = "m";
/// Prefix of parameters used in WHERE clauses
const MATCH_PARAM_PREFIX: &str = "match_";

/// Ordered list of property name / value pairs
pub type Properties = Vec<(&'static str, GraphValue)>;

/// Node pattern: a label and an optional equality filter on one property
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMatch {
    pub label: &'static str,
    pub filter: Option<(&'static str, GraphValue)>,
}

impl NodeMatch {
    /// Every node with the label
    pub fn label(label: &'static str) -> Self {
        Self {
            label,
            filter: None,
        }
    }

    /// Nodes with the label whose `property` equals `value`
    pub fn by_property(
        label: &'static str,
        property: &'static str,
        value: impl Into<GraphValue>,
    ) -> Self {
        Self {
            label,
            filter: Some((property, value.into())),
        }
    }

    fn where_clause(&self, alias: &str) -> String {
        match &self.filter {
            Some((property, _)) => format!(
                " WHERE {alias}.{property} = ${MATCH_PARAM_PREFIX}{property}"
            ),
            None => String::new(),
        }
    }

    fn param(&self) -> Option<(String, &GraphValue)> {
        self.filter
            .as_ref()
            .map(|(property, value)| (format!("{MATCH_PARAM_PREFIX}{property}"), value))
    }
}

/// A single parameterized graph statement
#[derive(Debug, Clone, PartialEq)]
pub enum GraphQuery {
    /// Create one node carrying the given properties
    CreateNode {
        label: &'static str,
        properties: Properties,
    },

    /// Match nodes and project some of their properties as columns
    MatchNodes {
        node: NodeMatch,
        returns: Vec<&'static str>,
    },

    /// Match nodes, then create a new node related from each match.
    ///
    /// Returns a single row with [`CREATED_COLUMN`] holding the number of
    /// nodes created (zero when nothing matched).
    CreateRelated {
        node: NodeMatch,
        edge: &'static str,
        target: &'static str,
        properties: Properties,
    },

    /// Follow an outgoing edge from matched nodes and project properties of
    /// the related nodes
    MatchRelated {
        node: NodeMatch,
        edge: &'static str,
        target: &'static str,
        returns: Vec<&'static str>,
        order_by: Option<&'static str>,
    },
}

impl GraphQuery {
    /// Whether the statement writes to the graph
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            GraphQuery::CreateNode { .. } | GraphQuery::CreateRelated { .. }
        )
    }

    /// Names of the columns the statement returns
    pub fn columns(&self) -> Vec<&'static str> {
        match self {
            GraphQuery::CreateNode { .. } => Vec::new(),
            GraphQuery::MatchNodes { returns, .. } | GraphQuery::MatchRelated { returns, .. } => {
                returns.clone()
            }
            GraphQuery::CreateRelated { .. } => vec![CREATED_COLUMN],
        }
    }

    /// Render the statement as Cypher
    pub fn cypher(&self) -> String {
        match self {
            GraphQuery::CreateNode { label, properties } => format!(
                "CREATE ({NODE_ALIAS}:{label} {})",
                property_map(properties)
            ),
            GraphQuery::MatchNodes { node, returns } => format!(
                "MATCH ({NODE_ALIAS}:{}){} RETURN {}",
                node.label,
                node.where_clause(NODE_ALIAS),
                projection(NODE_ALIAS, returns)
            ),
            GraphQuery::CreateRelated {
                node,
                edge,
                target,
                properties,
            } => format!(
                "MATCH ({NODE_ALIAS}:{}){} CREATE ({NODE_ALIAS})-[:{edge}]->({TARGET_ALIAS}:{target} {}) RETURN count({TARGET_ALIAS}) AS {CREATED_COLUMN}",
                node.label,
                node.where_clause(NODE_ALIAS),
                property_map(properties)
            ),
            GraphQuery::MatchRelated {
                node,
                edge,
                target,
                returns,
                order_by,
            } => {
                let mut cypher = format!(
                    "MATCH ({NODE_ALIAS}:{})-[:{edge}]->({TARGET_ALIAS}:{target}){} RETURN {}",
                    node.label,
                    node.where_clause(NODE_ALIAS),
                    projection(TARGET_ALIAS, returns)
                );
                if let Some(order) = order_by {
                    cypher.push_str(&format!(" ORDER BY {TARGET_ALIAS}.{order}"));
                }
                cypher
            }
        }
    }

    /// Parameters to bind, by name
    pub fn params(&self) -> Vec<(String, &GraphValue)> {
        let mut params = Vec::new();
        match self {
            GraphQuery::CreateNode { properties, .. } => {
                params.extend(properties.iter().map(|(k, v)| (k.to_string(), v)));
            }
            GraphQuery::MatchNodes { node, .. } | GraphQuery::MatchRelated { node, .. } => {
                params.extend(node.param());
            }
            GraphQuery::CreateRelated {
                node, properties, ..
            } => {
                params.extend(node.param());
                params.extend(properties.iter().map(|(k, v)| (k.to_string(), v)));
            }
        }
        params
    }
}

/// `{a: $a, b: $b}`
fn property_map(properties: &Properties) -> String {
    let entries: Vec<String> = properties
        .iter()
        .map(|(k, _)| format!("{k}: ${k}"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// `n.a AS a, n.b AS b`
fn projection(alias: &str, returns: &[&'static str]) -> String {
    returns
        .iter()
        .map(|p| format!("{alias}.{p} AS {p}"))
        .collect::<Vec<_>>()
        .join(", ")
}
