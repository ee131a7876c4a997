//! Graph Tasks
//!
//! Task tracking on top of a property graph:
//! - Neo4j stores tasks as nodes and completion reports as `DONE` edges
//! - A typed query model and a schema-driven row decoder bridge the
//!   dynamically typed graph and the task records
//! - A thin service layer assigns identifiers and forwards to storage

pub mod neo4j;
pub mod tasks;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub neo4j: Neo4jYamlConfig,
    pub storage: StorageYamlConfig,
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Database holding the task graph; the server default when absent
    pub database: Option<String>,
    pub max_connections: usize,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "graphtasks123".into(),
            database: None,
            max_connections: 16,
        }
    }
}

/// Storage configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageYamlConfig {
    pub query_timeout_secs: u64,
}

impl Default for StorageYamlConfig {
    fn default() -> Self {
        Self {
            query_timeout_secs: 10,
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub neo4j_database: Option<String>,
    pub max_connections: usize,
    pub query_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        // 1. Load YAML config (or defaults if file not found)
        let yaml = Self::load_yaml(yaml_path);

        // 2. Build Config with env var overrides
        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            neo4j_database: std::env::var("NEO4J_DATABASE")
                .ok()
                .or(yaml.neo4j.database),
            max_connections: std::env::var("NEO4J_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.neo4j.max_connections),
            query_timeout_secs: std::env::var("QUERY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.storage.query_timeout_secs),
        })
    }

    /// Bound applied to each graph query
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub neo4j: Arc<dyn neo4j::GraphStore>,
    pub tasks: Arc<tasks::TaskManager>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state with all services initialized
    pub async fn new(config: Config) -> Result<Self> {
        let neo4j: Arc<dyn neo4j::GraphStore> =
            Arc::new(neo4j::client::Neo4jClient::new(&config).await?);
        Ok(Self::with_graph(neo4j, config))
    }

    /// Build the services over an already connected graph backend
    pub fn with_graph(neo4j: Arc<dyn neo4j::GraphStore>, config: Config) -> Self {
        let storage = Arc::new(
            tasks::GraphTaskStorage::new(neo4j.clone()).with_query_timeout(config.query_timeout()),
        );
        let tasks = Arc::new(tasks::TaskManager::new(storage.clone(), storage));

        Self {
            neo4j,
            tasks,
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
