//! Social Graph
//!
//! A social-graph query and ranking engine with:
//! - Neo4j storage of users, posts, comments and their relationships
//! - Connection degree resolution over directed FOLLOWS edges
//! - Friend-of-friend connection suggestions
//! - Affinity and recency ranked feeds
//! - An idempotent ledger of follow and like actions

pub mod api;
pub mod error;
pub mod neo4j;
pub mod social;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use social::{FeedConfig, PageRequest, SocialEngine};
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    pub feed: FeedConfig,
    pub pagination: PaginationYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "social-graph".into(),
        }
    }
}

/// Pagination section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationYamlConfig {
    pub default_page_size: i64,
    /// Larger requests are rejected, not clamped
    pub max_page_size: i64,
}

impl Default for PaginationYamlConfig {
    fn default() -> Self {
        Self {
            default_page_size: social::paging::DEFAULT_PAGE_SIZE,
            max_page_size: social::paging::DEFAULT_MAX_PAGE_SIZE,
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
    pub server_port: u16,
    pub feed: FeedConfig,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Config {
    /// Load configuration from environment variables and `config.yaml` in CWD.
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let mut feed = yaml.feed;
        if let Some(decay) = std::env::var("FEED_DECAY_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            feed.decay_seconds = decay;
        }
        feed.validate().map_err(|e| anyhow!(e))?;

        let pagination = yaml.pagination;
        if pagination.default_page_size <= 0
            || pagination.max_page_size < pagination.default_page_size
        {
            return Err(anyhow!(
                "invalid pagination config: default_page_size={}, max_page_size={}",
                pagination.default_page_size,
                pagination.max_page_size
            ));
        }

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            feed,
            default_page_size: pagination.default_page_size,
            max_page_size: pagination.max_page_size,
        })
    }

    /// Resolve optional `page` / `page_size` parameters against this config
    pub fn page_request(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<PageRequest, error::SocialError> {
        PageRequest::from_optional(page, page_size, self.default_page_size, self.max_page_size)
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

impl Default for Config {
    fn default() -> Self {
        let yaml = YamlConfig::default();
        Self {
            neo4j_uri: yaml.neo4j.uri,
            neo4j_user: yaml.neo4j.user,
            neo4j_password: yaml.neo4j.password,
            server_port: yaml.server.port,
            feed: yaml.feed,
            default_page_size: yaml.pagination.default_page_size,
            max_page_size: yaml.pagination.max_page_size,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub neo4j: Arc<dyn neo4j::GraphStore>,
    pub engine: Arc<SocialEngine>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to Neo4j, ensure the schema and build the engine
    pub async fn new(config: Config) -> Result<Self> {
        let client = neo4j::client::Neo4jClient::new(
            &config.neo4j_uri,
            &config.neo4j_user,
            &config.neo4j_password,
        )
        .await?;
        Ok(Self::with_store(Arc::new(client), config))
    }

    /// Build state over an existing store
    pub fn with_store(store: Arc<dyn neo4j::GraphStore>, config: Config) -> Self {
        let engine = Arc::new(SocialEngine::new(store.clone(), config.feed.clone()));
        Self {
            neo4j: store,
            engine,
            config: Arc::new(config),
        }
    }
}

/// Connect to the database and serve the HTTP API until shutdown
pub async fn start_server(config: Config) -> Result<()> {
    let port = config.server_port;
    let state = AppState::new(config).await?;
    tracing::info!("Connected to Neo4j");

    let app = api::create_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_config_loading() {
        let yaml = r#"
server:
  port: 9090

neo4j:
  uri: bolt://db:7687
  user: admin
  password: secret

feed:
  second_degree_tier: 95
  decay_seconds: 60

pagination:
  default_page_size: 20
  max_page_size: 50
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.neo4j.uri, "bolt://db:7687");
        assert_eq!(config.feed.second_degree_tier, 95.0);
        assert_eq!(config.feed.decay_seconds, 60.0);
        // Unset keys keep their defaults
        assert_eq!(config.feed.followed_tier, 100.0);
        assert_eq!(config.feed.extended_tier, 90.0);
        assert_eq!(config.pagination.default_page_size, 20);
        assert_eq!(config.pagination.max_page_size, 50);
    }

    #[test]
    fn test_yaml_defaults() {
        let config = YamlConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.feed, FeedConfig::default());
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.pagination.max_page_size, 100);
    }

    #[test]
    fn test_page_request_from_config() {
        let config = Config {
            default_page_size: 20,
            max_page_size: 50,
            ..Default::default()
        };
        let req = config.page_request(None, None).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), 20);
        assert!(config.page_request(Some(1), Some(51)).is_err());
        assert!(config.page_request(Some(0), None).is_err());
    }

    /// Combined test for YAML file loading and env var overrides.
    /// Runs as a single test to avoid parallel env var race conditions.
    #[test]
    fn test_yaml_and_env_lifecycle() {
        fn clear_env() {
            for var in &[
                "NEO4J_URI",
                "NEO4J_USER",
                "NEO4J_PASSWORD",
                "SERVER_PORT",
                "FEED_DECAY_SECONDS",
            ] {
                std::env::remove_var(var);
            }
        }

        // --- Phase 1: YAML values loaded correctly ---
        let yaml = r#"
server:
  port: 9999
neo4j:
  uri: bolt://yaml-host:7687
  user: yaml-user
  password: yaml-pass
feed:
  decay_seconds: 300
"#;
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&file_path).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        clear_env();

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.server_port, 9999);
        assert_eq!(config.neo4j_uri, "bolt://yaml-host:7687");
        assert_eq!(config.neo4j_user, "yaml-user");
        assert_eq!(config.feed.decay_seconds, 300.0);

        // --- Phase 2: Env vars override YAML ---
        std::env::set_var("NEO4J_URI", "bolt://env-host:7687");
        std::env::set_var("SERVER_PORT", "7777");
        std::env::set_var("FEED_DECAY_SECONDS", "45");

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://env-host:7687");
        assert_eq!(config.server_port, 7777);
        assert_eq!(config.feed.decay_seconds, 45.0);
        assert_eq!(config.neo4j_user, "yaml-user");

        // --- Phase 3: invalid decay is refused ---
        std::env::set_var("FEED_DECAY_SECONDS", "0");
        assert!(Config::from_yaml_and_env(Some(&file_path)).is_err());

        clear_env();

        // --- Phase 4: No YAML file -> defaults ---
        let nonexistent = Path::new("/tmp/nonexistent-social-graph-config.yaml");
        let config = Config::from_yaml_and_env(Some(nonexistent)).unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.neo4j_uri, "bolt://localhost:7687");
        assert_eq!(config.feed, FeedConfig::default());
    }

    #[test]
    fn test_invalid_pagination_rejected() {
        let yaml = r#"
pagination:
  default_page_size: 200
  max_page_size: 100
"#;
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");
        std::fs::write(&file_path, yaml).unwrap();
        assert!(Config::from_yaml_and_env(Some(&file_path)).is_err());
    }
}
