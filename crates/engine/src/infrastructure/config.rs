//! Runtime configuration read from the environment.

use std::net::SocketAddr;

pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
pub const DEFAULT_NEO4J_PASSWORD: &str = "password";
pub const DEFAULT_NEO4J_DATABASE: &str = "neo4j";
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const DEFAULT_EMBEDDING_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_SEARCH_TOP_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub neo4j_database: String,
    pub server_host: String,
    pub server_port: u16,
    /// Raw `CORS_ALLOWED_ORIGINS`: `*` or a comma-separated list. `None` disables CORS.
    pub cors_allowed_origins: Option<String>,
    pub embedding_base_url: String,
    pub embedding_model: String,
    pub search_top_k: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server address {0}")]
    InvalidAddress(String),
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset; unparsable
    /// numbers fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let server_port = get("SERVER_PORT")
            .or_else(|| get("PORT"))
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);
        let search_top_k = get("SEARCH_TOP_K")
            .and_then(|k| k.parse().ok())
            .filter(|k| *k > 0)
            .unwrap_or(DEFAULT_SEARCH_TOP_K);

        Self {
            neo4j_uri: get_or("NEO4J_URI", DEFAULT_NEO4J_URI),
            neo4j_user: get_or("NEO4J_USER", DEFAULT_NEO4J_USER),
            neo4j_password: get_or("NEO4J_PASSWORD", DEFAULT_NEO4J_PASSWORD),
            neo4j_database: get_or("NEO4J_DATABASE", DEFAULT_NEO4J_DATABASE),
            server_host: get_or("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
            embedding_base_url: get_or("EMBEDDING_BASE_URL", DEFAULT_EMBEDDING_BASE_URL),
            embedding_model: get_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            search_top_k,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server_host, self.server_port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}
