//! Configuration settings for the Courtside server.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub backend: BackendConfig,
    pub league: LeagueConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            llm: LlmConfig::default(),
            backend: BackendConfig::default(),
            league: LeagueConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            // Current directory
            PathBuf::from("config.toml"),
            PathBuf::from("courtside.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("courtside/config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".courtside/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            return Err(ConfigError::MissingField("database.url".to_string()).into());
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be > 0".to_string()).into());
        }
        if self.database.statement_timeout_secs == 0 {
            return Err(
                ConfigError::Invalid("database.statement_timeout_secs must be > 0".to_string())
                    .into(),
            );
        }

        if self.llm.base_url.is_empty() {
            return Err(ConfigError::MissingField("llm.base_url".to_string()).into());
        }
        if self.llm.model.is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()).into());
        }

        // The backend proxy is optional, but an api key without a base URL
        // (or vice versa) is a misconfiguration worth failing loudly on.
        if self.backend.base_url.is_empty() != self.backend.api_key.is_empty() {
            return Err(ConfigError::Invalid(
                "backend.base_url and backend.api_key must be set together".to_string(),
            )
            .into());
        }

        if self.league.current_season < 1946 {
            return Err(
                ConfigError::Invalid("league.current_season predates the league".to_string())
                    .into(),
            );
        }

        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the REST API binds to.
    pub http_port: u16,
    /// Enable permissive CORS for browser clients.
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8090,
            enable_cors: true,
        }
    }
}

/// Relational store configuration.
///
/// The timeouts are resource-exhaustion guards: a bounded pool, fast idle
/// eviction, and a per-session statement timeout that bounds runaway SQL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// Idle connections are evicted after this many seconds.
    pub idle_timeout_secs: u64,
    /// Connection acquisition timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Per-session statement timeout in seconds.
    pub statement_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/courtside".to_string(),
            max_connections: 20,
            idle_timeout_secs: 30,
            connect_timeout_secs: 2,
            statement_timeout_secs: 5,
        }
    }
}

/// Text-generation capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible completion API.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// API key (loaded from environment if not set).
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from config or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("COURTSIDE_LLM_API_KEY").ok())
    }
}

/// Downstream backend service (player clustering / historical comparisons).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend service. Empty disables the proxy.
    pub base_url: String,
    /// Shared API key sent as the `x-api-key` header.
    pub api_key: String,
}

impl BackendConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }
}

/// League-wide constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Season year used when a question does not name one.
    pub current_season: i32,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            current_season: 2025,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.statement_timeout_secs, 5);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_str(
            r#"
            [server]
            http_port = 9000

            [league]
            current_season = 2024
            "#,
        )
        .unwrap();
        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.league.current_season, 2024);
        // Untouched sections keep defaults.
        assert_eq!(config.database.idle_timeout_secs, 30);
    }

    #[test]
    fn test_missing_database_url_rejected() {
        let result = Config::from_str(
            r#"
            [database]
            url = ""
            "#,
        );
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("database.url"));
    }

    #[test]
    fn test_backend_key_without_url_rejected() {
        let result = Config::from_str(
            r#"
            [backend]
            api_key = "secret"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_backend_disabled_by_default() {
        let config = Config::default();
        assert!(!config.backend.is_configured());
    }
}
