//! Rental API configuration module.
//!
//! Layers, later wins:
//! 1. Built-in defaults
//! 2. Optional TOML file named by `REEL_CONFIG`
//! 3. Environment variables (`REEL_HOST`, `REEL_PORT`, `REEL_DATABASE_PATH`,
//!    `REEL_DB_MAX_CONNECTIONS`, `REEL_LOG`)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Rental API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_path: PathBuf::from("./reel.db"),
            db_max_connections: 5,
            log_level: "info,sqlx=warn".to_string(),
        }
    }
}

/// Fields a config file may set. Anything absent keeps the default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    database_path: Option<PathBuf>,
    db_max_connections: Option<u32>,
    log_level: Option<String>,
}

impl ApiConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var("REEL_CONFIG") {
            Ok(path) => {
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
                    path: path.clone(),
                    source,
                })?;
                Some(contents)
            }
            Err(_) => None,
        };

        Self::from_sources(file.as_deref(), |name| env::var(name).ok())
    }

    /// Builds a config from file contents and an environment lookup.
    pub fn from_sources(
        file: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = ApiConfig::default();

        if let Some(contents) = file {
            let file: FileConfig = toml::from_str(contents)?;
            if let Some(host) = file.host {
                config.host = host;
            }
            if let Some(port) = file.port {
                config.port = port;
            }
            if let Some(path) = file.database_path {
                config.database_path = path;
            }
            if let Some(max) = file.db_max_connections {
                config.db_max_connections = max;
            }
            if let Some(level) = file.log_level {
                config.log_level = level;
            }
        }

        if let Some(host) = lookup("REEL_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("REEL_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("REEL_PORT".to_string()))?;
        }
        if let Some(path) = lookup("REEL_DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(max) = lookup("REEL_DB_MAX_CONNECTIONS") {
            config.db_max_connections = max
                .parse()
                .map_err(|_| ConfigError::InvalidValue("REEL_DB_MAX_CONNECTIONS".to_string()))?;
        }
        if let Some(level) = lookup("REEL_LOG") {
            config.log_level = level;
        }

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("db_max_connections".to_string()));
        }
        if config.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue("host".to_string()));
        }

        Ok(config)
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_sources(None, env_of(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_file_then_env_override() {
        let file = r#"
            port = 8080
            database_path = "/var/lib/reel/reel.db"
            log_level = "debug"
        "#;

        let config = ApiConfig::from_sources(Some(file), env_of(&[("REEL_PORT", "9090")])).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.database_path, PathBuf::from("/var/lib/reel/reel.db"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_env_value() {
        let err = ApiConfig::from_sources(None, env_of(&[("REEL_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name) if name == "REEL_PORT"));

        let err = ApiConfig::from_sources(None, env_of(&[("REEL_DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_unknown_file_key_is_rejected() {
        let err = ApiConfig::from_sources(Some("prot = 1"), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
