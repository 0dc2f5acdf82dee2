// src/config.rs

use std::{
    env,
    path::{Path, PathBuf},
};

use dotenvy::dotenv;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/server.json";

/// Errors raised while loading configuration or template files at boot.
/// None of these are recoverable; `main` logs them and exits.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid template {path}: {reason}")]
    Template { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which `DocumentStore` implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: Option<String>,
    /// Prefix of the test index collection (`{name}.TestList`).
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Static credentials guarding the operations endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredentials {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub listen_port: u16,
    pub database: DatabaseConfig,
    pub admin: AdminCredentials,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("log")
}

fn default_rust_log() -> String {
    "info".to_string()
}

impl Config {
    /// Loads the JSON config named by `EDU_CONFIG` (or the default path),
    /// then applies `DATABASE_URL` and `RUST_LOG` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let path = env::var("EDU_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(&path)?;

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database.url = Some(url);
        }
        if let Ok(filter) = env::var("RUST_LOG") {
            config.rust_log = filter;
        }

        config.check()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.database.backend == StoreBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Invalid(
                "database.url (or DATABASE_URL) is required for the postgres backend".to_string(),
            ));
        }
        if self.database.name.trim().is_empty() {
            return Err(ConfigError::Invalid("database.name must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = Config::from_json(
            r#"{
                "listenPort": 8080,
                "database": { "backend": "memory", "name": "VianuEdu" },
                "admin": { "userName": "root", "password": "toor" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.rust_log, "info");
        assert!(config.check().is_ok());
    }

    #[test]
    fn postgres_backend_requires_url() {
        let config = Config::from_json(
            r#"{
                "listenPort": 8080,
                "database": { "backend": "postgres", "name": "VianuEdu" },
                "admin": { "userName": "root", "password": "toor" }
            }"#,
        )
        .unwrap();

        assert!(matches!(config.check(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
