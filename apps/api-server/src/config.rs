//! API server configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `khata.toml` in the working directory, or the file named by `KHATA_CONFIG`
//! 3. `KHATA_*` environment variables (`KHATA_PORT`, `KHATA_DATABASE_PATH`, ...)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use khata_db::DbConfig;
use serde::Deserialize;

/// Config file read when `KHATA_CONFIG` is not set. Optional.
pub const DEFAULT_CONFIG_FILE: &str = "khata.toml";

/// Default `tracing` filter directives.
pub const DEFAULT_LOG_FILTER: &str = "info,khata=debug,sqlx=warn";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,

    /// HTTP port.
    pub port: u16,

    /// SQLite database file, created on first start.
    pub database_path: PathBuf,

    /// Pool size.
    pub max_connections: u32,

    /// Seconds a request waits for a free pooled connection.
    pub connect_timeout_secs: u64,

    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl AppConfig {
    /// Loads configuration from the file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("KHATA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_sources(
            File::with_name(&file).required(false),
            Environment::with_prefix("KHATA"),
        )
    }

    /// Layers the defaults under the given file and environment sources.
    pub fn from_sources(
        file: File<config::FileSourceFile, config::FileFormat>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("database_path", "khata.db")?
            .set_default("max_connections", 5)?
            .set_default("connect_timeout_secs", 30)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_connections",
                value: "0".to_string(),
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "connect_timeout_secs",
                value: "0".to_string(),
            });
        }
        self.bind_address().map(|_| ())
    }

    /// Socket address built from `host` and `port`.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "host",
                value: self.host.clone(),
            })
    }

    /// Pool settings for [`khata_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}
