//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use thiserror::Error;

use retail_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR '{0}'")]
    InvalidBindAddr(String),

    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            use_persistent_stores: false,
            database_url: None,
            log_format: LogFormat::Json,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        let use_persistent_stores = lookup("USE_PERSISTENT_STORES")
            .and_then(|v| v.trim().parse::<bool>().ok())
            .unwrap_or(false);

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let log_format = lookup("LOG_FORMAT")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            use_persistent_stores,
            database_url,
            log_format,
        })
    }
}
