//! Server listen configuration.

use std::path::PathBuf;

use lb_config::{ConfigError, ConfigResult};

/// Where to listen and where the index registry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0").
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// TOML registry document; the built-in registry when unset.
    pub registry_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            registry_path: None,
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("LB_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "LB_PORT".into(),
                message: format!("expected a port number, got '{raw}'"),
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: get("LB_HOST").unwrap_or(defaults.host),
            port,
            registry_path: get("LB_REGISTRY_PATH").map(PathBuf::from),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
