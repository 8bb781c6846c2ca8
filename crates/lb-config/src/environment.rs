//! Elasticsearch environment configuration.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};

const DEFAULT_ELASTIC_URL: &str = "http://localhost:9200";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connection settings for the Elasticsearch cluster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ElasticConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// When false, TLS certificates are not verified.
    pub verify_certs: bool,
    /// PEM bundle to trust in addition to the system roots.
    pub ca_certs: Option<PathBuf>,
}

/// How requests to Elasticsearch authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElasticAuth<'a> {
    ApiKey(&'a str),
    Basic { username: &'a str, password: &'a str },
    Anonymous,
}

impl ElasticConfig {
    /// API key wins over basic auth; basic auth needs both halves.
    pub fn auth(&self) -> ElasticAuth<'_> {
        if let Some(key) = self.api_key.as_deref() {
            return ElasticAuth::ApiKey(key);
        }
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => ElasticAuth::Basic { username, password },
            _ => ElasticAuth::Anonymous,
        }
    }
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ELASTIC_URL.into(),
            username: None,
            password: None,
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            verify_certs: true,
            ca_certs: None,
        }
    }
}

/// Size and timeframe bounds applied to every tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Defaults {
    pub max_results: u32,
    pub default_timeframe_minutes: u32,
    pub max_timeframe_minutes: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            max_results: 1000,
            default_timeframe_minutes: 60,
            max_timeframe_minutes: 1440,
        }
    }
}

/// Optional behaviours, all off unless `LB_FEATURE_<NAME>` is truthy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct FeatureFlags {
    pub enable_caching: bool,
    pub enable_audit_logging: bool,
    pub enable_rate_limiting: bool,
}

impl FeatureFlags {
    /// Look up a flag by name. Unknown names are off.
    pub fn is_enabled(&self, name: &str) -> bool {
        match name {
            "enable_caching" => self.enable_caching,
            "enable_audit_logging" => self.enable_audit_logging,
            "enable_rate_limiting" => self.enable_rate_limiting,
            _ => false,
        }
    }
}

/// One named deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub name: String,
    pub elasticsearch: ElasticConfig,
    pub defaults: Defaults,
    pub features: FeatureFlags,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            name: "default".into(),
            elasticsearch: ElasticConfig::default(),
            defaults: Defaults::default(),
            features: FeatureFlags::default(),
        }
    }
}

impl EnvironmentConfig {
    /// Load from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(k).filter(|v| !v.is_empty()))
        };

        let timeout_ms = match first(&["ELASTIC_TIMEOUT", "ELASTICSEARCH_TIMEOUT"]) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ELASTIC_TIMEOUT".into(),
                message: format!("expected milliseconds, got '{raw}'"),
            })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        let verify_certs = match first(&["ELASTIC_VERIFY_CERTS"]) {
            Some(raw) => parse_bool("ELASTIC_VERIFY_CERTS", &raw)?,
            None => true,
        };

        let elasticsearch = ElasticConfig {
            url: first(&["ELASTIC_URL", "ELASTICSEARCH_URL"])
                .unwrap_or_else(|| DEFAULT_ELASTIC_URL.into()),
            username: first(&["ELASTIC_USERNAME", "ELASTICSEARCH_USERNAME"]),
            password: first(&["ELASTIC_PASSWORD", "ELASTICSEARCH_PASSWORD"]),
            api_key: first(&["ELASTIC_API_KEY", "ELASTICSEARCH_API_KEY"]),
            timeout_ms,
            verify_certs,
            ca_certs: first(&["ELASTIC_CA_CERTS"]).map(PathBuf::from),
        };

        let flag = |name: &str| -> ConfigResult<bool> {
            let key = format!("LB_FEATURE_{}", name.to_uppercase());
            match lookup(&key) {
                Some(raw) => parse_bool(&key, &raw),
                None => Ok(false),
            }
        };
        let features = FeatureFlags {
            enable_caching: flag("enable_caching")?,
            enable_audit_logging: flag("enable_audit_logging")?,
            enable_rate_limiting: flag("enable_rate_limiting")?,
        };

        Ok(Self {
            name: first(&["LB_ENVIRONMENT"]).unwrap_or_else(|| "default".into()),
            elasticsearch,
            defaults: Defaults::default(),
            features,
        })
    }
}

pub(crate) fn parse_bool(key: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{raw}'"),
        }),
    }
}
