//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("unknown index type '{index_type}' for environment '{environment}'")]
    UnknownIndexType {
        environment: String,
        index_type: String,
    },

    #[error("index type '{index_type}' in '{environment}' has no mapping for field '{field}'")]
    UnmappedField {
        environment: String,
        index_type: String,
        field: String,
    },

    #[error("missing required configuration: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("registry parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
