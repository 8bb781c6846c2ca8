//! Search error types.

use lb_config::ConfigError;
use lb_protocol::ArgError;
use thiserror::Error;

/// Errors raised by search primitives, flows and tools.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Rejected locally before any network call.
    #[error("invalid {param}: {message}")]
    Validation { param: String, message: String },

    /// Unknown environment / index type, or unusable connection settings.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The backend failed or rejected the request. Wraps the cause message.
    #[error("backend query failed: {0}")]
    Backend(String),
}

impl SearchError {
    pub fn validation(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            param: param.into(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<ArgError> for SearchError {
    fn from(e: ArgError) -> Self {
        Self::Validation {
            param: e.param,
            message: e.message,
        }
    }
}

/// Convenience alias for search results.
pub type SearchResult<T> = Result<T, SearchError>;
