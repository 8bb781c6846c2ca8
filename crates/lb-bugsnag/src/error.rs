//! Error-tracking error types.

use lb_config::ConfigError;
use lb_protocol::ArgError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BugsnagError {
    #[error("invalid {param}: {message}")]
    Validation { param: String, message: String },

    /// Missing credentials, no configured projects, unusable settings.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("bugsnag request failed: {0}")]
    Backend(String),
}

impl BugsnagError {
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

impl From<ArgError> for BugsnagError {
    fn from(e: ArgError) -> Self {
        Self::Validation {
            param: e.param,
            message: e.message,
        }
    }
}

pub type BugsnagResult<T> = Result<T, BugsnagError>;
