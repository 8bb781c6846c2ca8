//! The ErrorTool trait and the context error tools run against.

use async_trait::async_trait;

use lb_config::{BugsnagConfig, ConfigError};
use lb_protocol::ToolResult;

use crate::error::BugsnagResult;
use crate::tracker::ErrorTracker;

/// Tracker plus its configuration. The tracker is absent when credentials
/// are missing; tools then fail with a configuration error on first use.
#[derive(Clone, Copy)]
pub struct ErrorContext<'a> {
    pub tracker: Option<&'a dyn ErrorTracker>,
    pub config: &'a BugsnagConfig,
}

impl<'a> ErrorContext<'a> {
    pub fn new(tracker: Option<&'a dyn ErrorTracker>, config: &'a BugsnagConfig) -> Self {
        Self { tracker, config }
    }

    pub fn tracker(&self) -> BugsnagResult<&'a dyn ErrorTracker> {
        if let Some(tracker) = self.tracker {
            return Ok(tracker);
        }
        self.config.credentials()?;
        Err(ConfigError::InvalidValue {
            key: "BUGSNAG_BASE_URL".into(),
            message: "error tracker client unavailable".into(),
        }
        .into())
    }
}

/// A tool backed by the error tracker.
#[async_trait]
pub trait ErrorTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> serde_json::Value;

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ErrorContext<'_>,
    ) -> BugsnagResult<ToolResult>;
}
