//! The SearchTool trait and the context every search tool runs against.

use async_trait::async_trait;

use lb_config::{EnvironmentConfig, IndexRegistry};
use lb_protocol::ToolResult;

use crate::error::SearchResult;
use crate::transport::SearchTransport;

/// Everything a search tool needs: the backend, the registry, and the
/// process environment. Borrowed for the duration of one call.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub transport: &'a dyn SearchTransport,
    pub registry: &'a IndexRegistry,
    pub environment: &'a EnvironmentConfig,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        transport: &'a dyn SearchTransport,
        registry: &'a IndexRegistry,
        environment: &'a EnvironmentConfig,
    ) -> Self {
        Self {
            transport,
            registry,
            environment,
        }
    }

    /// The caller's environment name, or the process default.
    pub fn environment_name<'b>(&'b self, requested: Option<&'b str>) -> &'b str {
        requested.unwrap_or(&self.environment.name)
    }

    pub fn max_timeframe(&self) -> i64 {
        i64::from(self.environment.defaults.max_timeframe_minutes)
    }

    pub fn default_timeframe(&self) -> i64 {
        i64::from(self.environment.defaults.default_timeframe_minutes)
    }

    pub fn max_results(&self) -> i64 {
        i64::from(self.environment.defaults.max_results)
    }
}

/// A tool backed by the search transport.
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Tool name (e.g., "search_logs").
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema describing accepted arguments.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with JSON arguments.
    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &SearchContext<'_>,
    ) -> SearchResult<ToolResult>;
}
