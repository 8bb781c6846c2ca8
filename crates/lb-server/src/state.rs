//! Shared application state for the Axum server.
//!
//! Built once at startup from configuration. Backends sit behind their
//! transport traits so tests can hand in mocks.

use std::sync::Arc;

use lb_bugsnag::{BugsnagClient, ErrorContext, ErrorTracker};
use lb_config::{BugsnagConfig, EnvironmentConfig, IndexRegistry};
use lb_search::{ElasticClient, SearchContext, SearchTransport};

use crate::registry::ToolRegistry;

/// Shared application state, cheap to clone into handlers.
#[derive(Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentConfig>,
    pub indices: Arc<IndexRegistry>,
    pub bugsnag: Arc<BugsnagConfig>,
    pub tools: Arc<ToolRegistry>,
    pub transport: Arc<dyn SearchTransport>,
    /// Absent when Bugsnag credentials are not configured.
    pub tracker: Option<Arc<dyn ErrorTracker>>,
}

impl AppState {
    /// Build the real HTTP clients. The Bugsnag client is only created when
    /// credentials are present.
    pub fn connect(
        environment: EnvironmentConfig,
        bugsnag: BugsnagConfig,
        indices: IndexRegistry,
    ) -> anyhow::Result<Self> {
        let transport: Arc<dyn SearchTransport> =
            Arc::new(ElasticClient::new(environment.elasticsearch.clone())?);
        let tracker: Option<Arc<dyn ErrorTracker>> = if bugsnag.is_configured() {
            Some(Arc::new(BugsnagClient::new(&bugsnag)?))
        } else {
            tracing::warn!("BUGSNAG_API_TOKEN / BUGSNAG_ORG_ID not set, error tracking tools disabled");
            None
        };
        Ok(Self::with_backends(environment, bugsnag, indices, transport, tracker))
    }

    pub fn with_backends(
        environment: EnvironmentConfig,
        bugsnag: BugsnagConfig,
        indices: IndexRegistry,
        transport: Arc<dyn SearchTransport>,
        tracker: Option<Arc<dyn ErrorTracker>>,
    ) -> Self {
        Self {
            environment: Arc::new(environment),
            indices: Arc::new(indices),
            bugsnag: Arc::new(bugsnag),
            tools: Arc::new(ToolRegistry::with_defaults()),
            transport,
            tracker,
        }
    }

    pub fn search_context(&self) -> SearchContext<'_> {
        SearchContext::new(self.transport.as_ref(), &self.indices, &self.environment)
    }

    pub fn error_context(&self) -> ErrorContext<'_> {
        ErrorContext::new(self.tracker.as_deref(), &self.bugsnag)
    }
}
