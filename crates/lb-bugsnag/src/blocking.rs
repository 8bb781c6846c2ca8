//! Synchronous facade for callers outside an async context.

use serde_json::Value;
use std::sync::Arc;

use lb_config::BugsnagConfig;

use crate::context::ErrorContext;
use crate::error::{BugsnagError, BugsnagResult};
use crate::filters::ErrorFilters;
use crate::flows::{self, UserErrors, UserErrorsQuery};
use crate::primitives;
use crate::tracker::ErrorTracker;
use crate::types::{ErrorSearch, ProjectRef};

/// Owns a current-thread runtime and blocks on each call. Must not be used
/// from inside another tokio runtime.
pub struct BlockingErrorTracker {
    tracker: Arc<dyn ErrorTracker>,
    runtime: tokio::runtime::Runtime,
}

impl BlockingErrorTracker {
    pub fn new(tracker: Arc<dyn ErrorTracker>) -> BugsnagResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BugsnagError::Backend(format!("tokio runtime init failed: {e}")))?;
        Ok(Self { tracker, runtime })
    }

    pub fn list_projects(&self) -> BugsnagResult<Vec<ProjectRef>> {
        self.runtime
            .block_on(primitives::list_projects(self.tracker.as_ref()))
    }

    pub fn search_errors(
        &self,
        project_id: Option<&str>,
        filters: &ErrorFilters,
        limit: i64,
    ) -> BugsnagResult<ErrorSearch> {
        self.runtime.block_on(primitives::search_errors(
            self.tracker.as_ref(),
            project_id,
            filters,
            limit,
        ))
    }

    pub fn error_details(&self, error_id: &str) -> BugsnagResult<Value> {
        self.runtime
            .block_on(primitives::error_details(self.tracker.as_ref(), error_id))
    }

    pub fn error_events(&self, error_id: &str, limit: i64) -> BugsnagResult<Vec<Value>> {
        self.runtime.block_on(primitives::error_events(
            self.tracker.as_ref(),
            error_id,
            limit,
        ))
    }

    pub fn fetch_user_errors(
        &self,
        config: &BugsnagConfig,
        params: &UserErrorsQuery,
    ) -> BugsnagResult<UserErrors> {
        let ctx = ErrorContext::new(Some(self.tracker.as_ref()), config);
        self.runtime.block_on(flows::fetch_user_errors(&ctx, params))
    }

    pub fn ping(&self) -> bool {
        self.runtime.block_on(primitives::ping(self.tracker.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockErrorTracker;
    use lb_config::BugsnagProject;
    use serde_json::json;

    fn blocking(mock: MockErrorTracker) -> BlockingErrorTracker {
        BlockingErrorTracker::new(Arc::new(mock)).unwrap()
    }

    #[test]
    fn primitives_without_async_caller() {
        let mock = MockErrorTracker::new().with_project("p1", "Mobile");
        mock.set_errors("p1", vec![json!({ "id": "e1", "last_seen": "2024-01-15T10:00:00Z" })]);
        mock.set_details("e1", json!({ "id": "e1" }));
        let tracker = blocking(mock);

        assert!(tracker.ping());
        assert_eq!(tracker.list_projects().unwrap()[0].name, "Mobile");
        let found = tracker
            .search_errors(None, &ErrorFilters::default(), 10)
            .unwrap();
        assert_eq!(found.total_errors_found, 1);
        assert_eq!(tracker.error_details("e1").unwrap()["id"], "e1");
        assert!(tracker.error_events("e1", 5).unwrap().is_empty());
    }

    #[test]
    fn user_errors_flow() {
        let mock = MockErrorTracker::new();
        mock.set_errors("pm", vec![json!({ "id": "e1", "severity": "error" })]);
        let tracker = blocking(mock);
        let config = BugsnagConfig {
            api_token: Some("t".into()),
            org_id: Some("o".into()),
            projects: vec![BugsnagProject::parse("mobile:pm:Mobile").unwrap()],
            ..BugsnagConfig::default()
        };

        let out = tracker
            .fetch_user_errors(&config, &UserErrorsQuery::new("7"))
            .unwrap();
        assert!(out.critical_errors_found);
        assert!(out.has_issues("mobile"));
    }

    #[test]
    fn ping_false_on_failure() {
        let mock = MockErrorTracker::new();
        mock.fail_projects("HTTP 401");
        assert!(!blocking(mock).ping());
    }
}
