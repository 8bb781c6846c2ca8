//! Error-tracking backend abstraction.
//!
//! Flows and tools only talk to an `ErrorTracker`; the reqwest client and the
//! in-memory mock both implement it.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BugsnagResult;
use crate::filters::ErrorFilters;

#[async_trait]
pub trait ErrorTracker: Send + Sync {
    /// `GET /organizations/{org}/projects`.
    async fn list_projects(&self) -> BugsnagResult<Vec<Value>>;

    /// `GET /projects/{id}/errors`, newest `last_seen` first.
    async fn project_errors(
        &self,
        project_id: &str,
        filters: &ErrorFilters,
        per_page: i64,
    ) -> BugsnagResult<Vec<Value>>;

    /// `GET /errors/{id}`.
    async fn error_details(&self, error_id: &str) -> BugsnagResult<Value>;

    /// `GET /errors/{id}/events`, newest first.
    async fn error_events(&self, error_id: &str, per_page: i64) -> BugsnagResult<Vec<Value>>;
}
