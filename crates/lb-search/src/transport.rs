//! Search transport abstraction.
//!
//! The primitives only ever talk to a `SearchTransport`, so tests can swap the
//! HTTP client for [`MockTransport`](crate::mock::MockTransport). Bodies cross
//! this seam as raw JSON; typing happens on either side of it.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SearchResult;

#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// `POST /{index}/_search`, optionally opening a scroll cursor kept alive
    /// for `scroll` (e.g. `"1m"`).
    async fn search(&self, index: &str, body: &Value, scroll: Option<&str>) -> SearchResult<Value>;

    /// Fetch the next page of an open scroll cursor.
    async fn scroll(&self, scroll_id: &str, keep_alive: &str) -> SearchResult<Value>;

    /// Release an open scroll cursor.
    async fn clear_scroll(&self, scroll_id: &str) -> SearchResult<()>;

    /// `GET /{index}/_stats`.
    async fn index_stats(&self, index: &str) -> SearchResult<Value>;

    /// Whether any index matches.
    async fn index_exists(&self, index: &str) -> SearchResult<bool>;

    /// `GET /{index}/_count`.
    async fn count(&self, index: &str) -> SearchResult<Value>;
}
