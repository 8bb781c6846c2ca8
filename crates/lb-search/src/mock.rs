//! Mock search transport for testing.
//!
//! Serves queued responses in FIFO order and records every call, so tests can
//! assert both what the primitives sent and that validation stopped them from
//! sending anything at all.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{SearchError, SearchResult};
use crate::transport::SearchTransport;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    Search {
        index: String,
        body: Value,
        scroll: Option<String>,
    },
    Scroll {
        scroll_id: String,
        keep_alive: String,
    },
    ClearScroll {
        scroll_id: String,
    },
    IndexStats {
        index: String,
    },
    IndexExists {
        index: String,
    },
    Count {
        index: String,
    },
}

/// Mock transport with scripted responses and call recording.
///
/// `search` and `scroll` share one response queue; an empty queue answers
/// with an empty hit list. The other endpoints have fixed answers that tests
/// can set.
pub struct MockTransport {
    responses: Mutex<VecDeque<SearchResult<Value>>>,
    calls: Mutex<Vec<TransportCall>>,
    stats: Mutex<Value>,
    exists: Mutex<SearchResult<bool>>,
    clear_fails: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            stats: Mutex::new(json!({ "indices": {} })),
            exists: Mutex::new(Ok(true)),
            clear_fails: false,
        }
    }

    /// A mock whose `clear_scroll` always fails.
    pub fn with_failing_clear() -> Self {
        Self {
            clear_fails: true,
            ..Self::new()
        }
    }

    /// Queue a successful search/scroll response body.
    pub fn queue_response(&self, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    /// Queue a backend failure for the next search/scroll.
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(SearchError::Backend(message.into())));
    }

    /// Queue a search response with the given hits.
    pub fn queue_hits(&self, hits: Vec<Value>) {
        let total = hits.len();
        self.queue_response(json!({
            "took": 1,
            "timed_out": false,
            "hits": { "total": { "value": total, "relation": "eq" }, "hits": hits }
        }));
    }

    pub fn set_stats(&self, body: Value) {
        *self.stats.lock().unwrap() = body;
    }

    pub fn set_exists(&self, answer: SearchResult<bool>) {
        *self.exists.lock().unwrap() = answer;
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies of all recorded `search` calls.
    pub fn search_bodies(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TransportCall::Search { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: TransportCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_response(&self) -> SearchResult<Value> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "took": 0, "hits": { "total": 0, "hits": [] } })))
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchTransport for MockTransport {
    async fn search(&self, index: &str, body: &Value, scroll: Option<&str>) -> SearchResult<Value> {
        self.record(TransportCall::Search {
            index: index.to_string(),
            body: body.clone(),
            scroll: scroll.map(String::from),
        });
        self.next_response()
    }

    async fn scroll(&self, scroll_id: &str, keep_alive: &str) -> SearchResult<Value> {
        self.record(TransportCall::Scroll {
            scroll_id: scroll_id.to_string(),
            keep_alive: keep_alive.to_string(),
        });
        self.next_response()
    }

    async fn clear_scroll(&self, scroll_id: &str) -> SearchResult<()> {
        self.record(TransportCall::ClearScroll {
            scroll_id: scroll_id.to_string(),
        });
        if self.clear_fails {
            return Err(SearchError::Backend("scroll context already gone".into()));
        }
        Ok(())
    }

    async fn index_stats(&self, index: &str) -> SearchResult<Value> {
        self.record(TransportCall::IndexStats {
            index: index.to_string(),
        });
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn index_exists(&self, index: &str) -> SearchResult<bool> {
        self.record(TransportCall::IndexExists {
            index: index.to_string(),
        });
        self.exists.lock().unwrap().clone()
    }

    async fn count(&self, index: &str) -> SearchResult<Value> {
        self.record(TransportCall::Count {
            index: index.to_string(),
        });
        Ok(json!({ "count": 0 }))
    }
}
