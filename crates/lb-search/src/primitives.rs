//! Search and aggregation primitives.
//!
//! Every primitive validates its index pattern and clamps its bounds before
//! touching the transport, and wraps any backend failure in
//! [`SearchError::Backend`]. Nothing here retries.

use serde_json::{Value, json};
use std::collections::BTreeMap;

use lb_protocol::{AggregationResponse, IndexStats, Query, SearchResponse, parse_index_stats};

use crate::error::{SearchError, SearchResult};
use crate::request::{AggregationRequest, SearchRequest};
use crate::transport::SearchTransport;
use crate::validation::{MAX_SEARCH_SIZE, clamp, validate_index_pattern};

/// Default precision/memory trade-off for cardinality estimates.
pub const DEFAULT_PRECISION_THRESHOLD: u32 = 3000;

fn parse_search(body: Value) -> SearchResult<SearchResponse> {
    SearchResponse::from_value(body)
        .map_err(|e| SearchError::Backend(format!("malformed search response: {e}")))
}

// ── Search ────────────────────────────────────────────────────

/// Run one search. `size` is clamped to `[1, 10000]`, `from` to `>= 0`.
pub async fn search(
    transport: &dyn SearchTransport,
    request: &SearchRequest,
) -> SearchResult<SearchResponse> {
    validate_index_pattern(&request.index_pattern)?;

    let mut clamped = request.clone();
    clamped.size = clamp(request.size, 1, MAX_SEARCH_SIZE);
    clamped.from = request.from.max(0);
    let body = clamped.to_body();

    let raw = transport
        .search(&request.index_pattern, &body, request.scroll.as_deref())
        .await?;
    let response = parse_search(raw)?;

    tracing::debug!(
        index_pattern = %request.index_pattern,
        size = clamped.size,
        took_ms = response.took,
        total = response.total,
        "search completed"
    );
    Ok(response)
}

/// Fetch the next page of an open continuation cursor.
pub async fn continue_scroll(
    transport: &dyn SearchTransport,
    scroll_id: &str,
    keep_alive: &str,
) -> SearchResult<SearchResponse> {
    let raw = transport.scroll(scroll_id, keep_alive).await?;
    parse_search(raw)
}

/// Free a continuation cursor. Best effort: failures are logged, never
/// returned.
pub async fn release_scroll(transport: &dyn SearchTransport, scroll_id: &str) {
    if let Err(e) = transport.clear_scroll(scroll_id).await {
        tracing::debug!(error = %e, "failed to release scroll cursor");
    }
}

/// Drain a result set page by page through a continuation cursor.
///
/// Stops on an empty page or after `max_pages` pages. The cursor is released
/// on every exit path, including errors.
pub async fn scroll_all(
    transport: &dyn SearchTransport,
    request: &SearchRequest,
    keep_alive: &str,
    max_pages: usize,
) -> SearchResult<Vec<Value>> {
    let first = search(transport, &request.clone().scroll(keep_alive)).await?;
    let mut scroll_id = first.scroll_id.clone();
    let mut hits = first.hits;
    let mut pages = 1;

    let outcome = loop {
        let Some(id) = scroll_id.as_deref() else {
            break Ok(());
        };
        if pages >= max_pages {
            break Ok(());
        }
        match continue_scroll(transport, id, keep_alive).await {
            Ok(page) => {
                pages += 1;
                if page.is_empty() {
                    break Ok(());
                }
                hits.extend(page.hits);
                if page.scroll_id.is_some() {
                    scroll_id = page.scroll_id;
                }
            }
            Err(e) => break Err(e),
        }
    };

    if let Some(id) = scroll_id.as_deref() {
        release_scroll(transport, id).await;
    }
    outcome.map(|()| hits)
}

// ── Aggregation ───────────────────────────────────────────────

/// Run an aggregation request (document sample size clamped to `>= 0`).
pub async fn aggregate(
    transport: &dyn SearchTransport,
    request: &AggregationRequest,
) -> SearchResult<AggregationResponse> {
    validate_index_pattern(&request.index_pattern)?;

    let mut clamped = request.clone();
    clamped.size = clamp(request.size, 0, MAX_SEARCH_SIZE);

    let raw = transport
        .search(&request.index_pattern, &clamped.to_body(), None)
        .await?;
    let response = AggregationResponse::from_value(raw)
        .map_err(|e| SearchError::Backend(format!("malformed aggregation response: {e}")))?;

    tracing::debug!(
        index_pattern = %request.index_pattern,
        took_ms = response.took,
        "aggregation completed"
    );
    Ok(response)
}

/// Approximate distinct count of `field`. A missing aggregation result means
/// "no data" and yields 0.
pub async fn cardinality_estimate(
    transport: &dyn SearchTransport,
    index_pattern: &str,
    field: &str,
    query: Option<Query>,
    precision_threshold: u32,
) -> SearchResult<u64> {
    let aggs = json!({
        "unique_count": {
            "cardinality": {
                "field": field,
                "precision_threshold": precision_threshold,
            }
        }
    });
    let request = AggregationRequest::new(index_pattern, query.unwrap_or_default(), aggs);
    let response = aggregate(transport, &request).await?;
    Ok(response
        .get("unique_count")
        .and_then(|agg| agg["value"].as_u64())
        .unwrap_or(0))
}

// ── Index metadata ────────────────────────────────────────────

/// Primary-shard statistics per matching index.
pub async fn index_stats(
    transport: &dyn SearchTransport,
    index_pattern: &str,
) -> SearchResult<BTreeMap<String, IndexStats>> {
    validate_index_pattern(index_pattern)?;
    let raw = transport.index_stats(index_pattern).await?;
    Ok(parse_index_stats(&raw))
}

/// Whether any index matches. Backend failures read as `false`; an invalid
/// pattern is still an error.
pub async fn index_exists(
    transport: &dyn SearchTransport,
    index_pattern: &str,
) -> SearchResult<bool> {
    validate_index_pattern(index_pattern)?;
    Ok(transport.index_exists(index_pattern).await.unwrap_or(false))
}

/// Connectivity check with low-privilege calls: a zero-size search on `*`,
/// then `_count` on `*` if that fails.
pub async fn ping(transport: &dyn SearchTransport) -> bool {
    let body = json!({ "query": { "match_all": {} }, "size": 0 });
    match transport.search("*", &body, None).await {
        Ok(resp) if resp.get("hits").is_some() => return true,
        Ok(_) => {}
        Err(e) => tracing::debug!(error = %e, "ping search failed, trying count"),
    }
    match transport.count("*").await {
        Ok(resp) => resp.get("count").is_some(),
        Err(e) => {
            tracing::debug!(error = %e, "ping count failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockTransport, TransportCall};

    #[tokio::test]
    async fn empty_pattern_rejected_before_network() {
        let mock = MockTransport::new();
        let err = search(&mock, &SearchRequest::new("", Query::MatchAll))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(mock.call_count(), 0);

        let err = aggregate(&mock, &AggregationRequest::new("", Query::MatchAll, json!({})))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(index_stats(&mock, "_all").await.is_err());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn size_clamped_in_body() {
        let mock = MockTransport::new();
        search(&mock, &SearchRequest::new("logs", Query::MatchAll).size(0).offset(-4))
            .await
            .unwrap();
        search(&mock, &SearchRequest::new("logs", Query::MatchAll).size(50_000))
            .await
            .unwrap();
        let bodies = mock.search_bodies();
        assert_eq!(bodies[0]["size"], 1);
        assert_eq!(bodies[0]["from"], 0);
        assert_eq!(bodies[1]["size"], 10_000);
    }

    #[tokio::test]
    async fn approximate_total_normalized() {
        let mock = MockTransport::new();
        mock.queue_response(json!({
            "took": 7,
            "hits": { "total": { "value": 42, "relation": "gte" }, "hits": [] }
        }));
        let resp = search(&mock, &SearchRequest::new("logs", Query::MatchAll))
            .await
            .unwrap();
        assert_eq!(resp.total, 42);
        assert_eq!(resp.took, 7);
    }

    #[tokio::test]
    async fn backend_failure_wrapped() {
        let mock = MockTransport::new();
        mock.queue_failure("connection reset");
        let err = search(&mock, &SearchRequest::new("logs", Query::MatchAll))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Backend(ref m) if m.contains("connection reset")));
    }

    #[tokio::test]
    async fn cardinality_missing_aggregations_is_zero() {
        let mock = MockTransport::new();
        mock.queue_response(json!({ "took": 1, "hits": { "total": 0, "hits": [] } }));
        let n = cardinality_estimate(&mock, "logs", "json.hostname", None, DEFAULT_PRECISION_THRESHOLD)
            .await
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn cardinality_passes_precision_through() {
        let mock = MockTransport::new();
        mock.queue_response(json!({ "aggregations": { "unique_count": { "value": 17 } } }));
        let n = cardinality_estimate(&mock, "logs", "user", None, 500).await.unwrap();
        assert_eq!(n, 17);
        let body = &mock.search_bodies()[0];
        assert_eq!(body["aggs"]["unique_count"]["cardinality"]["precision_threshold"], 500);
        assert_eq!(body["size"], 0);
        assert_eq!(body["query"], json!({ "match_all": {} }));
    }

    #[tokio::test]
    async fn scroll_all_drains_and_releases() {
        let mock = MockTransport::new();
        mock.queue_response(json!({ "_scroll_id": "s1", "hits": { "total": 3, "hits": [{ "_id": "1" }] } }));
        mock.queue_response(json!({ "_scroll_id": "s2", "hits": { "total": 3, "hits": [{ "_id": "2" }, { "_id": "3" }] } }));
        mock.queue_response(json!({ "_scroll_id": "s2", "hits": { "total": 3, "hits": [] } }));

        let hits = scroll_all(&mock, &SearchRequest::new("logs", Query::MatchAll), "1m", 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(
            mock.calls().last(),
            Some(&TransportCall::ClearScroll { scroll_id: "s2".into() })
        );
    }

    #[tokio::test]
    async fn scroll_all_releases_on_error() {
        let mock = MockTransport::new();
        mock.queue_response(json!({ "_scroll_id": "s1", "hits": { "total": 9, "hits": [{ "_id": "1" }] } }));
        mock.queue_failure("scroll expired");

        let err = scroll_all(&mock, &SearchRequest::new("logs", Query::MatchAll), "1m", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Backend(_)));
        assert!(mock
            .calls()
            .contains(&TransportCall::ClearScroll { scroll_id: "s1".into() }));
    }

    #[tokio::test]
    async fn scroll_all_respects_page_cap() {
        let mock = MockTransport::new();
        for i in 0..5 {
            mock.queue_response(json!({ "_scroll_id": "s", "hits": { "total": 5, "hits": [{ "_id": i }] } }));
        }
        let hits = scroll_all(&mock, &SearchRequest::new("logs", Query::MatchAll), "1m", 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn release_suppresses_errors() {
        let mock = MockTransport::with_failing_clear();
        release_scroll(&mock, "gone").await;
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn index_exists_failure_is_false() {
        let mock = MockTransport::new();
        mock.set_exists(Err(SearchError::Backend("403".into())));
        assert!(!index_exists(&mock, "logs-*").await.unwrap());
        assert!(index_exists(&mock, "").await.is_err());
    }

    #[tokio::test]
    async fn index_stats_parsed() {
        let mock = MockTransport::new();
        mock.set_stats(json!({ "indices": { "logs-1": { "primaries": { "docs": { "count": 9 } } } } }));
        let stats = index_stats(&mock, "logs-*").await.unwrap();
        assert_eq!(stats["logs-1"].docs_count, 9);
    }

    #[tokio::test]
    async fn ping_uses_search_then_count() {
        let mock = MockTransport::new();
        assert!(ping(&mock).await);

        let failing = MockTransport::new();
        failing.queue_failure("forbidden");
        assert!(ping(&failing).await);
        assert!(failing
            .calls()
            .contains(&TransportCall::Count { index: "*".into() }));
    }
}
