//! E2E tests for the search tools over HTTP against a mock Elasticsearch.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use helpers::{TestHarness, app_log_hit};

#[tokio::test]
async fn e2e_search_logs_round_trip() {
    let h = TestHarness::start().await;
    Mock::given(method("POST"))
        .and(path("/app-logs*/_search"))
        .and(body_partial_json(json!({ "size": 10, "from": 0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 7,
            "timed_out": false,
            "hits": {
                "total": { "value": 42, "relation": "eq" },
                "hits": [app_log_hit("2024-01-15T11:59:00Z", "ERROR", "boom", json!("alice"))]
            }
        })))
        .expect(1)
        .mount(&h.elastic)
        .await;

    let (status, json) = h
        .invoke("search_logs", json!({ "index_pattern": "app-logs*", "size": 10 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["total"], 42);
    assert_eq!(json["data"]["took"], 7);
    assert_eq!(json["data"]["hits"][0]["_source"]["json"]["message"], "boom");
}

#[tokio::test]
async fn e2e_domain_logs_normalize_levels() {
    let h = TestHarness::start().await;
    h.elastic_hits(vec![
        app_log_hit("2024-01-15T11:59:00Z", "err", "payment declined", json!("alice")),
        json!({ "_index": "app-logs", "_source": { "@timestamp": "not a time" } }),
    ])
    .await;

    let (status, json) = h
        .invoke(
            "search_domain_logs",
            json!({ "service": "orders", "level": "ERROR", "timeframe_minutes": 30 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["entries"].as_array().unwrap().len(), 1);
    assert_eq!(data["entries"][0]["level"], "ERROR");
    assert_eq!(data["skipped"], 1);
}

#[tokio::test]
async fn e2e_user_activity_from_three_searches() {
    let h = TestHarness::start().await;
    h.elastic_hits(vec![app_log_hit(
        "2024-01-15T11:59:00Z",
        "ERROR",
        "checkout failed",
        json!(41343),
    )])
    .await;

    let (status, json) = h
        .invoke("fetch_user_activity", json!({ "user_id": 41343, "timeframe_minutes": 120 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["summary"]["total_errors"], 1);
    assert_eq!(data["summary"]["total_slow_requests"], 1);
    assert_eq!(data["summary"]["partial"], false);
    assert_eq!(data["most_recent_log"]["message"], "checkout failed");
    assert_eq!(data["slow_requests"][0]["request_time"], 3.2);

    let requests = h.elastic.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn e2e_index_stats() {
    let h = TestHarness::start().await;
    Mock::given(method("GET"))
        .and(path("/app-logs*/_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "indices": {
                "app-logs-2024.01.15": {
                    "primaries": {
                        "docs": { "count": 1200, "deleted": 3 },
                        "store": { "size_in_bytes": 4096 },
                        "indexing": { "index_total": 1200, "index_time_in_millis": 90 },
                        "search": { "query_total": 15, "query_time_in_millis": 12 },
                        "segments": { "count": 4 }
                    }
                }
            }
        })))
        .mount(&h.elastic)
        .await;

    let (status, json) = h
        .invoke("get_index_stats", json!({ "index_pattern": "app-logs*" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["summary"].as_str().unwrap().contains("1200 documents"));
}

#[tokio::test]
async fn e2e_health_reports_both_backends() {
    let h = TestHarness::start().await;
    h.elastic_hits(vec![]).await;
    Mock::given(method("GET"))
        .and(path("/organizations/org-1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.bugsnag)
        .await;

    let (status, json) = h.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["elasticsearch"], true);
    assert_eq!(json["bugsnag"], true);
    assert_eq!(json["bugsnag_configured"], true);
}
