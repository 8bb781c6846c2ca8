//! Shared test harness for E2E integration tests.
//!
//! Starts wiremock servers standing in for Elasticsearch and Bugsnag, builds
//! the real HTTP clients against them, and drives the router in-process.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lb_config::{BugsnagConfig, BugsnagProject, ElasticConfig, EnvironmentConfig, IndexRegistry};
use lb_server::routes::build_router;
use lb_server::state::AppState;

pub struct TestHarness {
    pub elastic: MockServer,
    pub bugsnag: MockServer,
    pub router: Router,
}

impl TestHarness {
    /// Both backends, Bugsnag configured with a mobile and a dashboard
    /// project.
    pub async fn start() -> Self {
        Self::build(true).await
    }

    /// Bugsnag credentials absent.
    pub async fn without_bugsnag() -> Self {
        Self::build(false).await
    }

    async fn build(with_bugsnag: bool) -> Self {
        let elastic = MockServer::start().await;
        let bugsnag = MockServer::start().await;

        let environment = EnvironmentConfig {
            elasticsearch: ElasticConfig {
                url: elastic.uri(),
                timeout_ms: 2_000,
                ..ElasticConfig::default()
            },
            ..EnvironmentConfig::default()
        };
        let bugsnag_config = if with_bugsnag {
            BugsnagConfig {
                api_token: Some("test-token".into()),
                org_id: Some("org-1".into()),
                base_url: bugsnag.uri(),
                timeout_secs: 2,
                projects: vec![
                    BugsnagProject::parse("mobile:proj-mobile:Mobile App").unwrap(),
                    BugsnagProject::parse("dashboard:proj-dash:Dashboard").unwrap(),
                ],
            }
        } else {
            BugsnagConfig::default()
        };

        let state =
            AppState::connect(environment, bugsnag_config, IndexRegistry::builtin()).unwrap();
        Self {
            elastic,
            bugsnag,
            router: build_router(state),
        }
    }

    /// Answer every `_search` with these hits.
    pub async fn elastic_hits(&self, hits: Vec<Value>) {
        let total = hits.len();
        Mock::given(method("POST"))
            .and(path_regex(r"/_search$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "took": 4,
                "timed_out": false,
                "hits": { "total": { "value": total, "relation": "eq" }, "hits": hits }
            })))
            .mount(&self.elastic)
            .await;
    }

    /// Answer every `_search` with an HTTP error.
    pub async fn elastic_down(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path_regex(r"/_search$"))
            .respond_with(ResponseTemplate::new(status).set_body_string("cluster unavailable"))
            .mount(&self.elastic)
            .await;
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// POST /api/v1/tools/{tool} with JSON arguments.
    pub async fn invoke(&self, tool: &str, args: Value) -> (StatusCode, Value) {
        let request = Request::post(format!("/api/v1/tools/{tool}"))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&args).unwrap()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }
}

/// An app_logs hit in the production document shape.
pub fn app_log_hit(timestamp: &str, level: &str, message: &str, user_id: Value) -> Value {
    json!({
        "_index": "app-logs-2024.01.15",
        "_id": format!("{timestamp}-{level}"),
        "_source": {
            "@timestamp": timestamp,
            "json": {
                "levelname": level,
                "message": message,
                "hostname": "api-7f9c",
                "service_name": "orders",
                "user_id": user_id,
                "extra": { "request_time": 3.2, "method": "GET", "url": "/api/orders", "status_code": 200 }
            }
        }
    })
}
