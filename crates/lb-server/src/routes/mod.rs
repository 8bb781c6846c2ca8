//! API route definitions and router builder.

pub mod health;
pub mod tools;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/tools", get(tools::list_tools))
        .route("/tools/{name}", post(tools::invoke_tool));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use lb_bugsnag::{ErrorTracker, MockErrorTracker};
    use lb_config::{BugsnagConfig, EnvironmentConfig, IndexRegistry};
    use lb_search::MockTransport;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn configured_bugsnag() -> BugsnagConfig {
        BugsnagConfig {
            api_token: Some("t".into()),
            org_id: Some("o".into()),
            ..BugsnagConfig::default()
        }
    }

    fn state_with(
        transport: Arc<MockTransport>,
        tracker: Option<Arc<MockErrorTracker>>,
        bugsnag: BugsnagConfig,
    ) -> AppState {
        AppState::with_backends(
            EnvironmentConfig::default(),
            bugsnag,
            IndexRegistry::builtin(),
            transport,
            tracker.map(|t| t as Arc<dyn ErrorTracker>),
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_healthy_without_bugsnag() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_hits(vec![]);
        let app = build_router(state_with(transport, None, BugsnagConfig::default()));

        let (status, json) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["elasticsearch"], true);
        assert_eq!(json["bugsnag"], false);
        assert_eq!(json["bugsnag_configured"], false);
        assert_eq!(json["environment"], "default");
    }

    #[tokio::test]
    async fn health_degraded_when_bugsnag_unreachable() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_hits(vec![]);
        let tracker = Arc::new(MockErrorTracker::new());
        tracker.fail_projects("HTTP 401");
        let app = build_router(state_with(transport, Some(tracker), configured_bugsnag()));

        let (_, json) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["elasticsearch"], true);
        assert_eq!(json["bugsnag_configured"], true);
    }

    #[tokio::test]
    async fn lists_tools() {
        let app = build_router(state_with(
            Arc::new(MockTransport::new()),
            None,
            BugsnagConfig::default(),
        ));
        let (status, json) =
            send(app, Request::get("/api/v1/tools").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let tools = json.as_array().unwrap();
        assert_eq!(tools.len(), 13);
        assert!(tools.iter().any(|t| t["name"] == "fetch_user_activity" && t["kind"] == "search"));
        assert!(tools.iter().all(|t| t["schema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn invoke_search_tool() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_hits(vec![json!({
            "_index": "app-logs-2024.01.15",
            "_id": "1",
            "_source": { "message": "hello" }
        })]);
        let app = build_router(state_with(transport.clone(), None, BugsnagConfig::default()));

        let (status, json) = send(
            app,
            post_json("/api/v1/tools/search_logs", json!({ "index_pattern": "app-logs-*" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["tool_name"], "search_logs");
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_404() {
        let app = build_router(state_with(
            Arc::new(MockTransport::new()),
            None,
            BugsnagConfig::default(),
        ));
        let (status, json) = send(app, post_json("/api/v1/tools/drop_index", json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("drop_index"));
    }

    #[tokio::test]
    async fn validation_failure_400() {
        let transport = Arc::new(MockTransport::new());
        let app = build_router(state_with(transport.clone(), None, BugsnagConfig::default()));
        let (status, json) = send(
            app,
            post_json("/api/v1/tools/search_logs", json!({ "index_pattern": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], 400);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn non_object_arguments_422() {
        let app = build_router(state_with(
            Arc::new(MockTransport::new()),
            None,
            BugsnagConfig::default(),
        ));
        let (status, _) = send(app, post_json("/api/v1/tools/search_logs", json!([1, 2]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn backend_failure_502() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_failure("connection refused");
        let app = build_router(state_with(transport, None, BugsnagConfig::default()));
        let (status, json) = send(
            app,
            post_json("/api/v1/tools/search_logs", json!({ "index_pattern": "app-logs-*" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["error"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn error_tool_without_credentials_500() {
        let app = build_router(state_with(
            Arc::new(MockTransport::new()),
            None,
            BugsnagConfig::default(),
        ));
        let (status, json) = send(
            app,
            post_json("/api/v1/tools/fetch_user_errors", json!({ "user_id": 41343 })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("BUGSNAG_API_TOKEN"));
    }
}
