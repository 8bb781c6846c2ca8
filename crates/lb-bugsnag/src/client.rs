//! HTTP client for the Bugsnag Data Access API.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

use lb_config::{BugsnagConfig, ConfigError};

use crate::error::{BugsnagError, BugsnagResult};
use crate::filters::{ErrorFilters, MAX_PER_PAGE};
use crate::tracker::ErrorTracker;

const API_VERSION: &str = "2";

/// Bugsnag REST client. Construction fails without credentials.
pub struct BugsnagClient {
    client: reqwest::Client,
    base_url: String,
    org_id: String,
}

impl BugsnagClient {
    pub fn new(config: &BugsnagConfig) -> BugsnagResult<Self> {
        let (token, org_id) = config.credentials()?;

        let invalid = |message: String| ConfigError::InvalidValue {
            key: "BUGSNAG_API_TOKEN".into(),
            message,
        };
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("token {token}"))
                .map_err(|e| invalid(e.to_string()))?,
        );
        headers.insert("X-Version", HeaderValue::from_static(API_VERSION));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| invalid(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            org_id: org_id.to_string(),
        })
    }

    async fn get(&self, path: &str, query: &[(String, String)], what: &str) -> BugsnagResult<Value> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| BugsnagError::Backend(format!("{what}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BugsnagError::Backend(format!("{what}: HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| BugsnagError::Backend(format!("{what}: invalid response body: {e}")))
    }
}

/// List endpoints answer with a bare array; tolerate `{"<key>": [...]}` too.
fn into_list(body: Value, key: &str) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[async_trait]
impl ErrorTracker for BugsnagClient {
    async fn list_projects(&self) -> BugsnagResult<Vec<Value>> {
        let path = format!("/organizations/{}/projects", self.org_id);
        let query = [("per_page".to_string(), MAX_PER_PAGE.to_string())];
        let body = self.get(&path, &query, "list_projects").await?;
        Ok(into_list(body, "projects"))
    }

    async fn project_errors(
        &self,
        project_id: &str,
        filters: &ErrorFilters,
        per_page: i64,
    ) -> BugsnagResult<Vec<Value>> {
        let path = format!("/projects/{project_id}/errors");
        let body = self
            .get(&path, &filters.to_query(per_page), "project_errors")
            .await?;
        Ok(into_list(body, "errors"))
    }

    async fn error_details(&self, error_id: &str) -> BugsnagResult<Value> {
        self.get(&format!("/errors/{error_id}"), &[], "error_details")
            .await
    }

    async fn error_events(&self, error_id: &str, per_page: i64) -> BugsnagResult<Vec<Value>> {
        let query = [
            ("per_page".to_string(), per_page.clamp(1, MAX_PER_PAGE).to_string()),
            ("sort".to_string(), "received_at".to_string()),
            ("direction".to_string(), "desc".to_string()),
        ];
        let body = self
            .get(&format!("/errors/{error_id}/events"), &query, "error_events")
            .await?;
        Ok(into_list(body, "events"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> BugsnagConfig {
        BugsnagConfig {
            api_token: Some("tok".into()),
            org_id: Some("org1".into()),
            base_url: server.uri(),
            timeout_secs: 2,
            ..BugsnagConfig::default()
        }
    }

    #[test]
    fn missing_credentials_rejected() {
        let err = BugsnagClient::new(&BugsnagConfig::default()).err().unwrap();
        assert_eq!(
            err,
            BugsnagError::Configuration(ConfigError::MissingCredentials(vec![
                "BUGSNAG_API_TOKEN".into(),
                "BUGSNAG_ORG_ID".into()
            ]))
        );
    }

    #[tokio::test]
    async fn lists_projects_with_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/organizations/org1/projects"))
            .and(header("authorization", "token tok"))
            .and(header("x-version", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "id": "p1", "name": "Mobile" }])),
            )
            .mount(&server)
            .await;

        let client = BugsnagClient::new(&config_for(&server)).unwrap();
        let projects = client.list_projects().await.unwrap();
        assert_eq!(projects[0]["name"], "Mobile");
    }

    #[tokio::test]
    async fn project_errors_sends_filters() {
        let server = MockServer::start().await;
        let filters = ErrorFilters::for_user("42");
        Mock::given(method("GET"))
            .and(path("/projects/p1/errors"))
            .and(query_param("per_page", "25"))
            .and(query_param("sort", "last_seen"))
            .and(query_param("direction", "desc"))
            .and(query_param("filters", r#"{"user.id":[{"eq":"42"}]}"#))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "e1" }])))
            .mount(&server)
            .await;

        let client = BugsnagClient::new(&config_for(&server)).unwrap();
        let errors = client.project_errors("p1", &filters, 25).await.unwrap();
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn http_error_wraps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/errors/e9"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let client = BugsnagClient::new(&config_for(&server)).unwrap();
        let err = client.error_details("e9").await.unwrap_err();
        assert!(matches!(err, BugsnagError::Backend(ref m) if m.contains("401") && m.contains("bad token")));
    }

    #[tokio::test]
    async fn events_accept_wrapped_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/errors/e1/events"))
            .and(query_param("sort", "received_at"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "events": [{ "id": "ev1" }, { "id": "ev2" }] })),
            )
            .mount(&server)
            .await;

        let client = BugsnagClient::new(&config_for(&server)).unwrap();
        let events = client.error_events("e1", 5).await.unwrap();
        assert_eq!(events.len(), 2);
    }
}
