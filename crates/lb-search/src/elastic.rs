//! HTTP transport for Elasticsearch.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;

use lb_config::{ConfigError, ElasticAuth, ElasticConfig};

use crate::error::{SearchError, SearchResult};
use crate::transport::SearchTransport;

/// Elasticsearch REST client built from an [`ElasticConfig`].
pub struct ElasticClient {
    client: reqwest::Client,
    config: ElasticConfig,
}

impl ElasticClient {
    pub fn new(config: ElasticConfig) -> SearchResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .danger_accept_invalid_certs(!config.verify_certs);

        if let Some(path) = &config.ca_certs {
            let pem = std::fs::read(path).map_err(|e| {
                ConfigError::Io(format!("{}: {e}", path.display()))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                ConfigError::InvalidValue {
                    key: "ELASTIC_CA_CERTS".into(),
                    message: e.to_string(),
                }
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder.build().map_err(|e| {
            ConfigError::InvalidValue {
                key: "ELASTIC_URL".into(),
                message: format!("failed to build HTTP client: {e}"),
            }
        })?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.url(path));
        match self.config.auth() {
            ElasticAuth::ApiKey(key) => req.header("Authorization", format!("ApiKey {key}")),
            ElasticAuth::Basic { username, password } => req.basic_auth(username, Some(password)),
            ElasticAuth::Anonymous => req,
        }
    }

    async fn send_json(&self, req: RequestBuilder, what: &str) -> SearchResult<Value> {
        let response = req
            .send()
            .await
            .map_err(|e| SearchError::Backend(format!("{what}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Backend(format!("{what}: HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::Backend(format!("{what}: invalid response body: {e}")))
    }
}

#[async_trait]
impl SearchTransport for ElasticClient {
    async fn search(&self, index: &str, body: &Value, scroll: Option<&str>) -> SearchResult<Value> {
        let mut req = self.request(Method::POST, &format!("{index}/_search")).json(body);
        if let Some(keep_alive) = scroll {
            req = req.query(&[("scroll", keep_alive)]);
        }
        self.send_json(req, "search").await
    }

    async fn scroll(&self, scroll_id: &str, keep_alive: &str) -> SearchResult<Value> {
        let req = self
            .request(Method::POST, "_search/scroll")
            .json(&json!({ "scroll": keep_alive, "scroll_id": scroll_id }));
        self.send_json(req, "scroll").await
    }

    async fn clear_scroll(&self, scroll_id: &str) -> SearchResult<()> {
        let req = self
            .request(Method::DELETE, "_search/scroll")
            .json(&json!({ "scroll_id": [scroll_id] }));
        self.send_json(req, "clear_scroll").await.map(|_| ())
    }

    async fn index_stats(&self, index: &str) -> SearchResult<Value> {
        let req = self.request(Method::GET, &format!("{index}/_stats"));
        self.send_json(req, "index_stats").await
    }

    async fn index_exists(&self, index: &str) -> SearchResult<bool> {
        let response = self
            .request(Method::HEAD, index)
            .send()
            .await
            .map_err(|e| SearchError::Backend(format!("index_exists: {e}")))?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(SearchError::Backend(format!("index_exists: HTTP {s}"))),
        }
    }

    async fn count(&self, index: &str) -> SearchResult<Value> {
        let req = self.request(Method::GET, &format!("{index}/_count"));
        self.send_json(req, "count").await
    }
}
