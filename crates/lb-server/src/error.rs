//! Unified API error type with Axum `IntoResponse` support.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use lb_bugsnag::BugsnagError;
use lb_search::SearchError;

use crate::registry::ToolError;

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    /// A tool rejected its arguments.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body is not a JSON argument object.
    #[error("unprocessable arguments: {0}")]
    Unprocessable(String),

    /// Elasticsearch or Bugsnag failed.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<ToolError> for ApiError {
    fn from(e: ToolError) -> Self {
        let message = e.to_string();
        match e {
            ToolError::UnknownTool(name) => ApiError::NotFound(format!("tool '{name}'")),
            ToolError::Search(SearchError::Validation { .. })
            | ToolError::ErrorTracking(BugsnagError::Validation { .. }) => {
                ApiError::BadRequest(message)
            }
            ToolError::Search(SearchError::Backend(_))
            | ToolError::ErrorTracking(BugsnagError::Backend(_)) => ApiError::Backend(message),
            ToolError::Search(SearchError::Configuration(_))
            | ToolError::ErrorTracking(BugsnagError::Configuration(_)) => {
                ApiError::Internal(message)
            }
        }
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
