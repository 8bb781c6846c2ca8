//! Tool listing and invocation endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;

use lb_protocol::ToolResult;

use crate::error::{ApiError, ApiResult};
use crate::registry::ToolInfo;
use crate::state::AppState;

/// GET /api/v1/tools: every registered tool with its argument schema.
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolInfo>> {
    Json(state.tools.list_tools())
}

/// POST /api/v1/tools/{name}: run one tool. An empty body means no
/// arguments.
pub async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ToolResult>> {
    let args = parse_args(&body)?;
    let invocation_id = Uuid::now_v7();
    let started = Instant::now();
    tracing::info!(tool = %name, %invocation_id, "tool invoked");

    let result = state
        .tools
        .execute(&name, args, &state.search_context(), &state.error_context())
        .await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(result) => {
            tracing::info!(tool = %name, %invocation_id, elapsed_ms, "tool completed");
            Ok(Json(result))
        }
        Err(e) => {
            tracing::warn!(tool = %name, %invocation_id, elapsed_ms, error = %e, "tool failed");
            Err(e.into())
        }
    }
}

fn parse_args(body: &[u8]) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(args)) => Ok(Value::Object(args)),
        Ok(other) => Err(ApiError::Unprocessable(format!(
            "arguments must be a JSON object, got {other}"
        ))),
        Err(e) => Err(ApiError::Unprocessable(format!("invalid JSON: {e}"))),
    }
}
