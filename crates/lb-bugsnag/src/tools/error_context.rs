use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::context::{ErrorContext, ErrorTool};
use crate::error::BugsnagResult;
use crate::flows::get_error_context;

pub struct GetErrorContext;

#[async_trait]
impl ErrorTool for GetErrorContext {
    fn name(&self) -> &str {
        "get_error_context"
    }

    fn description(&self) -> &str {
        "Get full details of a Bugsnag error, optionally with its most recent events"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "error_id": { "type": "string", "description": "Bugsnag error id" },
                "include_events": {
                    "type": "boolean",
                    "description": "Attach up to 5 recent events (default: true)",
                    "default": true
                }
            },
            "required": ["error_id"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ErrorContext<'_>) -> BugsnagResult<ToolResult> {
        let error_id = args::req_str(&args, "error_id")?;
        let include_events = args::bool_or(&args, "include_events", true)?;
        let report = get_error_context(ctx, error_id, include_events).await?;

        let class = report.details["error_class"]
            .as_str()
            .or(report.details["class"].as_str())
            .unwrap_or("unknown class");
        let summary = match &report.recent_events {
            Some(events) => format!("Error {error_id} ({class}), {} recent events", events.len()),
            None => format!("Error {error_id} ({class})"),
        };
        Ok(ToolResult::success(
            "get_error_context",
            super::to_data(&report)?,
            summary,
        ))
    }
}
