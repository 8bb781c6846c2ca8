use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::context::{ErrorContext, ErrorTool};
use crate::error::BugsnagResult;
use crate::primitives;

pub struct ErrorEvents;

#[async_trait]
impl ErrorTool for ErrorEvents {
    fn name(&self) -> &str {
        "bugsnag_error_events"
    }

    fn description(&self) -> &str {
        "List the most recent occurrences of one Bugsnag error"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "error_id": { "type": "string", "description": "Bugsnag error id" },
                "limit": {
                    "type": "integer",
                    "description": "Maximum events, 1-100 (default: 10)",
                    "default": 10
                }
            },
            "required": ["error_id"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ErrorContext<'_>) -> BugsnagResult<ToolResult> {
        let error_id = args::req_str(&args, "error_id")?;
        let limit = args::i64_or(&args, "limit", 10)?;
        let events = primitives::error_events(ctx.tracker()?, error_id, limit).await?;
        let summary = format!("{} events for error {error_id}", events.len());
        Ok(ToolResult::success(
            "bugsnag_error_events",
            json!({ "error_id": error_id, "events": events, "count": events.len() }),
            summary,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockErrorTracker;
    use lb_config::BugsnagConfig;

    #[tokio::test]
    async fn events_limited() {
        let mock = MockErrorTracker::new();
        mock.set_events("e1", (0..20).map(|i| json!({ "id": i })).collect());
        let config = BugsnagConfig::default();
        let ctx = ErrorContext::new(Some(&mock), &config);

        let result = ErrorEvents
            .execute(json!({ "error_id": "e1", "limit": 3 }), &ctx)
            .await
            .unwrap();
        assert_eq!(result.data.unwrap()["count"], 3);
    }

    #[tokio::test]
    async fn error_id_required() {
        let mock = MockErrorTracker::new();
        let config = BugsnagConfig::default();
        let ctx = ErrorContext::new(Some(&mock), &config);
        assert!(ErrorEvents.execute(json!({}), &ctx).await.unwrap_err().is_validation());
    }
}
