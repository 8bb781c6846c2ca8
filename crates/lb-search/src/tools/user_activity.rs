//! fetch_user_activity: errors, slow requests and last activity for one user.

use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::error::SearchResult;
use crate::flows::{UserActivityQuery, fetch_user_activity};
use crate::types::{SearchContext, SearchTool};

pub struct FetchUserActivity;

#[async_trait]
impl SearchTool for FetchUserActivity {
    fn name(&self) -> &str {
        "fetch_user_activity"
    }

    fn description(&self) -> &str {
        "Fetch a user's error logs, slow requests and most recent log entry"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": ["integer", "string"],
                    "description": "Mobile (numeric) or web user id"
                },
                "timeframe_minutes": {
                    "type": "integer",
                    "description": "Window length, 1-1440 (default: 60)",
                    "default": 60
                },
                "slow_threshold_seconds": {
                    "type": "number",
                    "description": "Request time counted as slow (default: 2.0, min 0.1)",
                    "default": 2.0
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum results per category, 1-1000 (default: 100)",
                    "default": 100
                },
                "start_time": {
                    "type": "string",
                    "description": "Window start (RFC 3339); default is now minus timeframe"
                },
                "environment": {
                    "type": "string",
                    "description": "Registry environment (default: current)"
                }
            },
            "required": ["user_id"]
        })
    }

    async fn execute(&self, args: Value, ctx: &SearchContext<'_>) -> SearchResult<ToolResult> {
        let mut params = UserActivityQuery::new(args::req_id(&args, "user_id")?);
        params.timeframe_minutes = args::i64_or(&args, "timeframe_minutes", 60)?;
        params.limit = args::i64_or(&args, "limit", 100)?;
        if let Some(threshold) = args::opt_f64(&args, "slow_threshold_seconds")? {
            params.slow_threshold_seconds = threshold;
        }
        params.start_time = args::opt_str(&args, "start_time")?.map(String::from);
        params.environment = args::opt_str(&args, "environment")?.map(String::from);

        let activity = fetch_user_activity(ctx, &params).await?;
        let s = &activity.summary;
        let mut summary = format!(
            "User {}: {} errors, {} slow requests in the last {} min",
            s.user_id, s.total_errors, s.total_slow_requests, s.timeframe_minutes
        );
        if s.partial {
            summary.push_str(" (partial)");
        }

        Ok(ToolResult::success(
            "fetch_user_activity",
            super::to_data(&activity)?,
            summary,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use lb_config::{EnvironmentConfig, IndexRegistry};

    #[tokio::test]
    async fn numeric_user_id_accepted() {
        let mock = MockTransport::new();
        let reg = IndexRegistry::builtin();
        let env = EnvironmentConfig::default();
        let ctx = SearchContext::new(&mock, &reg, &env);

        let result = FetchUserActivity
            .execute(json!({ "user_id": 41343, "timeframe_minutes": 60 }), &ctx)
            .await
            .unwrap();
        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data["error_logs"], json!([]));
        assert_eq!(data["slow_requests"], json!([]));
        assert!(data["most_recent_log"].is_null());
        assert_eq!(data["summary"]["user_id"], "41343");
        assert!(data["summary"]["insights"][0]
            .as_str()
            .unwrap()
            .starts_with("No activity found"));
    }

    #[tokio::test]
    async fn user_id_required() {
        let mock = MockTransport::new();
        let reg = IndexRegistry::builtin();
        let env = EnvironmentConfig::default();
        let ctx = SearchContext::new(&mock, &reg, &env);

        let err = FetchUserActivity.execute(json!({}), &ctx).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn partial_marked_in_summary() {
        let mock = MockTransport::new();
        mock.queue_failure("timeout");
        let reg = IndexRegistry::builtin();
        let env = EnvironmentConfig::default();
        let ctx = SearchContext::new(&mock, &reg, &env);

        let result = FetchUserActivity
            .execute(json!({ "user_id": "u-1" }), &ctx)
            .await
            .unwrap();
        assert!(result.summary.unwrap().ends_with("(partial)"));
        assert_eq!(result.data.unwrap()["summary"]["failed_branches"], json!(["error_logs"]));
    }
}
