//! fetch_user_errors and search_user_errors.

use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::context::{ErrorContext, ErrorTool};
use crate::error::BugsnagResult;
use crate::flows::{UserErrorsQuery, fetch_user_errors, search_user_errors};

pub struct FetchUserErrors;

#[async_trait]
impl ErrorTool for FetchUserErrors {
    fn name(&self) -> &str {
        "fetch_user_errors"
    }

    fn description(&self) -> &str {
        "Fetch a user's Bugsnag errors from every configured project, grouped by platform"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": ["integer", "string"],
                    "description": "User id as reported to Bugsnag"
                },
                "timeframe_minutes": {
                    "type": "integer",
                    "description": "Window length (default: 1440)",
                    "default": 1440
                },
                "start_time": {
                    "type": "string",
                    "description": "Window start (RFC 3339); default is now minus timeframe"
                },
                "limit_per_project": {
                    "type": "integer",
                    "description": "Maximum errors per project, 1-100 (default: 25)",
                    "default": 25
                }
            },
            "required": ["user_id"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ErrorContext<'_>) -> BugsnagResult<ToolResult> {
        let mut params = UserErrorsQuery::new(args::req_id(&args, "user_id")?);
        params.timeframe_minutes = args::i64_or(&args, "timeframe_minutes", 1440)?;
        params.limit_per_project = args::i64_or(&args, "limit_per_project", 25)?;
        params.start_time = args::opt_str(&args, "start_time")?.map(String::from);

        let errors = fetch_user_errors(ctx, &params).await?;
        let failed = errors
            .projects_searched
            .iter()
            .filter(|p| p.status == "error")
            .count();
        let mut summary = format!(
            "User {}: {} errors across {} projects",
            errors.user_id,
            errors.total_errors_across_platforms,
            errors.projects_searched.len()
        );
        if failed > 0 {
            summary.push_str(&format!(" ({failed} failed)"));
        }
        Ok(ToolResult::success("fetch_user_errors", errors.to_json(), summary))
    }
}

pub struct SearchUserErrors;

#[async_trait]
impl ErrorTool for SearchUserErrors {
    fn name(&self) -> &str {
        "search_user_errors"
    }

    fn description(&self) -> &str {
        "Search every Bugsnag project for a user's errors with severity and status breakdowns"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": { "type": ["integer", "string"] },
                "timeframe_minutes": { "type": "integer", "default": 1440 },
                "start_time": { "type": "string" },
                "limit": {
                    "type": "integer",
                    "description": "Maximum errors, 1-100 (default: 50)",
                    "default": 50
                }
            },
            "required": ["user_id"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ErrorContext<'_>) -> BugsnagResult<ToolResult> {
        let user_id = args::req_id(&args, "user_id")?;
        let timeframe = args::i64_or(&args, "timeframe_minutes", 1440)?;
        let limit = args::i64_or(&args, "limit", 50)?;
        let start_time = args::opt_str(&args, "start_time")?;

        let found = search_user_errors(ctx, &user_id, timeframe, start_time, limit).await?;
        let summary = format!(
            "User {user_id}: {} errors{}",
            found.total_errors,
            if found.has_critical_errors { ", critical errors present" } else { "" }
        );
        Ok(ToolResult::success(
            "search_user_errors",
            super::to_data(&found)?,
            summary,
        ))
    }
}
