//! bugsnag_search_errors: one project, or the whole organization.

use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::context::{ErrorContext, ErrorTool};
use crate::error::BugsnagResult;
use crate::filters::ErrorFilters;
use crate::primitives;

pub struct SearchErrors;

#[async_trait]
impl ErrorTool for SearchErrors {
    fn name(&self) -> &str {
        "bugsnag_search_errors"
    }

    fn description(&self) -> &str {
        "Search Bugsnag errors by project, user and time range; without a project every project is searched"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {
                    "type": "string",
                    "description": "Project to search (default: all projects)"
                },
                "user_id": {
                    "type": ["integer", "string"],
                    "description": "Only errors seen by this user"
                },
                "since": {
                    "type": "string",
                    "description": "Lower time bound, e.g. 2024-01-15T00:00:00Z"
                },
                "before": {
                    "type": "string",
                    "description": "Upper time bound, e.g. 2024-01-16T00:00:00Z"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum errors, 1-100 (default: 25)",
                    "default": 25
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ErrorContext<'_>) -> BugsnagResult<ToolResult> {
        let filters = ErrorFilters {
            user_id: match args.get("user_id") {
                Some(v) if !v.is_null() => Some(args::req_id(&args, "user_id")?),
                _ => None,
            },
            since: args::opt_str(&args, "since")?.map(String::from),
            before: args::opt_str(&args, "before")?.map(String::from),
        };
        let project_id = args::opt_str(&args, "project_id")?;
        let limit = args::i64_or(&args, "limit", 25)?;

        let found = primitives::search_errors(ctx.tracker()?, project_id, &filters, limit).await?;
        let summary = format!(
            "{} errors across {} projects",
            found.total_errors_found, found.total_projects_searched
        );
        Ok(ToolResult::success(
            "bugsnag_search_errors",
            super::to_data(&found)?,
            summary,
        ))
    }
}
