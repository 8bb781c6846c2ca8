//! investigate_issues: errors, warnings and slow requests in one sweep.

use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::error::SearchResult;
use crate::flows::investigate_issues;
use crate::types::{SearchContext, SearchTool};

pub struct InvestigateIssues;

#[async_trait]
impl SearchTool for InvestigateIssues {
    fn name(&self) -> &str {
        "investigate_issues"
    }

    fn description(&self) -> &str {
        "Summarize recent errors, warnings and slow requests with recommendations"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "service": {
                    "type": "string",
                    "description": "Restrict to one service (default: all)"
                },
                "timeframe_minutes": {
                    "type": "integer",
                    "description": "Look-back window in minutes (default: 60)",
                    "default": 60
                },
                "environment": {
                    "type": "string",
                    "description": "Registry environment (default: current)"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &SearchContext<'_>) -> SearchResult<ToolResult> {
        let service = args::opt_str(&args, "service")?;
        let timeframe = args::opt_i64(&args, "timeframe_minutes")?;
        let environment = args::opt_str(&args, "environment")?;

        let report = investigate_issues(ctx, service, timeframe, environment).await?;
        let summary = format!(
            "{}: {} errors, {} warnings, {} slow requests{}",
            report.summary,
            report.error_count,
            report.warning_count,
            report.slow_request_count,
            if report.partial { " (partial)" } else { "" }
        );

        Ok(ToolResult::success(
            "investigate_issues",
            super::to_data(&report)?,
            summary,
        ))
    }
}
