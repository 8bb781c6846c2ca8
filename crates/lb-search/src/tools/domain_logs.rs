//! search_domain_logs: application logs filtered by logical fields.

use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::error::SearchResult;
use crate::flows::{DomainLogQuery, search_domain_logs};
use crate::types::{SearchContext, SearchTool};

pub struct SearchDomainLogs;

#[async_trait]
impl SearchTool for SearchDomainLogs {
    fn name(&self) -> &str {
        "search_domain_logs"
    }

    fn description(&self) -> &str {
        "Search application logs by pod, service, level and message text"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pod": { "type": "string", "description": "Pod / hostname" },
                "service": { "type": "string", "description": "Service name" },
                "level": {
                    "type": "string",
                    "enum": ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"],
                    "description": "Log level (stored variants are matched too)"
                },
                "message_contains": {
                    "type": "string",
                    "description": "Full-text match on the message"
                },
                "timeframe_minutes": {
                    "type": "integer",
                    "description": "Look-back window in minutes (default: 60)",
                    "default": 60
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum entries (default: index default size)"
                },
                "environment": {
                    "type": "string",
                    "description": "Registry environment (default: current)"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &SearchContext<'_>) -> SearchResult<ToolResult> {
        let params = DomainLogQuery {
            pod: args::opt_str(&args, "pod")?.map(String::from),
            service: args::opt_str(&args, "service")?.map(String::from),
            level: args::opt_str(&args, "level")?.map(String::from),
            message_contains: args::opt_str(&args, "message_contains")?.map(String::from),
            timeframe_minutes: args::opt_i64(&args, "timeframe_minutes")?,
            limit: args::opt_i64(&args, "limit")?,
            environment: args::opt_str(&args, "environment")?.map(String::from),
        };

        let logs = search_domain_logs(ctx, &params).await?;
        let mut summary = format!(
            "Found {} log entries in {} (last {} min)",
            logs.entries.len(),
            logs.index_pattern,
            logs.timeframe_minutes
        );
        if !logs.unsupported_filters.is_empty() {
            summary.push_str(&format!(
                "; ignored unmapped filters: {}",
                logs.unsupported_filters.join(", ")
            ));
        }

        Ok(ToolResult::success(
            "search_domain_logs",
            super::to_data(&logs)?,
            summary,
        ))
    }
}
