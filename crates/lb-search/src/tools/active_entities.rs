//! list_active_entities: distinct pods (or another logical field) seen recently.

use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::error::SearchResult;
use crate::flows::list_active_entities;
use crate::types::{SearchContext, SearchTool};

pub struct ListActiveEntities;

#[async_trait]
impl SearchTool for ListActiveEntities {
    fn name(&self) -> &str {
        "list_active_entities"
    }

    fn description(&self) -> &str {
        "List distinct pods (or another logical field) that logged in the window"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "field": {
                    "type": "string",
                    "description": "Logical field to enumerate (default: pod)",
                    "default": "pod"
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
        let field = args::opt_str(&args, "field")?.unwrap_or("pod");
        let timeframe = args::opt_i64(&args, "timeframe_minutes")?;
        let environment = args::opt_str(&args, "environment")?;

        let entities = list_active_entities(ctx, field, timeframe, environment).await?;
        let count = entities.len();

        Ok(ToolResult::success(
            "list_active_entities",
            json!({
                "field": field,
                "environment": ctx.environment_name(environment),
                "entities": entities,
                "count": count,
            }),
            format!("{count} active {field} values"),
        ))
    }
}
