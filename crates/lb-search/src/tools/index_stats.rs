//! get_index_stats: per-index document and storage counters.

use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::error::SearchResult;
use crate::primitives;
use crate::types::{SearchContext, SearchTool};

pub struct GetIndexStats;

#[async_trait]
impl SearchTool for GetIndexStats {
    fn name(&self) -> &str {
        "get_index_stats"
    }

    fn description(&self) -> &str {
        "Document counts, store size and indexing/search totals per index"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "index_pattern": {
                    "type": "string",
                    "description": "Index pattern to inspect"
                }
            },
            "required": ["index_pattern"]
        })
    }

    async fn execute(&self, args: Value, ctx: &SearchContext<'_>) -> SearchResult<ToolResult> {
        let index_pattern = args::req_str(&args, "index_pattern")?;
        let stats = primitives::index_stats(ctx.transport, index_pattern).await?;
        let docs: u64 = stats.values().map(|s| s.docs_count).sum();
        let count = stats.len();

        Ok(ToolResult::success(
            "get_index_stats",
            super::to_data(&stats)?,
            format!("{count} indices matching {index_pattern}, {docs} documents"),
        ))
    }
}
