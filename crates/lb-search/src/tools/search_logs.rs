//! search_logs: raw Query-DSL passthrough against any index pattern.

use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::error::SearchResult;
use crate::primitives;
use crate::request::{SearchRequest, SourceFilter};
use crate::types::{SearchContext, SearchTool};

pub struct SearchLogs;

#[async_trait]
impl SearchTool for SearchLogs {
    fn name(&self) -> &str {
        "search_logs"
    }

    fn description(&self) -> &str {
        "Run a raw Elasticsearch query against an index pattern"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "index_pattern": {
                    "type": "string",
                    "description": "Index pattern to search (e.g. app-logs*)"
                },
                "query": {
                    "type": "object",
                    "description": "Query DSL (default: match_all)"
                },
                "size": {
                    "type": "integer",
                    "description": "Number of hits, 1-10000 (default: 100)",
                    "default": 100
                },
                "offset": {
                    "type": "integer",
                    "description": "Hits to skip (default: 0)",
                    "default": 0
                },
                "sort": {
                    "type": "array",
                    "description": "Sort clauses, e.g. [{\"@timestamp\": {\"order\": \"desc\"}}]"
                },
                "fields": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Fields to return"
                },
                "source": {
                    "description": "_source filter: false, a field list, or includes/excludes"
                }
            },
            "required": ["index_pattern"]
        })
    }

    async fn execute(&self, args: Value, ctx: &SearchContext<'_>) -> SearchResult<ToolResult> {
        let index_pattern = args::req_str(&args, "index_pattern")?;
        let query = args
            .get("query")
            .filter(|q| q.is_object())
            .cloned()
            .unwrap_or_else(|| json!({ "match_all": {} }));

        let mut request = SearchRequest::new(index_pattern, query)
            .size(args::i64_or(&args, "size", 100)?)
            .offset(args::i64_or(&args, "offset", 0)?);
        if let Some(sort) = args.get("sort").and_then(Value::as_array) {
            request = request.sort(sort.clone());
        }
        if let Some(fields) = args::opt_str_list(&args, "fields")? {
            request = request.fields(fields);
        }
        if let Some(source) = args.get("source") {
            request = request.source(SourceFilter::from_arg(source));
        }

        let response = primitives::search(ctx.transport, &request).await?;
        let returned = response.hits.len();
        let total = response.total;
        let data = json!({
            "took": response.took,
            "timed_out": response.timed_out,
            "total": total,
            "hits": response.hits,
        });

        Ok(ToolResult::success(
            "search_logs",
            data,
            format!("Returned {returned} of {total} hits from {index_pattern}"),
        ))
    }
}
