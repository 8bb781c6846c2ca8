//! aggregate: run an aggregation tree with an optional filter query.

use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::{ToolResult, args};

use crate::error::{SearchError, SearchResult};
use crate::primitives;
use crate::request::AggregationRequest;
use crate::types::{SearchContext, SearchTool};

pub struct Aggregate;

#[async_trait]
impl SearchTool for Aggregate {
    fn name(&self) -> &str {
        "aggregate"
    }

    fn description(&self) -> &str {
        "Run Elasticsearch aggregations over an index pattern"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "index_pattern": {
                    "type": "string",
                    "description": "Index pattern to aggregate over"
                },
                "query": {
                    "type": "object",
                    "description": "Filter query (default: match_all)"
                },
                "aggregations": {
                    "type": "object",
                    "description": "Aggregation definitions keyed by name"
                }
            },
            "required": ["index_pattern", "aggregations"]
        })
    }

    async fn execute(&self, args: Value, ctx: &SearchContext<'_>) -> SearchResult<ToolResult> {
        let index_pattern = args::req_str(&args, "index_pattern")?;
        let aggregations = args
            .get("aggregations")
            .filter(|a| a.as_object().is_some_and(|o| !o.is_empty()))
            .cloned()
            .ok_or_else(|| {
                SearchError::validation("aggregations", "expected a non-empty object")
            })?;
        let query = args
            .get("query")
            .filter(|q| q.is_object())
            .cloned()
            .unwrap_or_else(|| json!({ "match_all": {} }));

        let request = AggregationRequest::new(index_pattern, query, aggregations);
        let response = primitives::aggregate(ctx.transport, &request).await?;
        let names = response
            .aggregations
            .as_object()
            .map(|o| o.len())
            .unwrap_or(0);

        Ok(ToolResult::success(
            "aggregate",
            json!({
                "took": response.took,
                "timed_out": response.timed_out,
                "aggregations": response.aggregations,
            }),
            format!("Computed {names} aggregations over {index_pattern}"),
        ))
    }
}
