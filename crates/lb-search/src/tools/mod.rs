//! Search tool implementations.

mod active_entities;
mod aggregate;
mod domain_logs;
mod index_stats;
mod investigate;
mod search_logs;
mod user_activity;

pub use active_entities::ListActiveEntities;
pub use aggregate::Aggregate;
pub use domain_logs::SearchDomainLogs;
pub use index_stats::GetIndexStats;
pub use investigate::InvestigateIssues;
pub use search_logs::SearchLogs;
pub use user_activity::FetchUserActivity;

use serde::Serialize;

use crate::error::{SearchError, SearchResult};
use crate::types::SearchTool;

/// Serialize a flow result into tool data.
pub(crate) fn to_data<T: Serialize>(value: &T) -> SearchResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| SearchError::Backend(format!("failed to encode result: {e}")))
}

/// Every search tool, in listing order.
pub fn all_tools() -> Vec<Box<dyn SearchTool>> {
    vec![
        Box::new(SearchLogs),
        Box::new(Aggregate),
        Box::new(GetIndexStats),
        Box::new(SearchDomainLogs),
        Box::new(ListActiveEntities),
        Box::new(FetchUserActivity),
        Box::new(InvestigateIssues),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let tools = all_tools();
        let names: HashSet<_> = tools.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn schemas_are_objects() {
        for tool in all_tools() {
            let schema = tool.parameters_schema();
            assert_eq!(schema["type"], "object", "{}", tool.name());
            assert!(!tool.description().is_empty());
        }
    }
}
