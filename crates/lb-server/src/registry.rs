//! Unified tool registry spanning search and error-tracking tools.
//!
//! The HTTP layer looks tools up here by name and runs them against the
//! contexts built from application state.

use serde::Serialize;
use std::collections::HashMap;

use lb_bugsnag::{BugsnagError, ErrorContext, ErrorTool};
use lb_protocol::ToolResult;
use lb_search::{SearchContext, SearchError, SearchTool};

/// Which subsystem a tool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Search,
    ErrorTracking,
}

/// Metadata about a registered tool (used by the tool listing API).
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub kind: ToolKind,
    pub schema: serde_json::Value,
}

/// Why a tool call produced no result.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    ErrorTracking(#[from] BugsnagError),
}

/// Holds both tool families, indexed by name.
pub struct ToolRegistry {
    search_tools: Vec<Box<dyn SearchTool>>,
    error_tools: Vec<Box<dyn ErrorTool>>,
    /// Map from tool name → (kind, index into the appropriate Vec).
    index: HashMap<String, (ToolKind, usize)>,
}

impl ToolRegistry {
    pub fn new(search_tools: Vec<Box<dyn SearchTool>>, error_tools: Vec<Box<dyn ErrorTool>>) -> Self {
        let mut index = HashMap::new();
        for (i, tool) in search_tools.iter().enumerate() {
            index.insert(tool.name().to_string(), (ToolKind::Search, i));
        }
        for (i, tool) in error_tools.iter().enumerate() {
            index.insert(tool.name().to_string(), (ToolKind::ErrorTracking, i));
        }

        Self {
            search_tools,
            error_tools,
            index,
        }
    }

    /// Every tool from both crates.
    pub fn with_defaults() -> Self {
        Self::new(lb_search::tools::all_tools(), lb_bugsnag::tools::all_tools())
    }

    pub fn lookup(&self, name: &str) -> Option<(ToolKind, usize)> {
        self.index.get(name).copied()
    }

    /// Run a tool by name. Each family only sees its own context.
    pub async fn execute(
        &self,
        name: &str,
        args: serde_json::Value,
        search: &SearchContext<'_>,
        errors: &ErrorContext<'_>,
    ) -> Result<ToolResult, ToolError> {
        match self.lookup(name) {
            Some((ToolKind::Search, i)) => Ok(self.search_tools[i].execute(args, search).await?),
            Some((ToolKind::ErrorTracking, i)) => {
                Ok(self.error_tools[i].execute(args, errors).await?)
            }
            None => Err(ToolError::UnknownTool(name.to_string())),
        }
    }

    /// List all registered tools, search tools first.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        let search = self.search_tools.iter().map(|tool| ToolInfo {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            kind: ToolKind::Search,
            schema: tool.parameters_schema(),
        });
        let errors = self.error_tools.iter().map(|tool| ToolInfo {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            kind: ToolKind::ErrorTracking,
            schema: tool.parameters_schema(),
        });
        search.chain(errors).collect()
    }

    pub fn len(&self) -> usize {
        self.search_tools.len() + self.error_tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.search_tools.is_empty() && self.error_tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lb_bugsnag::MockErrorTracker;
    use lb_config::{BugsnagConfig, EnvironmentConfig, IndexRegistry};
    use lb_search::MockTransport;
    use serde_json::json;

    #[test]
    fn registry_with_defaults() {
        let reg = ToolRegistry::with_defaults();
        assert_eq!(reg.len(), 13); // 7 search + 6 error tracking
        assert!(!reg.is_empty());
        assert_eq!(reg.index.len(), reg.len());
    }

    #[test]
    fn lookup_by_kind() {
        let reg = ToolRegistry::with_defaults();
        assert_eq!(reg.lookup("search_logs").unwrap().0, ToolKind::Search);
        assert_eq!(
            reg.lookup("fetch_user_errors").unwrap().0,
            ToolKind::ErrorTracking
        );
        assert!(reg.lookup("rm_rf").is_none());
    }

    #[test]
    fn kind_serializes_snake_case() {
        let info = &ToolRegistry::with_defaults().list_tools()[0];
        assert_eq!(serde_json::to_value(info).unwrap()["kind"], "search");
        assert_eq!(
            serde_json::to_value(ToolKind::ErrorTracking).unwrap(),
            "error_tracking"
        );
    }

    #[tokio::test]
    async fn dispatches_to_the_right_family() {
        let reg = ToolRegistry::with_defaults();
        let transport = MockTransport::new();
        let indices = IndexRegistry::builtin();
        let env = EnvironmentConfig::default();
        let tracker = MockErrorTracker::new().with_project("p1", "Mobile");
        let bugsnag = BugsnagConfig::default();
        let search = SearchContext::new(&transport, &indices, &env);
        let errors = ErrorContext::new(Some(&tracker), &bugsnag);

        let result = reg
            .execute("bugsnag_list_projects", json!({}), &search, &errors)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(transport.call_count(), 0);
        assert_eq!(tracker.call_count(), 1);

        let err = reg
            .execute("nope", json!({}), &search, &errors)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref n) if n == "nope"));
    }
}
