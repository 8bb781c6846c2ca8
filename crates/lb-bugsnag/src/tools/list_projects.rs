use async_trait::async_trait;
use serde_json::{Value, json};

use lb_protocol::ToolResult;

use crate::context::{ErrorContext, ErrorTool};
use crate::error::BugsnagResult;
use crate::primitives;

pub struct ListProjects;

#[async_trait]
impl ErrorTool for ListProjects {
    fn name(&self) -> &str {
        "bugsnag_list_projects"
    }

    fn description(&self) -> &str {
        "List the Bugsnag projects of the configured organization"
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value, ctx: &ErrorContext<'_>) -> BugsnagResult<ToolResult> {
        let projects = primitives::list_projects(ctx.tracker()?).await?;
        let summary = format!("{} projects", projects.len());
        Ok(ToolResult::success(
            "bugsnag_list_projects",
            json!({ "projects": super::to_data(&projects)?, "count": projects.len() }),
            summary,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BugsnagError;
    use crate::mock::MockErrorTracker;
    use lb_config::BugsnagConfig;

    #[tokio::test]
    async fn lists_projects() {
        let mock = MockErrorTracker::new()
            .with_project("p1", "Mobile")
            .with_project("p2", "Dashboard");
        let config = BugsnagConfig::default();
        let ctx = ErrorContext::new(Some(&mock), &config);

        let result = ListProjects.execute(json!({}), &ctx).await.unwrap();
        let data = result.data.unwrap();
        assert_eq!(data["count"], 2);
        assert_eq!(data["projects"][1]["name"], "Dashboard");
    }

    #[tokio::test]
    async fn unconfigured_tracker() {
        let config = BugsnagConfig::default();
        let ctx = ErrorContext::new(None, &config);
        let err = ListProjects.execute(json!({}), &ctx).await.unwrap_err();
        assert!(matches!(err, BugsnagError::Configuration(_)));
    }
}
