//! Error-tracking primitives: projects, error search, details, events.
//!
//! Limits are clamped before any call. Backend failures propagate, except
//! inside the organization-wide sweep where each project is searched
//! independently and a failing project is recorded in its summary.

use serde_json::Value;

use crate::error::{BugsnagError, BugsnagResult};
use crate::filters::{ErrorFilters, MAX_PER_PAGE};
use crate::tracker::ErrorTracker;
use crate::types::{ErrorSearch, ProjectRef, ProjectSummary};

/// Per-project page size during an organization-wide sweep.
pub const SWEEP_PER_PROJECT_LIMIT: i64 = 25;

pub async fn list_projects(tracker: &dyn ErrorTracker) -> BugsnagResult<Vec<ProjectRef>> {
    let raw = tracker.list_projects().await?;
    Ok(raw.iter().filter_map(ProjectRef::from_value).collect())
}

/// Search one project, or every project of the organization when
/// `project_id` is `None`.
pub async fn search_errors(
    tracker: &dyn ErrorTracker,
    project_id: Option<&str>,
    filters: &ErrorFilters,
    limit: i64,
) -> BugsnagResult<ErrorSearch> {
    let limit = limit.clamp(1, MAX_PER_PAGE);

    if let Some(id) = project_id.filter(|p| !p.is_empty()) {
        let errors = tracker.project_errors(id, filters, limit).await?;
        let found = errors.len();
        return Ok(ErrorSearch {
            errors,
            total_projects_searched: 1,
            project_summaries: vec![ProjectSummary {
                project_id: id.to_string(),
                project_name: id.to_string(),
                errors_found: found,
                error: None,
            }],
            total_errors_found: found,
        });
    }

    let projects = list_projects(tracker).await?;
    let per_project = limit.min(SWEEP_PER_PROJECT_LIMIT);
    let mut all_errors = Vec::new();
    let mut summaries = Vec::with_capacity(projects.len());

    for project in &projects {
        match tracker.project_errors(&project.id, filters, per_project).await {
            Ok(errors) => {
                summaries.push(ProjectSummary {
                    project_id: project.id.clone(),
                    project_name: project.name.clone(),
                    errors_found: errors.len(),
                    error: None,
                });
                all_errors.extend(errors.into_iter().map(|e| tag_project(e, project)));
            }
            Err(e) => {
                tracing::warn!(project = %project.name, error = %e, "project error search failed");
                summaries.push(ProjectSummary {
                    project_id: project.id.clone(),
                    project_name: project.name.clone(),
                    errors_found: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    // ISO-8601 strings order chronologically.
    all_errors.sort_by(|a, b| last_seen(b).cmp(last_seen(a)));
    let total = all_errors.len();
    all_errors.truncate(limit as usize);

    Ok(ErrorSearch {
        errors: all_errors,
        total_projects_searched: projects.len(),
        project_summaries: summaries,
        total_errors_found: total,
    })
}

fn last_seen(error: &Value) -> &str {
    error["last_seen"].as_str().unwrap_or("")
}

fn tag_project(mut error: Value, project: &ProjectRef) -> Value {
    if let Value::Object(obj) = &mut error {
        obj.insert("project_id".into(), Value::String(project.id.clone()));
        obj.insert("project_name".into(), Value::String(project.name.clone()));
    }
    error
}

fn require_id(error_id: &str) -> BugsnagResult<&str> {
    let id = error_id.trim();
    if id.is_empty() {
        return Err(BugsnagError::validation("error_id", "must not be empty"));
    }
    Ok(id)
}

pub async fn error_details(tracker: &dyn ErrorTracker, error_id: &str) -> BugsnagResult<Value> {
    tracker.error_details(require_id(error_id)?).await
}

/// Most recent occurrences of one error, `limit` clamped to `[1, 100]`.
pub async fn error_events(
    tracker: &dyn ErrorTracker,
    error_id: &str,
    limit: i64,
) -> BugsnagResult<Vec<Value>> {
    let id = require_id(error_id)?;
    tracker.error_events(id, limit.clamp(1, MAX_PER_PAGE)).await
}

/// Connectivity check: listing projects succeeds.
pub async fn ping(tracker: &dyn ErrorTracker) -> bool {
    match tracker.list_projects().await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(error = %e, "bugsnag ping failed");
            false
        }
    }
}
