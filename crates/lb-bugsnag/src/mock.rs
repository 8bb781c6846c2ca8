//! In-memory error tracker for testing.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{BugsnagError, BugsnagResult};
use crate::filters::ErrorFilters;
use crate::tracker::ErrorTracker;

/// One recorded tracker call.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerCall {
    ListProjects,
    ProjectErrors {
        project_id: String,
        filters: ErrorFilters,
        per_page: i64,
    },
    ErrorDetails {
        error_id: String,
    },
    ErrorEvents {
        error_id: String,
        per_page: i64,
    },
}

/// Scripted tracker: projects, per-project error lists (or failures),
/// per-error details and events. Unknown ids answer with a backend error.
pub struct MockErrorTracker {
    projects: Mutex<BugsnagResult<Vec<Value>>>,
    errors: Mutex<HashMap<String, BugsnagResult<Vec<Value>>>>,
    details: Mutex<HashMap<String, Value>>,
    events: Mutex<HashMap<String, BugsnagResult<Vec<Value>>>>,
    calls: Mutex<Vec<TrackerCall>>,
}

impl MockErrorTracker {
    pub fn new() -> Self {
        Self {
            projects: Mutex::new(Ok(Vec::new())),
            errors: Mutex::new(HashMap::new()),
            details: Mutex::new(HashMap::new()),
            events: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_project(self, id: &str, name: &str) -> Self {
        if let Ok(projects) = self.projects.lock().unwrap().as_mut() {
            projects.push(json!({ "id": id, "name": name }));
        }
        self
    }

    pub fn fail_projects(&self, message: &str) {
        *self.projects.lock().unwrap() = Err(BugsnagError::Backend(message.into()));
    }

    pub fn set_errors(&self, project_id: &str, errors: Vec<Value>) {
        self.errors
            .lock()
            .unwrap()
            .insert(project_id.into(), Ok(errors));
    }

    pub fn fail_errors(&self, project_id: &str, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .insert(project_id.into(), Err(BugsnagError::Backend(message.into())));
    }

    pub fn set_details(&self, error_id: &str, details: Value) {
        self.details.lock().unwrap().insert(error_id.into(), details);
    }

    pub fn set_events(&self, error_id: &str, events: Vec<Value>) {
        self.events.lock().unwrap().insert(error_id.into(), Ok(events));
    }

    pub fn fail_events(&self, error_id: &str, message: &str) {
        self.events
            .lock()
            .unwrap()
            .insert(error_id.into(), Err(BugsnagError::Backend(message.into())));
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: TrackerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockErrorTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ErrorTracker for MockErrorTracker {
    async fn list_projects(&self) -> BugsnagResult<Vec<Value>> {
        self.record(TrackerCall::ListProjects);
        self.projects.lock().unwrap().clone()
    }

    async fn project_errors(
        &self,
        project_id: &str,
        filters: &ErrorFilters,
        per_page: i64,
    ) -> BugsnagResult<Vec<Value>> {
        self.record(TrackerCall::ProjectErrors {
            project_id: project_id.into(),
            filters: filters.clone(),
            per_page,
        });
        self.errors
            .lock()
            .unwrap()
            .get(project_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn error_details(&self, error_id: &str) -> BugsnagResult<Value> {
        self.record(TrackerCall::ErrorDetails {
            error_id: error_id.into(),
        });
        self.details
            .lock()
            .unwrap()
            .get(error_id)
            .cloned()
            .ok_or_else(|| BugsnagError::Backend(format!("error_details: HTTP 404 Not Found: {error_id}")))
    }

    async fn error_events(&self, error_id: &str, per_page: i64) -> BugsnagResult<Vec<Value>> {
        self.record(TrackerCall::ErrorEvents {
            error_id: error_id.into(),
            per_page,
        });
        let events = self
            .events
            .lock()
            .unwrap()
            .get(error_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))?;
        Ok(events.into_iter().take(per_page.max(0) as usize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_answers() {
        let mock = MockErrorTracker::new().with_project("p1", "Mobile");
        mock.set_errors("p1", vec![json!({ "id": "e1" })]);
        mock.fail_errors("p2", "HTTP 500");

        assert_eq!(mock.list_projects().await.unwrap().len(), 1);
        let filters = ErrorFilters::default();
        assert_eq!(mock.project_errors("p1", &filters, 10).await.unwrap().len(), 1);
        assert!(mock.project_errors("p2", &filters, 10).await.is_err());
        assert!(mock.project_errors("p3", &filters, 10).await.unwrap().is_empty());
        assert!(mock.error_details("nope").await.is_err());
        assert_eq!(mock.call_count(), 5);
    }
}
