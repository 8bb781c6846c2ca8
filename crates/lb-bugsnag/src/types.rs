//! Typed views over Bugsnag payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One project of the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

impl ProjectRef {
    /// Read from a `/organizations/{org}/projects` entry. Entries without an
    /// id are dropped.
    pub fn from_value(v: &Value) -> Option<Self> {
        let id = match &v["id"] {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(Self {
            id,
            name: v["name"].as_str().unwrap_or("Unknown").to_string(),
        })
    }
}

/// A grouped error, trimmed to the fields callers act on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub id: Option<String>,
    #[serde(rename = "class")]
    pub error_class: Option<String>,
    pub message: Option<String>,
    pub context: Option<String>,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub events_count: u64,
    pub users_count: u64,
    pub severity: Option<String>,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user: Option<Value>,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

fn text(v: &Value, key: &str) -> Option<String> {
    match &v[key] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ErrorRecord {
    /// Lenient: missing fields read as `None` / 0.
    pub fn from_value(v: &Value) -> Self {
        Self {
            id: text(v, "id"),
            error_class: text(v, "error_class").or_else(|| text(v, "class")),
            message: text(v, "message"),
            context: text(v, "context"),
            first_seen: text(v, "first_seen"),
            last_seen: text(v, "last_seen"),
            events_count: v["events"].as_u64().or(v["events_count"].as_u64()).unwrap_or(0),
            users_count: v["users"].as_u64().or(v["users_count"].as_u64()).unwrap_or(0),
            severity: text(v, "severity"),
            status: text(v, "status"),
            assigned_user: v
                .get("assigned_collaborator_id")
                .or_else(|| v.get("assigned_user"))
                .filter(|u| !u.is_null())
                .cloned(),
            url: text(v, "url"),
            project_id: text(v, "project_id"),
            project_name: text(v, "project_name"),
            platform: None,
        }
    }

    /// Severity `error` is what Bugsnag treats as unhandled/critical.
    pub fn is_critical(&self) -> bool {
        self.severity.as_deref() == Some("error")
    }
}

/// Outcome of searching one project during an organization-wide sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: String,
    pub project_name: String,
    pub errors_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of [`search_errors`](crate::primitives::search_errors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSearch {
    /// Raw error groups, newest `last_seen` first, tagged with their project.
    pub errors: Vec<Value>,
    pub total_projects_searched: usize,
    pub project_summaries: Vec<ProjectSummary>,
    /// Count before truncation to the requested limit.
    pub total_errors_found: usize,
}
