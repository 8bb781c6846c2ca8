//! User-centric error flows.
//!
//! `fetch_user_errors` searches every configured project separately and
//! buckets the results by platform key; `search_user_errors` runs one
//! organization-wide sweep; `get_error_context` pairs an error's details
//! with its most recent events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use lb_config::{BugsnagProject, ConfigError};
use lb_protocol::TimeWindow;

use crate::context::ErrorContext;
use crate::error::BugsnagResult;
use crate::filters::{ErrorFilters, MAX_PER_PAGE};
use crate::primitives;
use crate::types::{ErrorRecord, ProjectSummary};

/// Upper bound on any user error window, in minutes.
pub const MAX_TIMEFRAME_MINUTES: i64 = 1440;

// ── fetch_user_errors ─────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct UserErrorsQuery {
    pub user_id: String,
    pub timeframe_minutes: i64,
    pub start_time: Option<String>,
    pub limit_per_project: i64,
}

impl UserErrorsQuery {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            timeframe_minutes: 1440,
            start_time: None,
            limit_per_project: 25,
        }
    }
}

/// Outcome of searching one configured project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSearch {
    pub project_id: String,
    pub project_name: String,
    pub project_type: String,
    pub status: &'static str,
    pub errors_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserErrors {
    pub user_id: String,
    pub search_period: Value,
    pub timeframe_minutes: i64,
    pub projects_searched: Vec<ProjectSearch>,
    /// Platform key → errors found in that project.
    pub errors_by_platform: BTreeMap<String, Vec<ErrorRecord>>,
    pub total_errors_across_platforms: usize,
    pub critical_errors_found: bool,
    pub insights: Vec<String>,
}

impl UserErrors {
    pub fn has_issues(&self, platform: &str) -> bool {
        self.errors_by_platform
            .get(platform)
            .is_some_and(|errors| !errors.is_empty())
    }

    /// Caller-facing shape: `<platform>_errors` lists next to a summary with
    /// `total_<platform>_errors` and `has_<platform>_issues` per platform.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("user_id".into(), json!(self.user_id));
        let mut period = self.search_period.clone();
        period["timeframe_minutes"] = json!(self.timeframe_minutes);
        out.insert("search_period".into(), period);
        out.insert("projects_searched".into(), json!(self.projects_searched));

        let mut summary = Map::new();
        for (platform, errors) in &self.errors_by_platform {
            out.insert(format!("{platform}_errors"), json!(errors));
            summary.insert(format!("total_{platform}_errors"), json!(errors.len()));
            summary.insert(format!("has_{platform}_issues"), json!(!errors.is_empty()));
        }
        summary.insert(
            "total_errors_across_platforms".into(),
            json!(self.total_errors_across_platforms),
        );
        summary.insert("critical_errors_found".into(), json!(self.critical_errors_found));
        out.insert("summary".into(), Value::Object(summary));
        out.insert("insights".into(), json!(self.insights));
        Value::Object(out)
    }
}

pub async fn fetch_user_errors(
    ctx: &ErrorContext<'_>,
    params: &UserErrorsQuery,
) -> BugsnagResult<UserErrors> {
    fetch_user_errors_at(ctx, params, Utc::now()).await
}

/// [`fetch_user_errors`] with an injected clock reading.
pub async fn fetch_user_errors_at(
    ctx: &ErrorContext<'_>,
    params: &UserErrorsQuery,
    now: DateTime<Utc>,
) -> BugsnagResult<UserErrors> {
    let tracker = ctx.tracker()?;
    if ctx.config.projects.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "BUGSNAG_PROJECTS".into(),
            message: "no projects configured".into(),
        }
        .into());
    }

    let timeframe = params.timeframe_minutes.clamp(1, MAX_TIMEFRAME_MINUTES);
    let limit = params.limit_per_project.clamp(1, MAX_PER_PAGE);
    let window = TimeWindow::resolve(now, params.start_time.as_deref(), timeframe);
    let (since, before) = window.to_zulu();
    let filters = ErrorFilters::for_user(&params.user_id).between(since, before);

    let mut projects_searched = Vec::with_capacity(ctx.config.projects.len());
    let mut errors_by_platform: BTreeMap<String, Vec<ErrorRecord>> = BTreeMap::new();

    for project in &ctx.config.projects {
        match primitives::search_errors(tracker, Some(project.id.as_str()), &filters, limit).await {
            Ok(found) => {
                let records: Vec<ErrorRecord> = found
                    .errors
                    .iter()
                    .map(|raw| platform_record(raw, project))
                    .collect();
                projects_searched.push(project_search(project, "success", records.len(), None));
                errors_by_platform
                    .entry(project.key.clone())
                    .or_default()
                    .extend(records);
            }
            Err(e) => {
                tracing::warn!(project = %project.name, user_id = %params.user_id, error = %e, "user error search failed");
                projects_searched.push(project_search(project, "error", 0, Some(e.to_string())));
                errors_by_platform.entry(project.key.clone()).or_default();
            }
        }
    }

    let total: usize = errors_by_platform.values().map(Vec::len).sum();
    let critical = errors_by_platform
        .values()
        .flatten()
        .any(ErrorRecord::is_critical);
    let insights = platform_insights(&errors_by_platform, &ctx.config.projects, critical);

    tracing::info!(user_id = %params.user_id, total, critical, "user errors fetched");

    Ok(UserErrors {
        user_id: params.user_id.clone(),
        search_period: window.to_json(),
        timeframe_minutes: timeframe,
        projects_searched,
        errors_by_platform,
        total_errors_across_platforms: total,
        critical_errors_found: critical,
        insights,
    })
}

fn platform_record(raw: &Value, project: &BugsnagProject) -> ErrorRecord {
    let mut record = ErrorRecord::from_value(raw);
    record.project_name = Some(project.name.clone());
    record.platform = Some(project.key.clone());
    record
}

fn project_search(
    project: &BugsnagProject,
    status: &'static str,
    errors_found: usize,
    error_message: Option<String>,
) -> ProjectSearch {
    ProjectSearch {
        project_id: project.id.clone(),
        project_name: project.name.clone(),
        project_type: project.key.clone(),
        status,
        errors_found,
        error_message,
    }
}

fn platform_insights(
    by_platform: &BTreeMap<String, Vec<ErrorRecord>>,
    projects: &[BugsnagProject],
    critical: bool,
) -> Vec<String> {
    let mut platforms: Vec<&str> = Vec::new();
    for project in projects {
        if !platforms.contains(&project.key.as_str()) {
            platforms.push(&project.key);
        }
    }
    let affected: Vec<&str> = platforms
        .iter()
        .copied()
        .filter(|key| by_platform.get(*key).is_some_and(|e| !e.is_empty()))
        .collect();

    if affected.is_empty() {
        return vec![format!(
            "No errors found for this user across {} platforms",
            platforms.join(" and ")
        )];
    }

    let mut out: Vec<String> = affected
        .iter()
        .map(|key| format!("{} {key} errors found", by_platform[*key].len()))
        .collect();
    if critical {
        out.push("Critical errors detected - immediate attention required".into());
    }
    match affected.as_slice() {
        [only] if platforms.len() > 1 => out.push(format!("Issues isolated to {only} platform")),
        [_] => {}
        _ => out.push(
            "Cross-platform issues detected - may indicate backend or user-specific problem".into(),
        ),
    }
    out
}

// ── search_user_errors ────────────────────────────────────────

/// Errors shown in full; the rest only count toward the breakdowns.
pub const DETAILED_ERRORS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct UserErrorSummary {
    pub user_id: String,
    pub search_period: Value,
    pub total_errors: usize,
    pub severity_breakdown: BTreeMap<String, usize>,
    pub status_breakdown: BTreeMap<String, usize>,
    pub has_critical_errors: bool,
    pub has_recent_errors: bool,
    pub errors: Vec<ErrorRecord>,
    pub all_errors_count: usize,
    pub project_summaries: Vec<ProjectSummary>,
}

/// Organization-wide sweep for one user with severity/status breakdowns.
pub async fn search_user_errors(
    ctx: &ErrorContext<'_>,
    user_id: &str,
    timeframe_minutes: i64,
    start_time: Option<&str>,
    limit: i64,
) -> BugsnagResult<UserErrorSummary> {
    search_user_errors_at(ctx, user_id, timeframe_minutes, start_time, limit, Utc::now()).await
}

/// [`search_user_errors`] with an injected clock reading.
pub async fn search_user_errors_at(
    ctx: &ErrorContext<'_>,
    user_id: &str,
    timeframe_minutes: i64,
    start_time: Option<&str>,
    limit: i64,
    now: DateTime<Utc>,
) -> BugsnagResult<UserErrorSummary> {
    let tracker = ctx.tracker()?;
    let timeframe = timeframe_minutes.clamp(1, MAX_TIMEFRAME_MINUTES);
    let window = TimeWindow::resolve(now, start_time, timeframe);
    let (since, before) = window.to_zulu();
    let filters = ErrorFilters::for_user(user_id).between(since, before);

    let found = primitives::search_errors(tracker, None, &filters, limit).await?;
    let records: Vec<ErrorRecord> = found.errors.iter().map(ErrorRecord::from_value).collect();

    let mut severity_breakdown = BTreeMap::new();
    let mut status_breakdown = BTreeMap::new();
    for record in &records {
        let severity = record.severity.clone().unwrap_or_else(|| "unknown".into());
        let status = record.status.clone().unwrap_or_else(|| "unknown".into());
        *severity_breakdown.entry(severity).or_insert(0) += 1;
        *status_breakdown.entry(status).or_insert(0) += 1;
    }

    let total = records.len();
    Ok(UserErrorSummary {
        user_id: user_id.to_string(),
        search_period: window.to_json(),
        total_errors: total,
        severity_breakdown,
        status_breakdown,
        has_critical_errors: records.iter().any(ErrorRecord::is_critical),
        has_recent_errors: total > 0,
        errors: records.into_iter().take(DETAILED_ERRORS).collect(),
        all_errors_count: total,
        project_summaries: found.project_summaries,
    })
}

// ── get_error_context ─────────────────────────────────────────

pub const CONTEXT_EVENTS: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContextReport {
    pub error_id: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_events: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_summary: Option<Value>,
    /// Set when details loaded but the event listing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_error: Option<String>,
}

pub async fn get_error_context(
    ctx: &ErrorContext<'_>,
    error_id: &str,
    include_events: bool,
) -> BugsnagResult<ErrorContextReport> {
    let tracker = ctx.tracker()?;
    let details = primitives::error_details(tracker, error_id).await?;
    let mut report = ErrorContextReport {
        error_id: error_id.trim().to_string(),
        details,
        recent_events: None,
        events_summary: None,
        events_error: None,
    };
    if !include_events {
        return Ok(report);
    }

    match primitives::error_events(tracker, error_id, CONTEXT_EVENTS).await {
        Ok(events) => {
            report.events_summary = Some(json!({
                "total_events": events.len(),
                "latest_event": events.first().and_then(|e| e.get("received_at")).cloned(),
            }));
            report.recent_events = Some(events);
        }
        Err(e) => {
            tracing::warn!(error_id, error = %e, "error events unavailable");
            report.events_error = Some(e.to_string());
        }
    }
    Ok(report)
}
