//! "Everything that happened to user X" over application logs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lb_config::normalize;
use lb_protocol::{
    ActivityRecord, Query, SortOrder, TimeWindow, TermValue, all_of, any_of, greater_than,
    sort_by, term, terms, time_range,
};

use crate::error::SearchResult;
use crate::flows::domain_logs::APP_LOGS;
use crate::primitives;
use crate::request::SearchRequest;
use crate::types::SearchContext;
use crate::validation::clamp;

pub const MAX_ACTIVITY_TIMEFRAME: i64 = 1440;
pub const MIN_SLOW_THRESHOLD: f64 = 0.1;

/// Parameters of [`fetch_user_activity`].
#[derive(Debug, Clone)]
pub struct UserActivityQuery {
    pub user_id: String,
    pub timeframe_minutes: i64,
    pub slow_threshold_seconds: f64,
    pub limit: i64,
    pub start_time: Option<String>,
    pub environment: Option<String>,
}

impl UserActivityQuery {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            timeframe_minutes: 60,
            slow_threshold_seconds: 2.0,
            limit: 100,
            start_time: None,
            environment: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
    pub user_id: String,
    pub environment: String,
    pub timeframe_minutes: i64,
    pub search_period: serde_json::Value,
    pub total_errors: usize,
    pub total_slow_requests: usize,
    pub has_recent_activity: bool,
    pub slow_request_threshold: f64,
    pub max_results_per_type: i64,
    pub insights: Vec<String>,
    pub partial: bool,
    pub failed_branches: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserActivity {
    pub summary: ActivitySummary,
    pub error_logs: Vec<ActivityRecord>,
    pub slow_requests: Vec<ActivityRecord>,
    pub most_recent_log: Option<ActivityRecord>,
}

/// Physical fields the flow filters on, resolved once per call.
struct ActivityFields<'a> {
    timestamp: &'a str,
    level: &'a str,
    user_id: &'a str,
    mobile_user_id: &'a str,
    request_time: &'a str,
}

impl<'a> ActivityFields<'a> {
    fn resolve(ctx: &SearchContext<'a>, env: &str) -> Self {
        let registry = ctx.registry;
        let field = |logical: &str, fallback: &'static str| {
            registry.field_or(env, APP_LOGS, logical, fallback)
        };
        Self {
            timestamp: field("timestamp", "@timestamp"),
            level: field("level", "json.levelname"),
            user_id: field("user_id", "json.user_id"),
            mobile_user_id: field("mobile_user_id", "json.mobile_user_id"),
            request_time: field("request_time", "json.extra.request_time"),
        }
    }
}

/// The user may be recorded under a numeric mobile id or a string web id;
/// either one matching is enough.
fn identity_filter(fields: &ActivityFields<'_>, user_id: &str) -> Query {
    let mut either = Vec::with_capacity(2);
    if let Ok(numeric) = user_id.parse::<i64>() {
        either.push(term(fields.mobile_user_id, TermValue::Integer(numeric), false));
    }
    either.push(term(fields.user_id, user_id, true));
    any_of(either)
}

/// Three independent searches: errors in the window, slow requests in the
/// window, and the single most recent entry regardless of window. A failed
/// branch reads as empty and is reported in `failed_branches`.
pub async fn fetch_user_activity(
    ctx: &SearchContext<'_>,
    params: &UserActivityQuery,
) -> SearchResult<UserActivity> {
    fetch_user_activity_at(ctx, params, Utc::now()).await
}

/// [`fetch_user_activity`] with an injected clock reading.
pub async fn fetch_user_activity_at(
    ctx: &SearchContext<'_>,
    params: &UserActivityQuery,
    now: DateTime<Utc>,
) -> SearchResult<UserActivity> {
    let env = ctx.environment_name(params.environment.as_deref());
    let index = ctx.registry.get_index_config(env, APP_LOGS, None)?;

    let timeframe = clamp(params.timeframe_minutes, 1, MAX_ACTIVITY_TIMEFRAME);
    let limit = clamp(params.limit, 1, ctx.max_results());
    let threshold = params.slow_threshold_seconds.max(MIN_SLOW_THRESHOLD);
    let window = TimeWindow::resolve(now, params.start_time.as_deref(), timeframe);

    let fields = ActivityFields::resolve(ctx, env);
    let identity = identity_filter(&fields, &params.user_id);
    let in_window = time_range(fields.timestamp, Some(window.start), Some(window.end), None);
    let error_levels = normalize(ctx.registry, env, APP_LOGS, "ERROR");

    let errors_req = SearchRequest::new(
        &index.pattern,
        all_of(vec![
            identity.clone(),
            in_window.clone(),
            terms(fields.level, error_levels, true),
        ]),
    )
    .size(limit)
    .sort(vec![sort_by(fields.timestamp, SortOrder::Desc)]);

    let slow_req = SearchRequest::new(
        &index.pattern,
        all_of(vec![
            identity.clone(),
            in_window,
            greater_than(fields.request_time, threshold),
        ]),
    )
    .size(limit)
    .sort(vec![sort_by(fields.request_time, SortOrder::Desc)]);

    let recent_req = SearchRequest::new(&index.pattern, identity)
        .size(1)
        .sort(vec![sort_by(fields.timestamp, SortOrder::Desc)]);

    let (errors, slow, recent) = tokio::join!(
        primitives::search(ctx.transport, &errors_req),
        primitives::search(ctx.transport, &slow_req),
        primitives::search(ctx.transport, &recent_req),
    );

    let mut failed_branches = Vec::new();
    let mut records = |name: &str, result: SearchResult<lb_protocol::SearchResponse>| {
        match result {
            Ok(resp) => resp.hits.iter().map(ActivityRecord::from_hit).collect::<Vec<_>>(),
            Err(e) => {
                tracing::warn!(user_id = %params.user_id, branch = name, error = %e, "user activity branch failed");
                failed_branches.push(name.to_string());
                Vec::new()
            }
        }
    };
    let error_logs = records("error_logs", errors);
    let slow_requests = records("slow_requests", slow);
    let most_recent_log = records("most_recent_log", recent).into_iter().next();

    let insights = insights(
        &error_logs,
        &slow_requests,
        most_recent_log.as_ref(),
        &failed_branches,
    );

    tracing::info!(
        user_id = %params.user_id,
        environment = %env,
        errors = error_logs.len(),
        slow_requests = slow_requests.len(),
        partial = !failed_branches.is_empty(),
        "user activity fetched"
    );

    Ok(UserActivity {
        summary: ActivitySummary {
            user_id: params.user_id.clone(),
            environment: env.to_string(),
            timeframe_minutes: timeframe,
            search_period: window.to_json(),
            total_errors: error_logs.len(),
            total_slow_requests: slow_requests.len(),
            has_recent_activity: most_recent_log.is_some(),
            slow_request_threshold: threshold,
            max_results_per_type: limit,
            insights,
            partial: !failed_branches.is_empty(),
            failed_branches,
        },
        error_logs,
        slow_requests,
        most_recent_log,
    })
}

fn insights(
    errors: &[ActivityRecord],
    slow: &[ActivityRecord],
    recent: Option<&ActivityRecord>,
    failed_branches: &[String],
) -> Vec<String> {
    let mut out = Vec::new();
    match recent {
        None => out.push("No activity found for this user - verify user ID or field mapping".into()),
        Some(record) => {
            out.push(format!(
                "User found - last activity: {}",
                record.timestamp.as_deref().unwrap_or("unknown")
            ));
            if errors.is_empty() && slow.is_empty() {
                out.push("No errors or slow requests in the specified timeframe".into());
            }
        }
    }
    if errors.len() > 10 {
        out.push(format!(
            "High error count ({}) - user may be experiencing issues",
            errors.len()
        ));
    }
    if slow.len() > 5 {
        out.push(format!(
            "Multiple slow requests ({}) - performance issues detected",
            slow.len()
        ));
    }
    for branch in failed_branches {
        out.push(format!("Partial result: the {branch} search failed"));
    }
    out
}
