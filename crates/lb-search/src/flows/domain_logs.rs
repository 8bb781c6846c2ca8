//! Registry-driven application log flows: filtered search, active entity
//! listing, and the combined issue investigation.

use serde::Serialize;
use serde_json::{Value, json};

use lb_config::{ConfigError, IndexConfig, normalize};
use lb_protocol::{
    AppLog, EXACT_MATCH_SUFFIX, MatchOperator, SortOrder, all_of, any_of, bucket_keys,
    match_text, sort_by, term, terms, time_range,
};

use crate::error::SearchResult;
use crate::primitives;
use crate::request::{AggregationRequest, SearchRequest};
use crate::types::SearchContext;
use crate::validation::{validate_size, validate_timeframe};

pub const APP_LOGS: &str = "app_logs";

/// Optional filters for [`search_domain_logs`].
#[derive(Debug, Clone, Default)]
pub struct DomainLogQuery {
    pub pod: Option<String>,
    pub service: Option<String>,
    pub level: Option<String>,
    pub message_contains: Option<String>,
    pub timeframe_minutes: Option<i64>,
    pub limit: Option<i64>,
    pub environment: Option<String>,
}

/// Normalized entries plus what was dropped on the way.
#[derive(Debug, Clone, Serialize)]
pub struct DomainLogs {
    pub environment: String,
    pub index_pattern: String,
    pub timeframe_minutes: i64,
    pub total: u64,
    pub entries: Vec<AppLog>,
    /// Hits that could not be parsed into an [`AppLog`].
    pub skipped: usize,
    /// Requested filters whose logical field this environment does not map.
    pub unsupported_filters: Vec<String>,
}

/// Search application logs with optional pod/service/level/message filters.
///
/// A filter whose logical field has no physical mapping is omitted (and
/// reported in `unsupported_filters`); hits that fail to parse are skipped
/// with a warning.
pub async fn search_domain_logs(
    ctx: &SearchContext<'_>,
    params: &DomainLogQuery,
) -> SearchResult<DomainLogs> {
    let env = ctx.environment_name(params.environment.as_deref());
    let index = ctx.registry.get_index_config(env, APP_LOGS, None)?;
    let timeframe = validate_timeframe(
        params.timeframe_minutes.unwrap_or(ctx.default_timeframe()),
        ctx.max_timeframe(),
    );
    let limit = validate_size(
        params.limit.unwrap_or(i64::from(index.default_size)),
        i64::from(index.max_size),
    );

    let ts_field = index.field("timestamp").unwrap_or("@timestamp");
    let mut must = vec![time_range(ts_field, None, None, Some(timeframe))];
    let mut unsupported = Vec::new();

    if let Some(pod) = params.pod.as_deref()
        && let Some(field) = mapped(&index, "pod", env, &mut unsupported)
    {
        must.push(any_of(vec![term(field, pod, true), term(field, pod, false)]));
    }
    if let Some(service) = params.service.as_deref()
        && let Some(field) = mapped(&index, "service", env, &mut unsupported)
    {
        must.push(term(field, service, true));
    }
    if let Some(level) = params.level.as_deref()
        && let Some(field) = mapped(&index, "level", env, &mut unsupported)
    {
        let variants = normalize(ctx.registry, env, APP_LOGS, level);
        must.push(terms(field, variants, true));
    }
    if let Some(text) = params.message_contains.as_deref()
        && let Some(field) = mapped(&index, "message", env, &mut unsupported)
    {
        must.push(match_text(field, text, MatchOperator::Or, None));
    }

    let request = SearchRequest::new(&index.pattern, all_of(must))
        .size(limit as i64)
        .sort(vec![sort_by(ts_field, SortOrder::Desc)]);
    let response = primitives::search(ctx.transport, &request).await?;

    let mut skipped = 0;
    let entries = response
        .hits
        .iter()
        .filter_map(|hit| match AppLog::from_hit(hit) {
            Ok(log) => Some(log),
            Err(e) => {
                tracing::warn!(error = %e, id = ?hit.get("_id"), "skipping unparseable log entry");
                skipped += 1;
                None
            }
        })
        .collect();

    Ok(DomainLogs {
        environment: env.to_string(),
        index_pattern: index.pattern.clone(),
        timeframe_minutes: timeframe,
        total: response.total,
        entries,
        skipped,
        unsupported_filters: unsupported,
    })
}

/// Physical path of a requested filter field, recording it as unsupported
/// when this environment has no mapping.
fn mapped<'a>(
    index: &'a IndexConfig,
    logical: &str,
    env: &str,
    unsupported: &mut Vec<String>,
) -> Option<&'a str> {
    let field = index.field(logical);
    if field.is_none() {
        tracing::warn!(environment = %env, field = logical, "filter not mapped, omitting");
        unsupported.push(logical.to_string());
    }
    field
}

/// Distinct values of a logical field (default `pod`) seen in the window,
/// in bucket order.
pub async fn list_active_entities(
    ctx: &SearchContext<'_>,
    logical_field: &str,
    timeframe_minutes: Option<i64>,
    environment: Option<&str>,
) -> SearchResult<Vec<String>> {
    let env = ctx.environment_name(environment);
    let index = ctx.registry.get_index_config(env, APP_LOGS, None)?;
    let timeframe = validate_timeframe(
        timeframe_minutes.unwrap_or(ctx.default_timeframe()),
        ctx.max_timeframe(),
    );

    let field = index
        .field(logical_field)
        .ok_or_else(|| ConfigError::UnmappedField {
            environment: env.to_string(),
            index_type: APP_LOGS.to_string(),
            field: logical_field.to_string(),
        })?;
    let ts_field = index.field("timestamp").unwrap_or("@timestamp");

    let aggs = json!({
        "entities": {
            "terms": { "field": format!("{field}{EXACT_MATCH_SUFFIX}"), "size": 1000 }
        }
    });
    let request =
        AggregationRequest::new(&index.pattern, time_range(ts_field, None, None, Some(timeframe)), aggs);
    let response = primitives::aggregate(ctx.transport, &request).await?;

    Ok(response
        .get("entities")
        .map(bucket_keys)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|k| match k {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

// ── Investigation ─────────────────────────────────────────────

const INVESTIGATION_LIMIT: i64 = 50;
const TOP_N: usize = 10;

/// Combined error / warning / slow-request sweep.
#[derive(Debug, Clone, Serialize)]
pub struct IssueReport {
    pub summary: String,
    pub environment: String,
    pub timeframe_minutes: i64,
    pub error_count: usize,
    pub warning_count: usize,
    pub slow_request_count: usize,
    pub top_errors: Vec<Value>,
    pub top_warnings: Vec<Value>,
    pub top_slow_requests: Vec<Value>,
    pub recommendations: Vec<String>,
    pub partial: bool,
    pub failed_branches: Vec<String>,
}

/// Run three independent domain searches (ERROR, WARNING, message "slow").
/// A failing branch counts as empty and marks the report partial.
pub async fn investigate_issues(
    ctx: &SearchContext<'_>,
    service: Option<&str>,
    timeframe_minutes: Option<i64>,
    environment: Option<&str>,
) -> SearchResult<IssueReport> {
    let env = ctx.environment_name(environment).to_string();
    // Unknown environments fail the whole call, not three branches.
    ctx.registry.get_index_config(&env, APP_LOGS, None)?;
    let timeframe = validate_timeframe(
        timeframe_minutes.unwrap_or(ctx.default_timeframe()),
        ctx.max_timeframe(),
    );

    let base = DomainLogQuery {
        service: service.map(String::from),
        timeframe_minutes: Some(timeframe),
        limit: Some(INVESTIGATION_LIMIT),
        environment: Some(env.clone()),
        ..Default::default()
    };
    let errors_q = DomainLogQuery {
        level: Some("ERROR".into()),
        ..base.clone()
    };
    let warnings_q = DomainLogQuery {
        level: Some("WARNING".into()),
        ..base.clone()
    };
    let slow_q = DomainLogQuery {
        message_contains: Some("slow".into()),
        ..base
    };

    let (errors, warnings, slow) = tokio::join!(
        search_domain_logs(ctx, &errors_q),
        search_domain_logs(ctx, &warnings_q),
        search_domain_logs(ctx, &slow_q),
    );

    let mut failed_branches = Vec::new();
    let mut branch = |name: &str, result: SearchResult<DomainLogs>| -> Vec<AppLog> {
        match result {
            Ok(logs) => logs.entries,
            Err(e) => {
                tracing::warn!(branch = name, error = %e, "investigation branch failed");
                failed_branches.push(name.to_string());
                Vec::new()
            }
        }
    };
    let errors = branch("errors", errors);
    let warnings = branch("warnings", warnings);
    let slow = branch("slow_requests", slow);

    let top = |logs: &[AppLog]| -> Vec<Value> {
        logs.iter().take(TOP_N).map(AppLog::to_summary).collect()
    };

    let mut recommendations = Vec::new();
    if errors.len() > 20 {
        recommendations.push("High error rate detected - investigate error patterns".to_string());
    }
    if slow.len() > 10 {
        recommendations
            .push("Performance degradation detected - check resource usage".to_string());
    }
    for name in &failed_branches {
        recommendations.push(format!("Partial result: the {name} search failed"));
    }

    Ok(IssueReport {
        summary: format!(
            "Issue investigation for {}",
            service.unwrap_or("all services")
        ),
        environment: env,
        timeframe_minutes: timeframe,
        error_count: errors.len(),
        warning_count: warnings.len(),
        slow_request_count: slow.len(),
        top_errors: top(&errors),
        top_warnings: top(&warnings),
        top_slow_requests: top(&slow),
        recommendations,
        partial: !failed_branches.is_empty(),
        failed_branches,
    })
}
