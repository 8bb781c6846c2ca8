//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthReport {
    /// "healthy" or "degraded".
    pub status: &'static str,
    pub elasticsearch: bool,
    pub bugsnag: bool,
    pub bugsnag_configured: bool,
    pub environment: String,
    pub version: &'static str,
}

/// Probe both backends. Bugsnag only counts against health when configured.
pub async fn check(state: &AppState) -> HealthReport {
    let (elasticsearch, bugsnag) = tokio::join!(
        lb_search::primitives::ping(state.transport.as_ref()),
        async {
            match &state.tracker {
                Some(tracker) => lb_bugsnag::primitives::ping(tracker.as_ref()).await,
                None => false,
            }
        }
    );
    let bugsnag_configured = state.bugsnag.is_configured();
    let healthy = elasticsearch && (bugsnag || !bugsnag_configured);

    HealthReport {
        status: if healthy { "healthy" } else { "degraded" },
        elasticsearch,
        bugsnag,
        bugsnag_configured,
        environment: state.environment.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let report = check(&state).await;
    if report.status != "healthy" {
        tracing::warn!(
            elasticsearch = report.elasticsearch,
            bugsnag = report.bugsnag,
            "health degraded"
        );
    }
    Json(report)
}
