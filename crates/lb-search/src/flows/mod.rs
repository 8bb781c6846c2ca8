//! Multi-step operations built on the primitives and the index registry.

pub mod domain_logs;
pub mod user_activity;

pub use domain_logs::{
    APP_LOGS, DomainLogQuery, DomainLogs, IssueReport, investigate_issues, list_active_entities,
    search_domain_logs,
};
pub use user_activity::{
    ActivitySummary, UserActivity, UserActivityQuery, fetch_user_activity, fetch_user_activity_at,
};
