//! Time windows for the "what happened to X" flows.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::domain::parse_timestamp;
use crate::query::format_timestamp;

/// A closed `[start, end]` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// `[now - minutes, now]`. Bounds saturate at the representable range.
    pub fn trailing(now: DateTime<Utc>, minutes: i64) -> Self {
        let start = TimeDelta::try_minutes(minutes)
            .and_then(|d| now.checked_sub_signed(d))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    /// `[start, start + minutes]` when `start_time` parses as RFC 3339,
    /// otherwise the trailing window ending at `now`.
    pub fn resolve(now: DateTime<Utc>, start_time: Option<&str>, minutes: i64) -> Self {
        match start_time.map(parse_timestamp) {
            Some(Ok(start)) => Self {
                start,
                end: TimeDelta::try_minutes(minutes)
                    .and_then(|d| start.checked_add_signed(d))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
            _ => Self::trailing(now, minutes),
        }
    }

    /// `{start, end}` with explicit offsets.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "start": format_timestamp(&self.start),
            "end": format_timestamp(&self.end),
        })
    }

    /// Second-precision Zulu timestamps (`%Y-%m-%dT%H:%M:%SZ`).
    pub fn to_zulu(&self) -> (String, String) {
        let fmt = "%Y-%m-%dT%H:%M:%SZ";
        (
            self.start.format(fmt).to_string(),
            self.end.format(fmt).to_string(),
        )
    }
}
