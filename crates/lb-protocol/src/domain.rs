//! Domain log records built from raw search hits.
//!
//! These read fixed physical paths (`_source.json.*`), the document shape the
//! application log shippers produce. Registry-driven field names only affect
//! how queries are built, not how hits are read back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Failure to turn a raw hit into a domain record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("unknown log level '{0}'")]
    UnknownLevel(String),
}

// ── Log Level ─────────────────────────────────────────────────

/// Normalized log level.
///
/// Declaration order is severity order, so `Debug < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl FromStr for LogLevel {
    type Err = DomainError;

    /// Accepts the canonical names plus the short forms shippers emit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "D" | "DEBUG" => Ok(Self::Debug),
            "I" | "INFO" => Ok(Self::Info),
            "W" | "WARN" | "WARNING" => Ok(Self::Warning),
            "E" | "ERR" | "ERROR" => Ok(Self::Error),
            "C" | "CRIT" | "CRITICAL" | "FATAL" => Ok(Self::Critical),
            _ => Err(DomainError::UnknownLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Application Log ───────────────────────────────────────────

const APP_LOG_KNOWN_KEYS: &[&str] = &[
    "levelname",
    "message",
    "hostname",
    "service_name",
    "module",
    "trace_id",
    "request_id",
    "user_id",
    "environment",
];

/// One application log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppLog {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Pod / host that emitted the entry.
    pub pod: String,
    pub service: Option<String>,
    pub module: Option<String>,
    pub trace_id: Option<String>,
    pub request_id: Option<String>,
    pub user_id: Option<String>,
    pub environment: Option<String>,
    pub deployment: Option<String>,
    pub namespace: Option<String>,
    /// Remaining `json.*` keys not promoted to fields above.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl AppLog {
    /// Parse from a raw search hit. A missing level reads as INFO.
    pub fn from_hit(hit: &Value) -> Result<Self, DomainError> {
        let source = &hit["_source"];
        let json = &source["json"];

        let ts = source["@timestamp"]
            .as_str()
            .ok_or(DomainError::MissingField("@timestamp"))?;
        let timestamp = parse_timestamp(ts)?;

        let level = match json["levelname"].as_str() {
            Some(l) => l.parse()?,
            None => LogLevel::Info,
        };

        let extra = json
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter(|(k, _)| !APP_LOG_KNOWN_KEYS.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            timestamp,
            level,
            message: str_field(json, "message").unwrap_or_default(),
            pod: str_field(json, "hostname").unwrap_or_default(),
            service: str_field(json, "service_name"),
            module: str_field(json, "module"),
            trace_id: str_field(json, "trace_id"),
            request_id: str_field(json, "request_id"),
            user_id: scalar_field(json, "user_id"),
            environment: str_field(json, "environment"),
            deployment: str_field(source, "ct_deployment"),
            namespace: str_field(source, "ct_feature"),
            extra,
        })
    }

    /// Caller-facing summary (drops `extra`).
    pub fn to_summary(&self) -> Value {
        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "level": self.level.as_str(),
            "message": self.message,
            "pod": self.pod,
            "service": self.service,
            "module": self.module,
            "trace_id": self.trace_id,
            "request_id": self.request_id,
            "environment": self.environment,
            "deployment": self.deployment,
            "namespace": self.namespace,
        })
    }
}

// ── Activity Record ───────────────────────────────────────────

/// Reformatted hit used by the user-activity flow. Lenient: every field
/// falls back to empty rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub timestamp: Option<String>,
    pub index: Option<String>,
    pub message: String,
    pub level: String,
    pub service: String,
    pub hostname: String,
    /// Web (string) or mobile (numeric) user id, whichever is present.
    pub user_id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<Value>,
}

impl ActivityRecord {
    pub fn from_hit(hit: &Value) -> Self {
        let source = &hit["_source"];
        let json = &source["json"];
        let extra = &json["extra"];

        let user_id = [&json["user_id"], &json["mobile_user_id"]]
            .into_iter()
            .find(|v| !v.is_null())
            .cloned()
            .unwrap_or(Value::Null);

        let request_time = extra["request_time"].as_f64();
        let (method, url, status_code) = if request_time.is_some() {
            (
                Some(str_field(extra, "method").unwrap_or_default()),
                Some(str_field(extra, "url").unwrap_or_default()),
                Some(extra.get("status_code").cloned().unwrap_or(Value::Null)),
            )
        } else {
            (None, None, None)
        };

        Self {
            timestamp: str_field(source, "@timestamp"),
            index: str_field(hit, "_index"),
            message: str_field(json, "message").unwrap_or_default(),
            level: str_field(json, "levelname").unwrap_or_default(),
            service: str_field(json, "service_name").unwrap_or_default(),
            hostname: str_field(json, "hostname").unwrap_or_default(),
            user_id,
            request_time,
            method,
            url,
            status_code,
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Parse an RFC 3339 timestamp (a trailing `Z` is accepted).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidTimestamp(s.to_string()))
}

fn str_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

/// Like `str_field` but also stringifies numbers (mobile ids are numeric).
fn scalar_field(obj: &Value, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
