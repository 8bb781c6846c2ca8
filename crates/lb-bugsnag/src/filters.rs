//! Error search filters and their query-string encoding.
//!
//! Bugsnag takes filters as one JSON-encoded `filters` parameter:
//! `{"user.id":[{"eq":"41343"}],"since":[{"eq":"..."}],"before":[{"eq":"..."}]}`.
//! `since`/`before` are sent with the `eq` operator and treated as inclusive.

use serde_json::{Map, Value, json};

/// Hard cap on `per_page` accepted by the API.
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorFilters {
    pub user_id: Option<String>,
    /// Lower time bound, `%Y-%m-%dT%H:%M:%SZ`.
    pub since: Option<String>,
    /// Upper time bound, `%Y-%m-%dT%H:%M:%SZ`.
    pub before: Option<String>,
}

impl ErrorFilters {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn between(mut self, since: impl Into<String>, before: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self.before = Some(before.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.since.is_none() && self.before.is_none()
    }

    /// The `filters` object, or `None` when no filter is set.
    pub fn to_json(&self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }
        let mut filters = Map::new();
        for (key, value) in [
            ("user.id", &self.user_id),
            ("since", &self.since),
            ("before", &self.before),
        ] {
            if let Some(v) = value {
                filters.insert(key.to_string(), json!([{ "eq": v }]));
            }
        }
        Some(Value::Object(filters))
    }

    /// Full query string for a project error listing: paging, newest first,
    /// then the encoded filters.
    pub fn to_query(&self, per_page: i64) -> Vec<(String, String)> {
        let mut query = vec![
            ("per_page".to_string(), per_page.clamp(1, MAX_PER_PAGE).to_string()),
            ("sort".to_string(), "last_seen".to_string()),
            ("direction".to_string(), "desc".to_string()),
        ];
        if let Some(filters) = self.to_json() {
            query.push(("filters".to_string(), filters.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_no_param() {
        let q = ErrorFilters::default().to_query(50);
        assert_eq!(q.len(), 3);
        assert_eq!(q[0], ("per_page".into(), "50".into()));
        assert!(q.iter().all(|(k, _)| k != "filters"));
    }

    #[test]
    fn user_and_window_encoded_as_json() {
        let f = ErrorFilters::for_user("41343").between("2024-01-15T00:00:00Z", "2024-01-16T00:00:00Z");
        let q = f.to_query(25);
        let (_, encoded) = q.iter().find(|(k, _)| k == "filters").unwrap();
        let decoded: Value = serde_json::from_str(encoded).unwrap();
        assert_eq!(
            decoded,
            json!({
                "user.id": [{ "eq": "41343" }],
                "since": [{ "eq": "2024-01-15T00:00:00Z" }],
                "before": [{ "eq": "2024-01-16T00:00:00Z" }]
            })
        );
    }

    #[test]
    fn per_page_capped() {
        assert_eq!(ErrorFilters::default().to_query(500)[0].1, "100");
        assert_eq!(ErrorFilters::default().to_query(0)[0].1, "1");
    }
}
