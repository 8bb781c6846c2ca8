//! Typed views over Elasticsearch responses.
//!
//! Parsing is lenient: absent `took`/`timed_out`/`hits` default to zero
//! values. Only a body that is not a JSON object at all is rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `hits.total` as reported by the backend.
///
/// Older clusters send a bare integer; newer ones send `{value, relation}`
/// where `relation = "gte"` marks an approximate lower bound.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Tracked {
        value: u64,
        #[serde(default)]
        relation: Option<String>,
    },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(n) => *n,
            Self::Tracked { value, .. } => *value,
        }
    }
}

/// Normalize any `hits.total` shape to an integer. Unknown shapes count as 0.
pub fn normalize_total(raw: &Value) -> u64 {
    serde_json::from_value::<TotalHits>(raw.clone())
        .map(|t| t.value())
        .unwrap_or(0)
}

#[derive(Debug, Default, Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Option<Value>,
    #[serde(default)]
    hits: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    #[serde(default)]
    took: u64,
    #[serde(default)]
    timed_out: bool,
    #[serde(default)]
    hits: RawHits,
    #[serde(default)]
    aggregations: Option<Value>,
    #[serde(default, rename = "_scroll_id")]
    scroll_id: Option<String>,
}

// ── Search ────────────────────────────────────────────────────

/// Result of one search (or one continuation page).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Server-side execution time in milliseconds.
    pub took: u64,
    pub timed_out: bool,
    /// Total matching documents (possibly a lower bound).
    pub total: u64,
    /// Raw hit records in server order.
    pub hits: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Value>,
    /// Continuation handle, present only when scrolling was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
}

impl SearchResponse {
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        let raw: RawSearch = serde_json::from_value(body)?;
        Ok(Self {
            took: raw.took,
            timed_out: raw.timed_out,
            total: raw.hits.total.as_ref().map(normalize_total).unwrap_or(0),
            hits: raw.hits.hits,
            aggregations: raw.aggregations,
            scroll_id: raw.scroll_id,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

// ── Aggregation ───────────────────────────────────────────────

/// Result of an aggregation request. The tree mirrors the request shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationResponse {
    pub took: u64,
    pub timed_out: bool,
    /// Aggregation name → bucket list / metric value. Empty object when the
    /// backend omitted the key.
    pub aggregations: Value,
}

impl AggregationResponse {
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        let raw: RawSearch = serde_json::from_value(body)?;
        Ok(Self {
            took: raw.took,
            timed_out: raw.timed_out,
            aggregations: raw
                .aggregations
                .unwrap_or_else(|| Value::Object(Default::default())),
        })
    }

    /// Look up one named aggregation.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.aggregations.get(name)
    }
}

/// Bucket keys of a terms-style aggregation, in bucket order.
pub fn bucket_keys(aggregation: &Value) -> Vec<Value> {
    aggregation["buckets"]
        .as_array()
        .map(|buckets| {
            buckets
                .iter()
                .filter_map(|b| b.get("key").cloned())
                .collect()
        })
        .unwrap_or_default()
}

// ── Index stats ───────────────────────────────────────────────

/// Primary-shard statistics for one index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub docs_count: u64,
    pub docs_deleted: u64,
    pub store_size_bytes: u64,
    pub indexing_total: u64,
    pub indexing_time_ms: u64,
    pub search_total: u64,
    pub search_time_ms: u64,
    pub segments_count: u64,
}

impl IndexStats {
    /// Read from one entry of `indices` in an `_stats` response.
    pub fn from_index_entry(entry: &Value) -> Self {
        let p = &entry["primaries"];
        let n = |v: &Value| v.as_u64().unwrap_or(0);
        Self {
            docs_count: n(&p["docs"]["count"]),
            docs_deleted: n(&p["docs"]["deleted"]),
            store_size_bytes: n(&p["store"]["size_in_bytes"]),
            indexing_total: n(&p["indexing"]["index_total"]),
            indexing_time_ms: n(&p["indexing"]["index_time_in_millis"]),
            search_total: n(&p["search"]["query_total"]),
            search_time_ms: n(&p["search"]["query_time_in_millis"]),
            segments_count: n(&p["segments"]["count"]),
        }
    }
}

/// Parse a full `_stats` response into index name → stats.
pub fn parse_index_stats(body: &Value) -> BTreeMap<String, IndexStats> {
    body["indices"]
        .as_object()
        .map(|indices| {
            indices
                .iter()
                .map(|(name, entry)| (name.clone(), IndexStats::from_index_entry(entry)))
                .collect()
        })
        .unwrap_or_default()
}
