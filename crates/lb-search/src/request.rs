//! Search and aggregation request builders.

use serde_json::{Map, Value, json};

use lb_protocol::Query;

/// `_source` filtering. Everything is returned unless told otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SourceFilter {
    #[default]
    All,
    /// `false`: return no source at all.
    Disabled,
    /// Only these fields.
    Fields(Vec<String>),
    /// Full includes/excludes object, passed through.
    Object(Value),
}

impl SourceFilter {
    fn to_value(&self) -> Option<Value> {
        match self {
            Self::All => None,
            Self::Disabled => Some(Value::Bool(false)),
            Self::Fields(f) => Some(json!(f)),
            Self::Object(v) => Some(v.clone()),
        }
    }

    /// Read from a tool argument (`true`/`false`/list/object).
    pub fn from_arg(v: &Value) -> Self {
        match v {
            Value::Bool(false) => Self::Disabled,
            Value::Array(items) => Self::Fields(
                items
                    .iter()
                    .filter_map(|i| i.as_str().map(String::from))
                    .collect(),
            ),
            Value::Object(_) => Self::Object(v.clone()),
            _ => Self::All,
        }
    }
}

/// `track_total_hits`: exact by default, or off, or exact up to a cutoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackTotalHits {
    #[default]
    Exact,
    Disabled,
    UpTo(u64),
}

/// One search call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index_pattern: String,
    pub query: Query,
    pub size: i64,
    pub from: i64,
    pub sort: Option<Vec<Value>>,
    pub fields: Option<Vec<String>>,
    pub source: SourceFilter,
    pub highlight: Option<Value>,
    pub track_total_hits: TrackTotalHits,
    /// Keep-alive for a scroll cursor (e.g. `"1m"`). `None` = no cursor.
    pub scroll: Option<String>,
}

impl SearchRequest {
    pub fn new(index_pattern: impl Into<String>, query: impl Into<Query>) -> Self {
        Self {
            index_pattern: index_pattern.into(),
            query: query.into(),
            size: 100,
            from: 0,
            sort: None,
            fields: None,
            source: SourceFilter::All,
            highlight: None,
            track_total_hits: TrackTotalHits::Exact,
            scroll: None,
        }
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn offset(mut self, from: i64) -> Self {
        self.from = from;
        self
    }

    pub fn sort(mut self, sort: Vec<Value>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn source(mut self, source: SourceFilter) -> Self {
        self.source = source;
        self
    }

    pub fn highlight(mut self, highlight: Value) -> Self {
        self.highlight = Some(highlight);
        self
    }

    pub fn track_total_hits(mut self, track: TrackTotalHits) -> Self {
        self.track_total_hits = track;
        self
    }

    pub fn scroll(mut self, keep_alive: impl Into<String>) -> Self {
        self.scroll = Some(keep_alive.into());
        self
    }

    /// Render the request body. Optional keys appear only when they differ
    /// from the backend defaults. `size`/`from` are rendered as given;
    /// clamping is the primitive's job.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".into(), self.query.to_dsl());
        body.insert("size".into(), json!(self.size));
        body.insert("from".into(), json!(self.from));
        if let Some(sort) = self.sort.as_ref().filter(|s| !s.is_empty()) {
            body.insert("sort".into(), json!(sort));
        }
        if let Some(fields) = self.fields.as_ref().filter(|f| !f.is_empty()) {
            body.insert("fields".into(), json!(fields));
        }
        if let Some(source) = self.source.to_value() {
            body.insert("_source".into(), source);
        }
        if let Some(highlight) = &self.highlight {
            body.insert("highlight".into(), highlight.clone());
        }
        match self.track_total_hits {
            TrackTotalHits::Exact => {}
            TrackTotalHits::Disabled => {
                body.insert("track_total_hits".into(), Value::Bool(false));
            }
            TrackTotalHits::UpTo(n) => {
                body.insert("track_total_hits".into(), json!(n));
            }
        }
        Value::Object(body)
    }
}

/// One aggregation call. `size` defaults to 0 (buckets only, no documents).
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRequest {
    pub index_pattern: String,
    pub query: Query,
    pub aggregations: Value,
    pub size: i64,
}

impl AggregationRequest {
    pub fn new(index_pattern: impl Into<String>, query: impl Into<Query>, aggregations: Value) -> Self {
        Self {
            index_pattern: index_pattern.into(),
            query: query.into(),
            aggregations,
            size: 0,
        }
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn to_body(&self) -> Value {
        json!({
            "query": self.query.to_dsl(),
            "aggs": self.aggregations,
            "size": self.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lb_protocol::{SortOrder, sort_by};

    #[test]
    fn minimal_body() {
        let body = SearchRequest::new("logs-*", Query::MatchAll).to_body();
        assert_eq!(
            body,
            json!({ "query": { "match_all": {} }, "size": 100, "from": 0 })
        );
    }

    #[test]
    fn optional_keys_only_when_set() {
        let body = SearchRequest::new("logs-*", Query::MatchAll)
            .size(5)
            .sort(vec![sort_by("@timestamp", SortOrder::Desc)])
            .fields(vec!["message".into()])
            .source(SourceFilter::Disabled)
            .track_total_hits(TrackTotalHits::UpTo(10_000))
            .to_body();
        assert_eq!(body["sort"], json!([{ "@timestamp": { "order": "desc" } }]));
        assert_eq!(body["fields"], json!(["message"]));
        assert_eq!(body["_source"], json!(false));
        assert_eq!(body["track_total_hits"], json!(10_000));
        assert!(body.get("highlight").is_none());
    }

    #[test]
    fn source_filter_from_args() {
        assert_eq!(SourceFilter::from_arg(&json!(true)), SourceFilter::All);
        assert_eq!(SourceFilter::from_arg(&json!(false)), SourceFilter::Disabled);
        assert_eq!(
            SourceFilter::from_arg(&json!(["a", "b"])),
            SourceFilter::Fields(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn aggregation_body_defaults_to_zero_size() {
        let body = AggregationRequest::new("logs-*", Query::MatchAll, json!({ "x": {} })).to_body();
        assert_eq!(body["size"], 0);
        assert_eq!(body["aggs"], json!({ "x": {} }));
    }
}
