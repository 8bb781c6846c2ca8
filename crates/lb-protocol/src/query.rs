//! Query-DSL fragments and the pure builder functions that assemble them.
//!
//! A [`Query`] is an immutable value describing one filter condition or a
//! boolean composition of other fragments. Builders never consult the field
//! registry: every function takes fully-resolved physical field names.
//! Rendering to the backend's JSON tree happens once, at the transport
//! boundary, through [`Query::to_dsl`] (or `Serialize`).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::window::TimeWindow;

/// Suffix of the non-analyzed sub-field used for exact comparisons.
pub const EXACT_MATCH_SUFFIX: &str = ".keyword";

// ── Fragment types ────────────────────────────────────────────

/// One Query-DSL fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Matches every document.
    MatchAll,
    /// Bounded comparison on a single field.
    Range(RangeQuery),
    /// Exact value comparison.
    Term { field: String, value: TermValue },
    /// Exact comparison against any of several values.
    Terms {
        field: String,
        values: Vec<TermValue>,
    },
    /// Analyzed full-text match.
    Match(MatchQuery),
    /// Boolean composition of nested fragments.
    Bool(BoolQuery),
    /// Caller-supplied DSL passed through verbatim.
    Raw(Value),
}

/// A scalar used in term/terms fragments.
#[derive(Debug, Clone, PartialEq)]
pub enum TermValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl TermValue {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Integer(i) => json!(i),
            Self::Float(f) => json!(f),
            Self::Bool(b) => Value::Bool(*b),
        }
    }
}

impl From<&str> for TermValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TermValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for TermValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i64> for TermValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for TermValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for TermValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for TermValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// One side of a range comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeBound {
    Time(DateTime<Utc>),
    Number(f64),
}

impl RangeBound {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Time(t) => Value::String(format_timestamp(t)),
            Self::Number(n) => json!(n),
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Time(t) => Some(*t),
            Self::Number(_) => None,
        }
    }
}

/// Range fragment. Absent bounds are open-ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub field: String,
    pub gte: Option<RangeBound>,
    pub lte: Option<RangeBound>,
    pub gt: Option<RangeBound>,
    pub lt: Option<RangeBound>,
}

impl RangeQuery {
    fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            gte: None,
            lte: None,
            gt: None,
            lt: None,
        }
    }
}

/// Whether all or any tokens of a match query must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOperator {
    #[default]
    Or,
    And,
}

impl MatchOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
        }
    }
}

/// Full-text match fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub field: String,
    pub query: String,
    pub operator: MatchOperator,
    pub fuzziness: Option<String>,
}

/// `minimum_should_match` accepts a count or an expression like `"75%"`.
#[derive(Debug, Clone, PartialEq)]
pub enum MinimumShouldMatch {
    Count(i64),
    Expr(String),
}

impl MinimumShouldMatch {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Count(n) => json!(n),
            Self::Expr(s) => Value::String(s.clone()),
        }
    }
}

/// Boolean composition. Empty clause lists are never rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<Query>,
    pub must_not: Vec<Query>,
    pub should: Vec<Query>,
    pub filter: Vec<Query>,
    pub minimum_should_match: Option<MinimumShouldMatch>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────

impl Query {
    /// Render this fragment as the backend's native JSON tree.
    pub fn to_dsl(&self) -> Value {
        match self {
            Self::MatchAll => json!({ "match_all": {} }),
            Self::Range(r) => {
                let mut bounds = Map::new();
                for (key, bound) in [("gte", &r.gte), ("lte", &r.lte), ("gt", &r.gt), ("lt", &r.lt)] {
                    if let Some(b) = bound {
                        bounds.insert(key.to_string(), b.to_value());
                    }
                }
                json!({ "range": { r.field.clone(): bounds } })
            }
            Self::Term { field, value } => json!({ "term": { field.clone(): value.to_value() } }),
            Self::Terms { field, values } => {
                let values: Vec<Value> = values.iter().map(TermValue::to_value).collect();
                json!({ "terms": { field.clone(): values } })
            }
            Self::Match(m) => {
                let mut body = Map::new();
                body.insert("query".into(), Value::String(m.query.clone()));
                body.insert("operator".into(), Value::String(m.operator.as_str().into()));
                if let Some(f) = &m.fuzziness {
                    body.insert("fuzziness".into(), Value::String(f.clone()));
                }
                json!({ "match": { m.field.clone(): body } })
            }
            Self::Bool(b) => {
                let mut body = Map::new();
                for (key, clause) in [
                    ("must", &b.must),
                    ("must_not", &b.must_not),
                    ("should", &b.should),
                    ("filter", &b.filter),
                ] {
                    if !clause.is_empty() {
                        let rendered: Vec<Value> = clause.iter().map(Query::to_dsl).collect();
                        body.insert(key.to_string(), Value::Array(rendered));
                    }
                }
                if let Some(msm) = &b.minimum_should_match {
                    body.insert("minimum_should_match".into(), msm.to_value());
                }
                json!({ "bool": body })
            }
            Self::Raw(v) => v.clone(),
        }
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dsl().serialize(serializer)
    }
}

impl From<Value> for Query {
    fn from(v: Value) -> Self {
        Self::Raw(v)
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::MatchAll
    }
}

/// ISO-8601 with an explicit UTC offset, e.g. `2024-01-15T10:30:00.000+00:00`.
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, false)
}

// ── Builders ──────────────────────────────────────────────────

/// Time range on `field`.
///
/// With `minutes_ago`, the window is `[now - minutes_ago, now]` and the
/// explicit bounds are ignored. Otherwise only the bounds that are present
/// are emitted.
pub fn time_range(
    field: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    minutes_ago: Option<i64>,
) -> Query {
    time_range_at(Utc::now(), field, start, end, minutes_ago)
}

/// [`time_range`] with an injected clock reading.
pub fn time_range_at(
    now: DateTime<Utc>,
    field: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    minutes_ago: Option<i64>,
) -> Query {
    let (start, end) = match minutes_ago {
        Some(minutes) => {
            let window = TimeWindow::trailing(now, minutes);
            (Some(window.start), Some(window.end))
        }
        None => (start, end),
    };
    let mut range = RangeQuery::new(field);
    range.gte = start.map(RangeBound::Time);
    range.lte = end.map(RangeBound::Time);
    Query::Range(range)
}

/// Strict numeric lower bound (`field > value`).
pub fn greater_than(field: &str, value: f64) -> Query {
    let mut range = RangeQuery::new(field);
    range.gt = Some(RangeBound::Number(value));
    Query::Range(range)
}

/// Exact term comparison. Textual values get the `.keyword` sub-field when
/// `use_exact_match` is set.
pub fn term(field: &str, value: impl Into<TermValue>, use_exact_match: bool) -> Query {
    let value = value.into();
    let field = if use_exact_match && value.is_text() {
        format!("{field}{EXACT_MATCH_SUFFIX}")
    } else {
        field.to_string()
    };
    Query::Term { field, value }
}

/// Exact comparison against any of `values`. A single value collapses into
/// a plain term fragment.
pub fn terms<I, V>(field: &str, values: I, use_exact_match: bool) -> Query
where
    I: IntoIterator<Item = V>,
    V: Into<TermValue>,
{
    let mut values: Vec<TermValue> = values.into_iter().map(Into::into).collect();
    if values.len() == 1 {
        return term(field, values.remove(0), use_exact_match);
    }
    let field = if use_exact_match && !values.is_empty() && values.iter().all(TermValue::is_text) {
        format!("{field}{EXACT_MATCH_SUFFIX}")
    } else {
        field.to_string()
    };
    Query::Terms { field, values }
}

/// Full-text match on `field`.
pub fn match_text(
    field: &str,
    value: &str,
    operator: MatchOperator,
    fuzziness: Option<&str>,
) -> Query {
    Query::Match(MatchQuery {
        field: field.to_string(),
        query: value.to_string(),
        operator,
        fuzziness: fuzziness.map(String::from),
    })
}

/// Nest clause lists under a bool fragment.
pub fn bool_compose(clauses: BoolQuery) -> Query {
    Query::Bool(clauses)
}

/// "At least one of" composition.
pub fn any_of(queries: Vec<Query>) -> Query {
    bool_compose(BoolQuery {
        should: queries,
        minimum_should_match: Some(MinimumShouldMatch::Count(1)),
        ..Default::default()
    })
}

/// "All of" composition.
pub fn all_of(queries: Vec<Query>) -> Query {
    bool_compose(BoolQuery {
        must: queries,
        ..Default::default()
    })
}

/// One sort clause, `{ field: { "order": "desc" } }`.
pub fn sort_by(field: &str, order: SortOrder) -> Value {
    json!({ field: { "order": order.as_str() } })
}
