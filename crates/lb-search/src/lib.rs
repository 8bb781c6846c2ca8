//! Elasticsearch access for logbridge.
//!
//! A [`SearchTransport`] seam (reqwest-backed [`ElasticClient`] in
//! production, [`MockTransport`] in tests), request validation and clamping,
//! the search/aggregation primitives, the registry-driven flows, and the
//! search tools that expose them.

pub mod elastic;
pub mod error;
pub mod flows;
pub mod mock;
pub mod primitives;
pub mod request;
pub mod tools;
pub mod transport;
pub mod types;
pub mod validation;

pub use elastic::ElasticClient;
pub use error::{SearchError, SearchResult};
pub use mock::MockTransport;
pub use request::{AggregationRequest, SearchRequest, SourceFilter, TrackTotalHits};
pub use transport::SearchTransport;
pub use types::{SearchContext, SearchTool};
