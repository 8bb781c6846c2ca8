//! Configuration for logbridge.
//!
//! Everything here is built once at process start and then shared read-only:
//! the Elasticsearch environment, Bugsnag credentials, and the index registry
//! that maps logical field names to the physical paths of each environment.

pub mod bugsnag;
pub mod environment;
pub mod error;
pub mod normalizer;
pub mod registry;

mod builtin;

pub use bugsnag::{BugsnagConfig, BugsnagProject};
pub use environment::{Defaults, ElasticAuth, ElasticConfig, EnvironmentConfig, FeatureFlags};
pub use error::{ConfigError, ConfigResult};
pub use normalizer::normalize;
pub use registry::{FieldMap, IndexConfig, IndexRegistry, ValueMap};
