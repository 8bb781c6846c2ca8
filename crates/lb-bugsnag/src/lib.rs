//! Bugsnag error tracking for logbridge.
//!
//! [`ErrorTracker`] is the transport seam: [`BugsnagClient`] talks to the
//! Data Access API, [`MockErrorTracker`] answers from memory in tests.
//! Primitives wrap single calls, flows combine them per user, and the
//! [`ErrorTool`] implementations expose both to the tool host.

pub mod blocking;
pub mod client;
pub mod context;
pub mod error;
pub mod filters;
pub mod flows;
pub mod mock;
pub mod primitives;
pub mod tools;
pub mod tracker;
pub mod types;

pub use blocking::BlockingErrorTracker;
pub use client::BugsnagClient;
pub use context::{ErrorContext, ErrorTool};
pub use error::{BugsnagError, BugsnagResult};
pub use filters::ErrorFilters;
pub use flows::{
    UserErrors, UserErrorsQuery, fetch_user_errors, get_error_context, search_user_errors,
};
pub use mock::MockErrorTracker;
pub use tracker::ErrorTracker;
pub use types::{ErrorRecord, ErrorSearch, ProjectRef};
