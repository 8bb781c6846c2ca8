//! Error-tracking tool implementations.

mod error_context;
mod error_events;
mod list_projects;
mod search_errors;
mod user_errors;

pub use error_context::GetErrorContext;
pub use error_events::ErrorEvents;
pub use list_projects::ListProjects;
pub use search_errors::SearchErrors;
pub use user_errors::{FetchUserErrors, SearchUserErrors};

use serde::Serialize;

use crate::context::ErrorTool;
use crate::error::{BugsnagError, BugsnagResult};

pub(crate) fn to_data<T: Serialize>(value: &T) -> BugsnagResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| BugsnagError::Backend(format!("failed to encode result: {e}")))
}

/// Every error-tracking tool, in listing order.
pub fn all_tools() -> Vec<Box<dyn ErrorTool>> {
    vec![
        Box::new(ListProjects),
        Box::new(SearchErrors),
        Box::new(ErrorEvents),
        Box::new(FetchUserErrors),
        Box::new(SearchUserErrors),
        Box::new(GetErrorContext),
    ]
}
