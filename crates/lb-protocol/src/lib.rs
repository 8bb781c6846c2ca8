//! Shared types for logbridge.
//!
//! Everything here is pure data: Query-DSL fragments and the builder
//! functions that assemble them, typed views over backend responses, the
//! domain log records the tools hand back to callers, and the tool result
//! envelope. No I/O, no registry knowledge.

pub mod args;
pub mod domain;
pub mod query;
pub mod response;
pub mod tool;
pub mod window;

pub use args::ArgError;
pub use domain::*;
pub use query::*;
pub use response::*;
pub use tool::ToolResult;
pub use window::TimeWindow;
