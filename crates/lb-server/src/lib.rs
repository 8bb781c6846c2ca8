//! logbridge tool host, library crate.
//!
//! Re-exports the modules so the binary (`main.rs`) and `lb-e2e-tests` can
//! build the router and state directly.

pub mod config;
pub mod error;
pub mod registry;
pub mod routes;
pub mod state;
