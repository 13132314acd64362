//! logq HTTP service library crate.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `logq-e2e-tests`) can build the router around their own parser.

pub mod config;
pub mod drift;
pub mod error;
pub mod routes;
pub mod state;
