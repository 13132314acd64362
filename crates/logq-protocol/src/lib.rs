//! Shared types for logq (parser core, HTTP service and tests).

pub mod api;
pub mod drift;
pub mod slots;
pub mod training;

pub use api::*;
pub use drift::*;
pub use slots::*;
pub use training::*;
