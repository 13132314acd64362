//! Shared application state for the Axum server.

use std::sync::Arc;

use logq_parser::HybridParser;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Fitted parser. Used in forced mode only.
    pub parser: Arc<HybridParser>,
    /// Number of training examples the parser was fit on.
    pub corpus_size: usize,
}

impl AppState {
    pub fn new(parser: HybridParser, corpus_size: usize) -> Self {
        Self {
            parser: Arc::new(parser),
            corpus_size,
        }
    }
}
