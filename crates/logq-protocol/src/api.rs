use serde::{Deserialize, Serialize};

use crate::slots::{Authority, ParseResult, SlotMap};

/// Request body for `POST /parse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseRequest {
    /// Natural-language query text.
    pub query: String,
}

/// Response body for `POST /parse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResponse {
    /// Echo of the input text.
    pub query: String,
    /// Final slot values after normalization.
    pub slots: ParseResult,
    /// Which extractor decided each slot.
    pub authority: SlotMap<Authority>,
    /// Synthesized SPL query.
    pub spl: String,
    /// Whether a drift record was written for this query. False when the
    /// query drifted but the append failed.
    pub drift_logged: bool,
}
