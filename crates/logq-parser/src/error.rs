//! Parser error types.
//!
//! Per-query slot resolution never fails; these cover startup
//! (corpus, configuration) and the interactive clarifier.

use thiserror::Error;

use logq_protocol::SlotName;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("corpus is missing required column '{0}'")]
    MissingColumn(String),

    #[error("corpus error on row {row}: {message}")]
    Corpus { row: usize, message: String },

    #[error("corpus contains no examples")]
    EmptyCorpus,

    #[error("invalid {slot} rule #{index} ({pattern}): {message}")]
    Pattern {
        slot: SlotName,
        index: usize,
        pattern: String,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("clarification aborted while {0} was pending")]
    Aborted(SlotName),

    #[error("drift log error: {0}")]
    Drift(String),
}

/// Convenience alias for parser results.
pub type ParserResult<T> = Result<T, ParserError>;
