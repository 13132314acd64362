//! logq hybrid parser: natural-language log requests to SPL queries.
//!
//! Two extraction tiers (ordered regex rules and per-slot TF-IDF/softmax
//! classifiers) are reconciled by a confidence threshold, normalized through
//! synonym tables, optionally clarified, and rendered as an SPL query.
//! Queries the tiers cannot settle are appended to a drift log.

pub mod arbiter;
pub mod clarifier;
pub mod config;
pub mod corpus;
pub mod drift;
pub mod error;
pub mod eval;
pub mod extractor;
pub mod mock;
pub mod normalizer;
pub mod pipeline;
pub mod rules;
pub mod stat;
pub mod synth;
pub mod vocab;

// Re-export key types for convenience
pub use arbiter::{Arbitration, Arbitrator};
pub use clarifier::{Clarification, ClarifyState, Prompter, Reply, StdioPrompter};
pub use config::{DriftConfig, ParserConfig};
pub use drift::{DriftSink, FileDriftLog};
pub use error::{ParserError, ParserResult};
pub use extractor::SlotExtractor;
pub use mock::{MockDriftLog, ScriptedPrompter};
pub use normalizer::Normalizer;
pub use pipeline::{HybridParser, Mode, ParsedQuery, Resolution};
pub use rules::RuleExtractor;
pub use stat::{StatConfig, StatExtractor};
pub use synth::{QuerySynthesizer, QueryTemplates};
pub use vocab::{SynonymTables, VocabularyTables};
