//! Parser configuration, loadable from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the built-in tables and a 0.7 confidence threshold.

use serde::Deserialize;

use logq_protocol::SlotName;

use crate::error::{ParserError, ParserResult};
use crate::normalizer::Normalizer;
use crate::rules::RuleExtractor;
use crate::stat::StatConfig;
use crate::synth::QueryTemplates;
use crate::vocab::{SynonymTables, VocabularyTables};

/// Top-level configuration for the hybrid parser.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    /// Minimum statistical confidence for a reading to override the rules.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    /// Labeled CSV corpus used to fit the statistical tier.
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
    /// JSON-lines file receiving drift records.
    #[serde(default = "default_drift_log_path")]
    pub drift_log_path: String,
    #[serde(default)]
    pub drift: DriftConfig,
    #[serde(default)]
    pub stat: StatConfig,
    #[serde(default)]
    pub vocabulary: VocabularyTables,
    #[serde(default)]
    pub synonyms: SynonymTables,
    #[serde(default)]
    pub templates: QueryTemplates,
}

/// When a query is recorded as drift.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriftConfig {
    /// Slots whose wildcard outcome triggers a record.
    #[serde(default = "default_drift_slots")]
    pub slots: Vec<SlotName>,
    /// Also record queries where no slot was decided confidently.
    #[serde(default = "default_true")]
    pub on_low_confidence: bool,
}

fn default_confidence_threshold() -> f64 {
    0.7
}

fn default_corpus_path() -> String {
    "data/train_queries.csv".into()
}

fn default_drift_log_path() -> String {
    "logs/drift.jsonl".into()
}

fn default_drift_slots() -> Vec<SlotName> {
    vec![SlotName::Source]
}

fn default_true() -> bool {
    true
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            slots: default_drift_slots(),
            on_low_confidence: true,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            corpus_path: default_corpus_path(),
            drift_log_path: default_drift_log_path(),
            drift: DriftConfig::default(),
            stat: StatConfig::default(),
            vocabulary: VocabularyTables::default(),
            synonyms: SynonymTables::default(),
            templates: QueryTemplates::default(),
        }
    }
}

impl ParserConfig {
    /// Load and validate a TOML config file.
    pub fn from_file(path: &str) -> ParserResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ParserError::Io(format!("{path}: {e}")))?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path, threshold = config.confidence_threshold, "parser config loaded");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> ParserResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| ParserError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would fail at startup anyway.
    pub fn validate(&self) -> ParserResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ParserError::Config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        self.stat.validate()?;
        RuleExtractor::new(&self.vocabulary)?;
        Normalizer::new(&self.synonyms)?;
        Ok(())
    }
}
