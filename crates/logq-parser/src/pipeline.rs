//! The hybrid parser: rule and statistical extraction, arbitration,
//! normalization, clarification and synthesis wired into one pipeline.
//!
//! `HybridParser` holds no mutable state and is shared freely across
//! threads; the only side effect of a parse is the drift append, which goes
//! through the configured [`DriftSink`].

use logq_protocol::{Authority, DriftRecord, ParseResult, SlotMap, SlotReadings, TrainingExample};

use crate::arbiter::Arbitrator;
use crate::clarifier::{clarify_interactive, Clarification, Clarified, Prompter};
use crate::config::ParserConfig;
use crate::corpus::{load_corpus, validate_labels};
use crate::drift::{DriftSink, FileDriftLog};
use crate::error::ParserResult;
use crate::extractor::SlotExtractor;
use crate::normalizer::Normalizer;
use crate::rules::RuleExtractor;
use crate::stat::StatExtractor;
use crate::synth::QuerySynthesizer;
use crate::vocab::VocabularyTables;

/// How unresolved slots are handled for one parse.
pub enum Mode<'a> {
    /// Unresolved slots stay wildcard. Never blocks.
    Forced,
    /// Ask `prompter` about every unresolved slot.
    Interactive(&'a mut dyn Prompter),
}

/// Every intermediate stage of resolving one text, without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub rule: ParseResult,
    pub stat: SlotReadings,
    /// Arbitrated values before normalization.
    pub merged: ParseResult,
    pub normalized: ParseResult,
    pub authority: SlotMap<Authority>,
    pub drift: Option<DriftRecord>,
}

/// Final output of a parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub slots: ParseResult,
    pub authority: SlotMap<Authority>,
    pub query: String,
    /// The drift record produced for this query, if any.
    pub drift: Option<DriftRecord>,
    /// The drift record reached the sink. False when there was no record or
    /// the append failed.
    pub drift_written: bool,
}

pub struct HybridParser {
    vocab: VocabularyTables,
    rules: RuleExtractor,
    stat: StatExtractor,
    arbiter: Arbitrator,
    normalizer: Normalizer,
    synth: QuerySynthesizer,
    drift: Box<dyn DriftSink>,
}

impl HybridParser {
    /// Build every stage and fit the statistical tier on `examples`.
    pub fn new(
        config: &ParserConfig,
        examples: &[TrainingExample],
        drift: Box<dyn DriftSink>,
    ) -> ParserResult<Self> {
        let rules = RuleExtractor::new(&config.vocabulary)?;
        let normalizer = Normalizer::new(&config.synonyms)?;
        let arbiter = Arbitrator::new(config.confidence_threshold, &config.drift)?;

        for issue in validate_labels(examples, &config.vocabulary, &normalizer) {
            tracing::warn!(row = issue.row, slot = %issue.slot, value = %issue.value, "corpus label outside vocabulary");
        }

        let stat = StatExtractor::fit(examples, &config.stat)?;

        tracing::info!(
            threshold = arbiter.threshold(),
            examples = stat.example_count(),
            features = stat.feature_count(),
            "hybrid parser ready"
        );

        Ok(Self {
            vocab: config.vocabulary.clone(),
            rules,
            stat,
            arbiter,
            normalizer,
            synth: QuerySynthesizer::new(config.templates.clone()),
            drift,
        })
    }

    /// Load the configured corpus and fit on it, writing drift to the sink
    /// `wrap` builds around the configured drift file.
    ///
    /// The loaded examples are returned alongside the parser.
    pub fn from_config(
        config: &ParserConfig,
        wrap: impl FnOnce(FileDriftLog) -> Box<dyn DriftSink>,
    ) -> ParserResult<(Self, Vec<TrainingExample>)> {
        let examples = load_corpus(&config.corpus_path)?;
        let sink = wrap(FileDriftLog::new(&config.drift_log_path));
        let parser = Self::new(config, &examples, sink)?;
        Ok((parser, examples))
    }

    pub fn vocabulary(&self) -> &VocabularyTables {
        &self.vocab
    }

    pub fn rules(&self) -> &RuleExtractor {
        &self.rules
    }

    pub fn stat(&self) -> &StatExtractor {
        &self.stat
    }

    /// The two extraction tiers, rule first.
    pub fn tiers(&self) -> [&dyn SlotExtractor; 2] {
        [&self.rules, &self.stat]
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn threshold(&self) -> f64 {
        self.arbiter.threshold()
    }

    /// Run extraction, arbitration and normalization. Writes nothing.
    pub fn resolve(&self, text: &str) -> Resolution {
        let rule = self.rules.extract_rule(text);
        let stat = self.stat.extract_stat(text);
        let arbitration = self.arbiter.arbitrate(text, &rule, &stat);
        let normalized = self.normalizer.normalize(&arbitration.result);
        Resolution {
            rule,
            stat,
            merged: arbitration.result,
            normalized,
            authority: arbitration.authority,
            drift: arbitration.drift,
        }
    }

    pub fn synthesize(&self, result: &ParseResult) -> String {
        self.synth.to_query(result)
    }

    /// Parse `text` into a query.
    ///
    /// Fails only when an interactive caller aborts clarification; no query
    /// is produced in that case.
    pub fn parse(&self, text: &str, mode: Mode<'_>) -> ParserResult<ParsedQuery> {
        let resolution = self.resolve(text);
        let drift_written = self.record_drift(resolution.drift.as_ref());

        let Clarified { result, clarified } = match mode {
            Mode::Forced => Clarification::new(resolution.normalized, &self.vocab).force(),
            Mode::Interactive(prompter) => clarify_interactive(resolution.normalized, &self.vocab, prompter)?,
        };

        let mut authority = resolution.authority;
        for slot in clarified {
            authority.set(slot, Authority::Clarified);
        }

        let query = self.synth.to_query(&result);
        tracing::debug!(query = %query, drift = resolution.drift.is_some(), "query synthesized");

        Ok(ParsedQuery {
            slots: result,
            authority,
            query,
            drift: resolution.drift,
            drift_written,
        })
    }

    /// Forced-mode parse. Never fails.
    pub fn parse_forced(&self, text: &str) -> ParsedQuery {
        let resolution = self.resolve(text);
        let drift_written = self.record_drift(resolution.drift.as_ref());
        let slots = Clarification::new(resolution.normalized, &self.vocab).force().result;
        let query = self.synth.to_query(&slots);
        ParsedQuery {
            slots,
            authority: resolution.authority,
            query,
            drift: resolution.drift,
            drift_written,
        }
    }

    /// Append `record` to the sink. Returns whether it was written.
    fn record_drift(&self, record: Option<&DriftRecord>) -> bool {
        let Some(record) = record else {
            return false;
        };
        match self.drift.append(record) {
            Ok(()) => {
                tracing::info!(id = %record.id, reasons = %record.reason_summary(), "query recorded as drift");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, id = %record.id, "failed to write drift record");
                false
            }
        }
    }
}
