//! Rule-based slot extraction from ordered regex tables, first match wins.
//!
//! Deterministic and total: any text (including empty) yields a reading for
//! every slot, falling back to the wildcard when nothing matches.

use regex::Regex;

use logq_protocol::{ParseResult, SlotMap, SlotName, SlotReadings, SlotResult, SlotValue};

use crate::error::{ParserError, ParserResult};
use crate::extractor::SlotExtractor;
use crate::vocab::{SlotTable, VocabularyTables};

/// One compiled rule.
struct CompiledRule {
    regex: Regex,
    template: String,
}

/// Compiled rules and stop-words for one slot.
struct CompiledTable {
    rules: Vec<CompiledRule>,
    stopwords: Vec<String>,
}

impl CompiledTable {
    fn compile(slot: SlotName, table: &SlotTable) -> ParserResult<Self> {
        let rules = table
            .rules
            .iter()
            .enumerate()
            .map(|(index, r)| {
                Regex::new(&r.pattern)
                    .map(|regex| CompiledRule {
                        regex,
                        template: r.value.clone(),
                    })
                    .map_err(|e| ParserError::Pattern {
                        slot,
                        index,
                        pattern: r.pattern.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<ParserResult<Vec<_>>>()?;
        Ok(Self {
            rules,
            stopwords: table.stopwords.iter().map(|s| s.to_lowercase()).collect(),
        })
    }

    /// First rule (in table order) that yields an acceptable value.
    fn first_match(&self, text: &str) -> SlotValue {
        for rule in &self.rules {
            for caps in rule.regex.captures_iter(text) {
                let mut value = String::new();
                caps.expand(&rule.template, &mut value);
                let value = value.trim();
                if value.is_empty() || self.stopwords.iter().any(|s| s == value) {
                    continue;
                }
                return SlotValue::new(value);
            }
        }
        SlotValue::Wildcard
    }
}

/// Pattern-matching extractor over the vocabulary tables.
pub struct RuleExtractor {
    tables: SlotMap<CompiledTable>,
}

impl RuleExtractor {
    /// Compile every slot table. Fails on the first invalid pattern.
    pub fn new(vocab: &VocabularyTables) -> ParserResult<Self> {
        Ok(Self {
            tables: SlotMap {
                action: CompiledTable::compile(SlotName::Action, &vocab.action)?,
                time: CompiledTable::compile(SlotName::Time, &vocab.time)?,
                user: CompiledTable::compile(SlotName::User, &vocab.user)?,
                source: CompiledTable::compile(SlotName::Source, &vocab.source)?,
            },
        })
    }

    /// Extract all four slots from raw text.
    pub fn extract_rule(&self, text: &str) -> ParseResult {
        let lower = text.to_lowercase();
        self.tables.map(|slot, table| {
            let value = table.first_match(&lower);
            tracing::trace!(slot = %slot, value = %value, "rule reading");
            value
        })
    }
}

impl SlotExtractor for RuleExtractor {
    fn extract(&self, text: &str) -> SlotReadings {
        self.extract_rule(text).map(|_, v| SlotResult::rule(v.clone()))
    }

    fn tier_name(&self) -> &str {
        "rule"
    }
}
