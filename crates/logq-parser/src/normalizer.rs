//! Canonicalization of extracted slot values via per-slot synonym tables.

use std::collections::{HashMap, HashSet};

use logq_protocol::{ParseResult, SlotMap, SlotName, SlotValue, WILDCARD};

use crate::error::{ParserError, ParserResult};
use crate::vocab::SynonymTables;

/// Resolved synonym lookup. Keys are trimmed and lowercased, targets are
/// final (following a target's own synonym never changes it).
#[derive(Debug, Clone)]
pub struct Normalizer {
    tables: SlotMap<HashMap<String, String>>,
}

fn key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl Normalizer {
    /// Resolve synonym chains. Cycles and wildcard targets are configuration
    /// errors.
    pub fn new(synonyms: &SynonymTables) -> ParserResult<Self> {
        let mut tables = SlotMap::<HashMap<String, String>>::default();
        for slot in SlotName::ALL {
            tables.set(slot, resolve_table(slot, synonyms)?);
        }
        Ok(Self { tables })
    }

    /// Canonical form of one value. Unknown values pass through verbatim.
    pub fn normalize_value(&self, slot: SlotName, value: &SlotValue) -> SlotValue {
        match value {
            SlotValue::Wildcard => SlotValue::Wildcard,
            SlotValue::Value(v) => match self.tables.get(slot).get(&key(v)) {
                Some(canonical) => SlotValue::Value(canonical.clone()),
                None => value.clone(),
            },
        }
    }

    pub fn normalize(&self, result: &ParseResult) -> ParseResult {
        result.map(|slot, value| self.normalize_value(slot, value))
    }
}

fn resolve_table(slot: SlotName, synonyms: &SynonymTables) -> ParserResult<HashMap<String, String>> {
    let raw: HashMap<String, String> = synonyms
        .table(slot)
        .iter()
        .map(|(k, v)| (key(k), v.trim().to_string()))
        .collect();

    let mut resolved = HashMap::with_capacity(raw.len());
    for (from, to) in &raw {
        if to.is_empty() || to == WILDCARD {
            return Err(ParserError::Config(format!(
                "{slot} synonym '{from}' maps to the wildcard"
            )));
        }

        let mut target = to.clone();
        let mut seen = HashSet::from([from.clone()]);
        while let Some(next) = raw.get(&key(&target)) {
            if *next == target {
                break;
            }
            if !seen.insert(key(&target)) {
                return Err(ParserError::Config(format!(
                    "{slot} synonyms form a cycle through '{from}'"
                )));
            }
            target = next.clone();
        }
        resolved.insert(from.clone(), target);
    }
    Ok(resolved)
}
