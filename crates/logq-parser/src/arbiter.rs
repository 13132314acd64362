//! Confidence-based arbitration between the rule and statistical tiers.
//!
//! Per slot, a concrete statistical reading at or above the threshold is
//! authoritative; otherwise the rule reading stands. A statistical wildcard
//! never displaces a rule value. One threshold applies to every slot.

use logq_protocol::{Authority, DriftReason, DriftRecord, ParseResult, SlotMap, SlotName, SlotReadings};

use crate::config::DriftConfig;
use crate::error::{ParserError, ParserResult};

/// Outcome of merging the two tiers for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Arbitration {
    pub result: ParseResult,
    pub authority: SlotMap<Authority>,
    /// Present when the query should be recorded as drift.
    pub drift: Option<DriftRecord>,
}

/// Pure per-slot merge. Returns the merged values and which tier decided
/// each slot.
pub fn merge(rule: &ParseResult, stat: &SlotReadings, threshold: f64) -> (ParseResult, SlotMap<Authority>) {
    let authority = stat.map(|_, reading| match reading.confidence {
        Some(c) if c >= threshold && !reading.value.is_wildcard() => Authority::Statistical,
        _ => Authority::Rule,
    });
    let result = SlotMap::from_fn(|slot| match authority.get(slot) {
        Authority::Statistical => stat.get(slot).value.clone(),
        _ => rule.get(slot).clone(),
    });
    (result, authority)
}

/// Merges tier outputs and decides whether a query counts as drift.
#[derive(Debug, Clone)]
pub struct Arbitrator {
    threshold: f64,
    drift_slots: Vec<SlotName>,
    drift_on_low_confidence: bool,
}

impl Arbitrator {
    pub fn new(threshold: f64, drift: &DriftConfig) -> ParserResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ParserError::Config(format!(
                "confidence_threshold must be within [0, 1], got {threshold}"
            )));
        }
        let mut drift_slots = drift.slots.clone();
        drift_slots.sort();
        drift_slots.dedup();
        Ok(Self {
            threshold,
            drift_slots,
            drift_on_low_confidence: drift.on_low_confidence,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Merge both tiers for `text`. Does not write anything.
    pub fn arbitrate(&self, text: &str, rule: &ParseResult, stat: &SlotReadings) -> Arbitration {
        let (result, authority) = merge(rule, stat, self.threshold);

        for (slot, auth) in authority.iter() {
            tracing::debug!(
                slot = %slot,
                authority = ?auth,
                rule = %rule.get(slot),
                stat = %stat.get(slot).value,
                confidence = stat.get(slot).confidence.unwrap_or(0.0),
                "slot arbitrated"
            );
        }

        let drift = self.drift_reasons(&result, &authority);
        let drift = (!drift.is_empty()).then(|| DriftRecord::new(text, drift));

        Arbitration {
            result,
            authority,
            drift,
        }
    }

    fn drift_reasons(&self, result: &ParseResult, authority: &SlotMap<Authority>) -> Vec<DriftReason> {
        let mut reasons: Vec<DriftReason> = self
            .drift_slots
            .iter()
            .filter(|slot| result.get(**slot).is_wildcard())
            .map(|slot| DriftReason::Unresolved(*slot))
            .collect();

        let confident = authority.iter().any(|(_, a)| *a == Authority::Statistical);
        if self.drift_on_low_confidence && !confident {
            reasons.push(DriftReason::LowConfidence);
        }
        reasons
    }
}
