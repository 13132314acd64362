//! Accuracy report for the rule tier, the statistical tier and the hybrid
//! pipeline over a labeled example set.
//!
//! Evaluation goes through [`HybridParser::resolve`] and never writes drift.

use serde::Serialize;

use logq_protocol::{ParseResult, SlotMap, SlotName, TrainingExample};

use crate::extractor::SlotExtractor;
use crate::pipeline::HybridParser;

/// A mismatched example.
#[derive(Debug, Clone, Serialize)]
pub struct EvalFailure {
    pub text: String,
    pub expected: ParseResult,
    pub predicted: ParseResult,
}

/// Per-tier accuracy counts.
#[derive(Debug, Clone, Serialize)]
pub struct TierReport {
    pub tier: String,
    pub total: usize,
    pub slot_correct: SlotMap<usize>,
    pub exact_matches: usize,
    /// First mismatches, capped by the caller.
    pub failures: Vec<EvalFailure>,
}

impl TierReport {
    fn new(tier: &str) -> Self {
        Self {
            tier: tier.into(),
            total: 0,
            slot_correct: SlotMap::default(),
            exact_matches: 0,
            failures: Vec::new(),
        }
    }

    fn record(&mut self, example: &TrainingExample, expected: &ParseResult, predicted: ParseResult, max_failures: usize) {
        self.total += 1;
        for slot in SlotName::ALL {
            if expected.get(slot) == predicted.get(slot) {
                *self.slot_correct.get_mut(slot) += 1;
            }
        }
        if *expected == predicted {
            self.exact_matches += 1;
        } else if self.failures.len() < max_failures {
            self.failures.push(EvalFailure {
                text: example.text.clone(),
                expected: expected.clone(),
                predicted,
            });
        }
    }

    pub fn slot_accuracy(&self, slot: SlotName) -> f64 {
        ratio(*self.slot_correct.get(slot), self.total)
    }

    pub fn exact_accuracy(&self) -> f64 {
        ratio(self.exact_matches, self.total)
    }
}

/// Agreement between synthesized and reference queries.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReferenceReport {
    pub checked: usize,
    pub matched: usize,
}

impl ReferenceReport {
    pub fn accuracy(&self) -> f64 {
        ratio(self.matched, self.checked)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub rule: TierReport,
    pub statistical: TierReport,
    pub hybrid: TierReport,
    /// Present when at least one example carries a reference query.
    pub reference: Option<ReferenceReport>,
}

fn ratio(n: usize, d: usize) -> f64 {
    if d == 0 { 0.0 } else { n as f64 / d as f64 }
}

/// Evaluate both extraction tiers and the hybrid pipeline against
/// normalized ground truth.
pub fn evaluate(parser: &HybridParser, examples: &[TrainingExample], max_failures: usize) -> EvalReport {
    let normalizer = parser.normalizer();
    let tiers = parser.tiers();
    let mut tier_reports = tiers.map(|tier| TierReport::new(tier.tier_name()));
    let mut hybrid = TierReport::new("hybrid");
    let mut reference = ReferenceReport::default();

    for example in examples {
        let expected = normalizer.normalize(&example.labels);
        for (tier, report) in tiers.iter().zip(tier_reports.iter_mut()) {
            let predicted = normalizer.normalize(&tier.extract(&example.text).values());
            report.record(example, &expected, predicted, max_failures);
        }

        let resolution = parser.resolve(&example.text);
        if let Some(reference_query) = &example.reference_query {
            reference.checked += 1;
            if parser.synthesize(&resolution.normalized) == reference_query.trim() {
                reference.matched += 1;
            }
        }
        hybrid.record(example, &expected, resolution.normalized, max_failures);
    }

    let [rule, statistical] = tier_reports;
    let report = EvalReport {
        rule,
        statistical,
        hybrid,
        reference: (reference.checked > 0).then_some(reference),
    };
    for tier in [&report.rule, &report.statistical, &report.hybrid] {
        tracing::info!(
            tier = %tier.tier,
            total = tier.total,
            exact = tier.exact_accuracy(),
            action = tier.slot_accuracy(SlotName::Action),
            time = tier.slot_accuracy(SlotName::Time),
            user = tier.slot_accuracy(SlotName::User),
            source = tier.slot_accuracy(SlotName::Source),
            "evaluation"
        );
    }
    report
}
