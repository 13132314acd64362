//! E2E tests for the bundled corpus, the example config, evaluation and the
//! file drift log.

mod helpers;

use logq_parser::corpus::validate_labels;
use logq_parser::eval::evaluate;
use logq_parser::{FileDriftLog, HybridParser, Normalizer, ParserConfig};
use logq_protocol::{DriftReason, DriftRecord, SlotName};

use helpers::{CONFIG_PATH, CORPUS, TestHarness};

#[test]
fn e2e_bundled_corpus_shape() {
    assert_eq!(CORPUS.len(), 360);
    assert_eq!(CORPUS.iter().filter(|e| e.reference_query.is_some()).count(), 90);
    assert!(CORPUS.iter().all(|e| !e.text.trim().is_empty()));

    let first = &CORPUS[0];
    assert_eq!(first.text, "show failed logins from yesterday from auth by user alice");
    assert_eq!(first.label(SlotName::Source).as_str(), "auth");
}

#[test]
fn e2e_bundled_labels_are_canonical() {
    let config = ParserConfig::default();
    let normalizer = Normalizer::new(&config.synonyms).unwrap();
    let issues = validate_labels(&CORPUS, &config.vocabulary, &normalizer);
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn e2e_example_config_loads() {
    let config = ParserConfig::from_file(CONFIG_PATH).unwrap();
    assert_eq!(config.confidence_threshold, 0.7);
    assert_eq!(config.drift.slots, vec![SlotName::Source]);
    assert!(config.drift.on_low_confidence);
    assert_eq!(config.stat.ngram_max, 2);
    assert_eq!(config.corpus_path, "data/train_queries.csv");
}

#[test]
fn e2e_evaluation_over_bundled_corpus() {
    let h = TestHarness::new();
    let report = evaluate(&h.parser, &CORPUS, 5);

    for tier in [&report.rule, &report.statistical, &report.hybrid] {
        assert_eq!(tier.total, 360, "{}", tier.tier);
        assert!(tier.failures.len() <= 5);
        assert!(tier.exact_matches <= tier.total);
    }

    // Training-set fit of the classifiers.
    assert!(report.statistical.slot_accuracy(SlotName::Action) > 0.8);
    assert!(report.statistical.slot_accuracy(SlotName::Source) > 0.8);
    assert!(report.hybrid.slot_accuracy(SlotName::Action) > 0.8);

    let reference = report.reference.expect("corpus carries reference queries");
    assert_eq!(reference.checked, 90);
    assert!(reference.matched <= reference.checked);

    // Evaluation never touches the drift log.
    assert!(h.drift.is_empty());
}

#[test]
fn e2e_file_drift_log_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("drift.jsonl");
    let parser = HybridParser::new(
        &ParserConfig::default(),
        &CORPUS,
        Box::new(FileDriftLog::new(&path)),
    )
    .unwrap();

    parser.parse_forced("");
    parser.parse_forced("qqq zzz");

    let contents = std::fs::read_to_string(&path).unwrap();
    let records: Vec<DriftRecord> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, "");
    assert_eq!(records[1].text, "qqq zzz");
    for record in &records {
        assert!(record.reasons.contains(&DriftReason::Unresolved(SlotName::Source)));
        assert!(record.is_low_confidence());
    }
    assert_ne!(records[0].id, records[1].id);
}

#[test]
fn e2e_drift_slots_are_configurable() {
    let mut config = ParserConfig::default();
    config.drift.slots = vec![SlotName::User, SlotName::Source];
    config.drift.on_low_confidence = false;
    let h = TestHarness::with_config(config);

    let out = h.parser.parse_forced("");
    let record = out.drift.expect("empty text drifts");
    assert_eq!(record.unresolved_slots(), vec![SlotName::User, SlotName::Source]);
    assert!(!record.is_low_confidence());
    assert_eq!(h.drift.len(), 1);
}
