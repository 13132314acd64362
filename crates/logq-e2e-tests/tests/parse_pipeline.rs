//! E2E tests for the forced-mode pipeline over the bundled corpus.

mod helpers;

use logq_parser::synth::is_well_formed;
use logq_protocol::{Authority, DriftReason, ParseResult, SlotName};

use helpers::{SAMPLE_TEXTS, TestHarness};

/// The canonical example resolves every slot and renders every clause.
#[test]
fn e2e_failed_logins_from_auth_by_alice() {
    let h = TestHarness::new();
    let text = "show failed logins from yesterday from auth by user alice";
    let out = h.parser.parse_forced(text);

    assert_eq!(out.slots.action.as_str(), "failure");
    assert_eq!(out.slots.time.as_str(), "last24h");
    assert_eq!(out.slots.user.as_str(), "alice");
    assert_eq!(out.slots.source.as_str(), "auth");

    assert!(out.query.contains(r#""failed password""#), "{}", out.query);
    assert!(out.query.contains("earliest=-24h latest=now"));
    assert!(out.query.contains(r#"user="alice""#));
    assert!(out.query.contains("sourcetype=linux_secure"));
    assert!(out.query.starts_with("index=security"));
    assert!(is_well_formed(&out.query));

    // Source is resolved, so only a fully rule-decided parse drifts.
    let confident = h
        .parser
        .resolve(text)
        .authority
        .iter()
        .any(|(_, a)| *a == Authority::Statistical);
    assert_eq!(out.drift.is_some(), !confident);
    assert_eq!(h.drift.len(), usize::from(!confident));
    if let Some(record) = &out.drift {
        assert!(record.unresolved_slots().is_empty());
    }
}

/// Empty input in forced mode: all wildcard, bare index, one drift record.
#[test]
fn e2e_empty_input_forced() {
    let h = TestHarness::new();
    let out = h.parser.parse_forced("");

    assert_eq!(out.slots, ParseResult::wildcard());
    assert_eq!(out.query, "index=*");
    assert_eq!(h.drift.len(), 1);

    let record = &h.drift.records()[0];
    assert_eq!(record.text, "");
    assert!(record.reasons.contains(&DriftReason::Unresolved(SlotName::Source)));
    assert!(record.is_low_confidence());
}

/// Every input yields a well-formed query with all four slots present.
#[test]
fn e2e_forced_mode_is_total() {
    let h = TestHarness::new();
    for text in SAMPLE_TEXTS {
        let out = h.parser.parse_forced(text);
        assert!(is_well_formed(&out.query), "{text:?} -> {}", out.query);
        let json = serde_json::to_value(&out.slots).unwrap();
        for slot in SlotName::ALL {
            assert!(json[slot.as_str()].is_string(), "{text:?} lacks {slot}");
        }
    }
}

/// Hostile input text never breaks out of its quoted literal.
#[test]
fn e2e_hostile_text_stays_quoted() {
    let h = TestHarness::with_threshold(1.0);
    let out = h.parser.parse_forced(r#"logins for user x"y\z from auth"#);
    assert!(is_well_formed(&out.query), "{}", out.query);
}

/// Pipeline output is already normalized.
#[test]
fn e2e_normalization_is_idempotent() {
    let h = TestHarness::new();
    let normalizer = h.parser.normalizer();
    for text in SAMPLE_TEXTS {
        let resolution = h.parser.resolve(text);
        assert_eq!(normalizer.normalize(&resolution.normalized), resolution.normalized, "{text:?}");
        let twice = normalizer.normalize(&normalizer.normalize(&resolution.merged));
        assert_eq!(twice, resolution.normalized, "{text:?}");
    }
}

/// One record exactly when source is wildcard or nothing was decided
/// confidently; none otherwise.
#[test]
fn e2e_drift_completeness() {
    let h = TestHarness::new();
    for text in SAMPLE_TEXTS {
        let before = h.drift.len();
        let resolution = h.parser.resolve(text);
        let out = h.parser.parse_forced(text);

        let confident = resolution
            .authority
            .iter()
            .any(|(_, a)| *a == Authority::Statistical);
        let expected = resolution.merged.source.is_wildcard() || !confident;

        let written = h.drift.len() - before;
        assert_eq!(written, usize::from(expected), "{text:?}");
        assert_eq!(out.drift.is_some(), expected, "{text:?}");
    }
}

/// Raising the threshold only ever moves slots from statistical to rule.
#[test]
fn e2e_threshold_monotonicity() {
    let thresholds = [0.0, 0.3, 0.5, 0.7, 0.9, 1.0];
    let harnesses: Vec<_> = thresholds.iter().map(|t| TestHarness::with_threshold(*t)).collect();

    for text in SAMPLE_TEXTS {
        let authorities: Vec<_> = harnesses
            .iter()
            .map(|h| h.parser.resolve(text).authority)
            .collect();
        for pair in authorities.windows(2) {
            for slot in SlotName::ALL {
                if *pair[0].get(slot) == Authority::Rule {
                    assert_eq!(*pair[1].get(slot), Authority::Rule, "{text:?} {slot}");
                }
            }
        }
    }

    // At 1.0 nothing short of certainty wins, so every slot is rule-decided.
    let strict = harnesses.last().unwrap();
    let out = strict.parser.parse_forced("show failed logins from yesterday from auth by user alice");
    assert!(out.authority.iter().all(|(_, a)| *a == Authority::Rule));
}

/// Resolution is pure: repeated calls agree and write nothing.
#[test]
fn e2e_resolution_is_deterministic() {
    let h = TestHarness::new();
    for text in SAMPLE_TEXTS {
        let a = h.parser.resolve(text);
        let b = h.parser.resolve(text);
        assert_eq!(a.normalized, b.normalized);
        assert_eq!(a.stat, b.stat);
        assert_eq!(a.authority, b.authority);
    }
    assert!(h.drift.is_empty());
}
