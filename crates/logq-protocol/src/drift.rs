use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slots::SlotName;

/// Why a query was recorded as drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "slot", rename_all = "snake_case")]
pub enum DriftReason {
    /// A monitored slot ended up as the wildcard.
    Unresolved(SlotName),
    /// No slot was decided by a statistical reading at or above threshold.
    LowConfidence,
}

impl std::fmt::Display for DriftReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unresolved(slot) => write!(f, "unresolved:{slot}"),
            Self::LowConfidence => f.write_str("low_confidence"),
        }
    }
}

/// Append-only audit entry for a query that extraction could not settle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftRecord {
    /// Unique record ID (UUIDv7 for time-sortability).
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Never empty.
    pub reasons: Vec<DriftReason>,
    /// Raw query text exactly as received.
    pub text: String,
}

impl DriftRecord {
    pub fn new(text: impl Into<String>, reasons: Vec<DriftReason>) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            reasons,
            text: text.into(),
        }
    }

    /// Slots named by `Unresolved` reasons.
    pub fn unresolved_slots(&self) -> Vec<SlotName> {
        self.reasons
            .iter()
            .filter_map(|r| match r {
                DriftReason::Unresolved(slot) => Some(*slot),
                DriftReason::LowConfidence => None,
            })
            .collect()
    }

    pub fn is_low_confidence(&self) -> bool {
        self.reasons.contains(&DriftReason::LowConfidence)
    }

    /// Reasons joined for log lines, e.g. `unresolved:source,low_confidence`.
    pub fn reason_summary(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}
