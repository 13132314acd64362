use serde::{Deserialize, Serialize};

use crate::slots::{ParseResult, SlotName, SlotValue};

/// One labeled row of the training corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Natural-language query text.
    pub text: String,
    /// Ground-truth value for each slot.
    pub labels: ParseResult,
    /// Precomputed query string for regression checks, when the corpus has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_query: Option<String>,
}

impl TrainingExample {
    pub fn new(
        text: impl Into<String>,
        action: impl Into<SlotValue>,
        time: impl Into<SlotValue>,
        user: impl Into<SlotValue>,
        source: impl Into<SlotValue>,
    ) -> Self {
        Self {
            text: text.into(),
            labels: ParseResult {
                action: action.into(),
                time: time.into(),
                user: user.into(),
                source: source.into(),
            },
            reference_query: None,
        }
    }

    pub fn with_reference_query(mut self, query: impl Into<String>) -> Self {
        self.reference_query = Some(query.into());
        self
    }

    pub fn label(&self, slot: SlotName) -> &SlotValue {
        self.labels.get(slot)
    }
}
