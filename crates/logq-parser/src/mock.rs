//! In-memory test doubles for the drift sink and the clarifier prompter.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use logq_protocol::{DriftRecord, SlotName};

use crate::clarifier::{InvalidChoice, Prompter, Reply};
use crate::drift::DriftSink;
use crate::error::{ParserError, ParserResult};

/// Drift sink that keeps records in memory.
#[derive(Debug, Default)]
pub struct MockDriftLog {
    records: Mutex<Vec<DriftRecord>>,
    failing: bool,
}

impl MockDriftLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every append fails.
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DriftRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn records(&self) -> Vec<DriftRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl DriftSink for MockDriftLog {
    fn append(&self, record: &DriftRecord) -> ParserResult<()> {
        if self.failing {
            return Err(ParserError::Drift("mock sink rejects writes".into()));
        }
        self.lock().push(record.clone());
        Ok(())
    }
}

/// Prompter that replays a fixed script of replies.
///
/// `None` entries (and running out of script) abort the clarification.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    replies: VecDeque<Option<Reply>>,
    asked: Vec<SlotName>,
    rejections: usize,
}

impl ScriptedPrompter {
    pub fn new(replies: impl IntoIterator<Item = Option<Reply>>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            asked: Vec::new(),
            rejections: 0,
        }
    }

    /// Slots asked about, in order (repeats included).
    pub fn asked(&self) -> Vec<SlotName> {
        self.asked.clone()
    }

    pub fn rejections(&self) -> usize {
        self.rejections
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, slot: SlotName, _choices: &[String]) -> Option<Reply> {
        self.asked.push(slot);
        self.replies.pop_front().flatten()
    }

    fn rejected(&mut self, _err: &InvalidChoice) {
        self.rejections += 1;
    }
}
