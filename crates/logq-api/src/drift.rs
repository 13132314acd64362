//! Serialized drift sink for concurrent request handlers.

use std::sync::Mutex;

use logq_parser::{DriftSink, ParserError, ParserResult};
use logq_protocol::DriftRecord;

/// Wraps a sink so appends from concurrent requests never interleave.
pub struct SerializedDriftLog<S> {
    inner: Mutex<S>,
}

impl<S: DriftSink> SerializedDriftLog<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl<S: DriftSink> DriftSink for SerializedDriftLog<S> {
    fn append(&self, record: &DriftRecord) -> ParserResult<()> {
        let sink = self
            .inner
            .lock()
            .map_err(|_| ParserError::Drift("drift log lock poisoned".into()))?;
        sink.append(record)
    }
}
