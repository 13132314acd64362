//! Append-only drift log.
//!
//! Sinks are called once per query that the arbitrator flags. `FileDriftLog`
//! opens the file for every record and does no locking of its own: callers
//! that append from several threads must serialize access to the sink.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use logq_protocol::DriftRecord;

use crate::error::{ParserError, ParserResult};

/// Destination for drift records.
pub trait DriftSink: Send + Sync {
    fn append(&self, record: &DriftRecord) -> ParserResult<()>;
}

impl<S: DriftSink + ?Sized> DriftSink for Arc<S> {
    fn append(&self, record: &DriftRecord) -> ParserResult<()> {
        (**self).append(record)
    }
}

/// JSON-lines file sink.
#[derive(Debug, Clone)]
pub struct FileDriftLog {
    path: PathBuf,
}

impl FileDriftLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DriftSink for FileDriftLog {
    fn append(&self, record: &DriftRecord) -> ParserResult<()> {
        let shown = self.path.display();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ParserError::Drift(format!("{shown}: {e}")))?;
        }

        let mut line = serde_json::to_string(record).map_err(|e| ParserError::Drift(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ParserError::Drift(format!("{shown}: {e}")))?;
        file.write_all(line.as_bytes())
            .map_err(|e| ParserError::Drift(format!("{shown}: {e}")))?;

        tracing::debug!(path = %shown, id = %record.id, reasons = %record.reason_summary(), "drift recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logq_protocol::{DriftReason, SlotName};

    fn record(text: &str) -> DriftRecord {
        DriftRecord::new(text, vec![DriftReason::Unresolved(SlotName::Source)])
    }

    #[test]
    fn appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("drift.jsonl");
        let log = FileDriftLog::new(&path);

        log.append(&record("first")).unwrap();
        log.append(&record("second")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: DriftRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.text, "first");
        assert_eq!(first.reasons, vec![DriftReason::Unresolved(SlotName::Source)]);
        let second: DriftRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.text, "second");
    }

    #[test]
    fn unwritable_path_is_a_drift_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let log = FileDriftLog::new(dir.path());
        let err = log.append(&record("x")).unwrap_err();
        assert!(matches!(err, ParserError::Drift(_)));
    }
}
