//! Training corpus loading and label validation.
//!
//! The corpus is a CSV file with a header row naming the text column
//! (`nl_query`, or the aliases `input` / `query`), the four slot columns and
//! an optional reference-query column. Structural problems are fatal; labels
//! outside the vocabulary are only reported.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use logq_protocol::{ParseResult, SlotMap, SlotName, SlotValue, TrainingExample};

use crate::error::{ParserError, ParserResult};
use crate::normalizer::Normalizer;
use crate::vocab::VocabularyTables;

const TEXT_COLUMNS: [&str; 3] = ["nl_query", "input", "query"];
const REFERENCE_COLUMNS: [&str; 2] = ["structured_query", "reference_query"];

/// Load and parse the corpus at `path`.
pub fn load_corpus(path: impl AsRef<Path>) -> ParserResult<Vec<TrainingExample>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ParserError::Io(format!("{}: {e}", path.display())))?;
    let examples = read_corpus(file)?;
    tracing::info!(path = %path.display(), examples = examples.len(), "training corpus loaded");
    Ok(examples)
}

/// Parse a corpus from any reader. Rows are numbered from 1 after the header.
pub fn read_corpus<R: Read>(reader: R) -> ParserResult<Vec<TrainingExample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| ParserError::Corpus {
            row: 0,
            message: e.to_string(),
        })?
        .clone();
    let columns = Columns::resolve(&headers)?;

    let mut examples = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|e| ParserError::Corpus {
            row,
            message: e.to_string(),
        })?;
        examples.push(columns.example(row, &record)?);
    }

    if examples.is_empty() {
        return Err(ParserError::EmptyCorpus);
    }
    Ok(examples)
}

/// Header positions of the columns we read.
struct Columns {
    text: usize,
    labels: SlotMap<usize>,
    reference: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> ParserResult<Self> {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |candidates: &[&str]| find_column(&names, candidates);

        let text = find(&TEXT_COLUMNS[..]).ok_or_else(|| ParserError::MissingColumn(TEXT_COLUMNS[0].into()))?;
        let mut labels = SlotMap::<usize>::default();
        for slot in SlotName::ALL {
            let index = find(&[slot.as_str()][..]).ok_or_else(|| ParserError::MissingColumn(slot.as_str().into()))?;
            labels.set(slot, index);
        }

        Ok(Self {
            text,
            labels,
            reference: find(&REFERENCE_COLUMNS[..]),
        })
    }

    fn example(&self, row: usize, record: &csv::StringRecord) -> ParserResult<TrainingExample> {
        let cell = |index: usize| record.get(index).unwrap_or("").trim();

        let text = cell(self.text);
        if text.is_empty() {
            return Err(ParserError::Corpus {
                row,
                message: "empty query text".into(),
            });
        }

        let mut labels = ParseResult::wildcard();
        for (slot, &index) in self.labels.iter() {
            let raw = cell(index);
            if raw.is_empty() {
                return Err(ParserError::Corpus {
                    row,
                    message: format!("empty {slot} label (use * for unspecified)"),
                });
            }
            labels.set(slot, SlotValue::new(raw));
        }

        let reference_query = self
            .reference
            .map(cell)
            .filter(|q| !q.is_empty())
            .map(String::from);

        Ok(TrainingExample {
            text: text.to_string(),
            labels,
            reference_query,
        })
    }
}

/// First candidate present in the header, in candidate order.
fn find_column(names: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|c| names.iter().position(|n| n == c))
}

// ── Label validation ─────────────────────────────────────────

/// A label that is not a canonical vocabulary value even after synonym
/// mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelIssue {
    pub row: usize,
    pub slot: SlotName,
    pub value: String,
}

impl std::fmt::Display for LabelIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {} label '{}' is not in the vocabulary", self.row, self.slot, self.value)
    }
}

/// Check every closed-vocabulary label. The user slot is open and skipped.
pub fn validate_labels(
    examples: &[TrainingExample],
    vocab: &VocabularyTables,
    normalizer: &Normalizer,
) -> Vec<LabelIssue> {
    let mut issues = Vec::new();
    for (i, example) in examples.iter().enumerate() {
        for slot in [SlotName::Action, SlotName::Time, SlotName::Source] {
            let normalized = normalizer.normalize_value(slot, example.label(slot));
            if let SlotValue::Value(v) = normalized {
                if !vocab.table(slot).is_canonical(&v) {
                    issues.push(LabelIssue {
                        row: i + 1,
                        slot,
                        value: example.label(slot).to_string(),
                    });
                }
            }
        }
    }
    issues
}
