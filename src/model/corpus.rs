//! Labeled training corpus loaded from CSV.
//!
//! The header row decides which columns are used: the first header
//! containing `text` (case-insensitive) holds the comment, the first header
//! containing `emotion` holds the label. Any other columns are ignored. Rows
//! with an empty or absent value in either column are dropped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::{MoodlensError, Result};

/// Header substring identifying the text column.
pub const TEXT_COLUMN_MARKER: &str = "text";

/// Header substring identifying the label column.
pub const LABEL_COLUMN_MARKER: &str = "emotion";

/// One training example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExample {
    /// Raw comment text, not yet normalized.
    pub text: String,
    /// Emotion label.
    pub label: String,
}

/// Positions of the detected columns in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    /// Index of the text column.
    pub text: usize,
    /// Index of the label column.
    pub label: usize,
}

/// Locate the text and label columns in a header row.
pub fn detect_columns(headers: &StringRecord) -> Result<ColumnSelection> {
    let find = |marker: &str| {
        headers
            .iter()
            .position(|h| h.to_lowercase().contains(marker))
    };

    let text = find(TEXT_COLUMN_MARKER).ok_or_else(|| {
        MoodlensError::corpus_load(format!(
            "no column header contains \"{TEXT_COLUMN_MARKER}\""
        ))
    })?;
    let label = find(LABEL_COLUMN_MARKER).ok_or_else(|| {
        MoodlensError::corpus_load(format!(
            "no column header contains \"{LABEL_COLUMN_MARKER}\""
        ))
    })?;

    Ok(ColumnSelection { text, label })
}

/// An in-memory labeled corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    examples: Vec<LabeledExample>,
    dropped_rows: usize,
}

impl Corpus {
    /// Build a corpus directly from examples.
    pub fn from_examples(examples: Vec<LabeledExample>) -> Self {
        Corpus {
            examples,
            dropped_rows: 0,
        }
    }

    /// Load a corpus from a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            MoodlensError::corpus_load(format!("cannot open {}: {e}", path.display()))
        })?;
        let corpus = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            rows = corpus.len(),
            dropped = corpus.dropped_rows(),
            "loaded training corpus"
        );
        Ok(corpus)
    }

    /// Load a corpus from any CSV byte source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| MoodlensError::corpus_load(format!("failed to read CSV headers: {e}")))?
            .clone();
        if headers.is_empty() {
            return Err(MoodlensError::corpus_load("CSV header is empty"));
        }
        let columns = detect_columns(&headers)?;
        debug!(
            text_column = &headers[columns.text],
            label_column = &headers[columns.label],
            "detected corpus columns"
        );

        let mut examples = Vec::new();
        let mut dropped_rows = 0;
        for record in reader.records() {
            let record = record.map_err(|e| {
                MoodlensError::corpus_load(format!("failed to read CSV record: {e}"))
            })?;
            match (record.get(columns.text), record.get(columns.label)) {
                (Some(text), Some(label)) if !text.is_empty() && !label.is_empty() => {
                    examples.push(LabeledExample {
                        text: text.to_string(),
                        label: label.to_string(),
                    });
                }
                _ => dropped_rows += 1,
            }
        }

        Ok(Corpus {
            examples,
            dropped_rows,
        })
    }

    /// Usable examples, in file order.
    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    /// Number of usable examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether no usable example was found.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Rows skipped because a required value was missing.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_columns_case_insensitive() {
        let headers = StringRecord::from(vec!["id", "Comment_Text", "Emotion"]);
        let columns = detect_columns(&headers).unwrap();
        assert_eq!(columns, ColumnSelection { text: 1, label: 2 });
    }

    #[test]
    fn test_detect_columns_first_match_wins() {
        let headers = StringRecord::from(vec!["text_a", "emotion", "text_b"]);
        assert_eq!(detect_columns(&headers).unwrap().text, 0);
    }

    #[test]
    fn test_detect_columns_missing() {
        let headers = StringRecord::from(vec!["comment", "emotion"]);
        assert!(matches!(
            detect_columns(&headers),
            Err(MoodlensError::CorpusLoad(_))
        ));

        let headers = StringRecord::from(vec!["text", "label"]);
        assert!(detect_columns(&headers).is_err());
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let csv = "text,emotion,extra\n\
                   I love it,joy,x\n\
                   ,anger,x\n\
                   so sad,,x\n\
                   short row\n\
                   \"terrible, awful\",anger,x\n";
        let corpus = Corpus::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.dropped_rows(), 3);
        assert_eq!(corpus.examples()[1].text, "terrible, awful");
        assert_eq!(corpus.examples()[1].label, "anger");
    }

    #[test]
    fn test_header_only() {
        let corpus = Corpus::from_reader("Text,Emotion\n".as_bytes()).unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = Corpus::from_path("/nonexistent/corpus.csv");
        assert!(matches!(result, Err(MoodlensError::CorpusLoad(_))));
    }
}
