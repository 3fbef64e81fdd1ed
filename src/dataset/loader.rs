//! Loader for delimited board-state tables with an outcome column.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::{Array1, Array2};
use thiserror::Error;

use crate::board::decode_feature_cell;

/// Default name of the label column.
pub const OUTCOME_COLUMN: &str = "Outcome";
/// Class names indexed by label value (`0 = Lose`, `1 = Win`).
pub const CLASS_NAMES: [&str; 2] = ["Lose", "Win"];

#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing label column {0:?}")]
    MissingColumn(String),
    #[error("label column {0:?} appears more than once")]
    DuplicateColumn(String),
    #[error("line {line}: invalid value {value:?} in column {column:?}")]
    InvalidCell {
        line: u64,
        column: String,
        value: String,
    },
    #[error("line {line}: invalid outcome {value:?} (expected 0/1, lose/win, negative/positive)")]
    InvalidLabel { line: u64, value: String },
    #[error("dataset has no rows")]
    Empty,
    #[error("dataset has no feature columns")]
    NoFeatures,
    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Feature matrix and row-aligned outcome labels.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeTable {
    /// Feature column names in file order.
    pub feature_names: Vec<String>,
    /// Shape: `[rows][features]`.
    pub x: Array2<f64>,
    /// Outcome per row, `0` or `1`.
    pub y: Array1<usize>,
}

impl OutcomeTable {
    pub fn n_rows(&self) -> usize {
        self.y.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Number of rows per class, indexed like [`CLASS_NAMES`].
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for &label in &self.y {
            counts[label] += 1;
        }
        counts
    }
}

/// Load a comma-delimited file with a header row.
pub fn load_csv(path: &Path, label_column: &str) -> Result<OutcomeTable, DatasetLoadError> {
    let file = File::open(path).map_err(|source| DatasetLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let table = read_table(file, label_column)?;
    tracing::info!(
        "Loaded {} rows x {} features from {}",
        table.n_rows(),
        table.n_features(),
        path.display()
    );
    Ok(table)
}

/// Parse a table from any reader. Every column other than `label_column` becomes a
/// feature, in file order.
pub fn read_table<R: Read>(reader: R, label_column: &str) -> Result<OutcomeTable, DatasetLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let label_idx = headers
        .iter()
        .position(|name| name == label_column)
        .ok_or_else(|| DatasetLoadError::MissingColumn(label_column.to_string()))?;
    if headers.iter().filter(|name| *name == label_column).count() > 1 {
        return Err(DatasetLoadError::DuplicateColumn(label_column.to_string()));
    }
    if label_idx + 1 != headers.len() {
        tracing::warn!(
            "Label column {label_column:?} is not the last column; using all other columns as features"
        );
    }
    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != label_idx)
        .map(|(_, name)| name.to_string())
        .collect();
    if feature_names.is_empty() {
        return Err(DatasetLoadError::NoFeatures);
    }

    let mut values = Vec::new();
    let mut labels = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        for (idx, raw) in record.iter().enumerate() {
            if idx == label_idx {
                let label = decode_label(raw).ok_or_else(|| DatasetLoadError::InvalidLabel {
                    line,
                    value: raw.to_string(),
                })?;
                labels.push(label);
                continue;
            }
            let value = decode_feature_cell(raw).ok_or_else(|| DatasetLoadError::InvalidCell {
                line,
                column: headers.get(idx).unwrap_or_default().to_string(),
                value: raw.to_string(),
            })?;
            values.push(value);
        }
    }
    if labels.is_empty() {
        return Err(DatasetLoadError::Empty);
    }

    let x = Array2::from_shape_vec((labels.len(), feature_names.len()), values)?;
    Ok(OutcomeTable {
        feature_names,
        x,
        y: Array1::from_vec(labels),
    })
}

/// Decode an outcome cell into a class index. Numbers must equal exactly 0 or 1.
pub fn decode_label(raw: &str) -> Option<usize> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return if value == 1.0 {
            Some(1)
        } else if value == 0.0 {
            Some(0)
        } else {
            None
        };
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "win" | "positive" => Some(1),
        "lose" | "loss" | "negative" => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn splits_features_from_outcome() {
        let csv = "c1,c2,c3,Outcome\n1,0,-1,1\nx,o,b,0\n";
        let table = read_table(csv.as_bytes(), OUTCOME_COLUMN).unwrap();
        assert_eq!(table.feature_names, vec!["c1", "c2", "c3"]);
        assert_eq!(table.x.shape(), &[2, 3]);
        assert_eq!(table.x.row(0).to_vec(), vec![1.0, 0.0, -1.0]);
        assert_eq!(table.x.row(1).to_vec(), vec![1.0, -1.0, 0.0]);
        assert_eq!(table.y.to_vec(), vec![1, 0]);
        assert_eq!(table.class_counts(), [1, 1]);
    }

    #[test]
    fn outcome_column_may_sit_anywhere() {
        let csv = "Outcome,a,b\npositive,1,2\nnegative,3,4\n";
        let table = read_table(csv.as_bytes(), OUTCOME_COLUMN).unwrap();
        assert_eq!(table.feature_names, vec!["a", "b"]);
        assert_eq!(table.x.row(1).to_vec(), vec![3.0, 4.0]);
        assert_eq!(table.y.to_vec(), vec![1, 0]);
    }

    #[test]
    fn missing_outcome_column_is_an_error() {
        let csv = "a,b,Result\n1,2,1\n";
        let err = read_table(csv.as_bytes(), OUTCOME_COLUMN).unwrap_err();
        assert!(matches!(err, DatasetLoadError::MissingColumn(name) if name == "Outcome"));
    }

    #[test]
    fn bad_cells_report_their_line() {
        let csv = "a,Outcome\n1,1\nzz,0\n";
        let err = read_table(csv.as_bytes(), OUTCOME_COLUMN).unwrap_err();
        match err {
            DatasetLoadError::InvalidCell { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "a");
                assert_eq!(value, "zz");
            }
            other => panic!("unexpected error: {other}"),
        }

        let csv = "a,Outcome\n1,draw\n";
        let err = read_table(csv.as_bytes(), OUTCOME_COLUMN).unwrap_err();
        assert!(matches!(err, DatasetLoadError::InvalidLabel { line: 2, .. }));
    }

    #[test]
    fn ragged_rows_and_empty_tables_fail() {
        let csv = "a,b,Outcome\n1,2\n";
        assert!(matches!(
            read_table(csv.as_bytes(), OUTCOME_COLUMN),
            Err(DatasetLoadError::Csv(_))
        ));
        let csv = "a,b,Outcome\n";
        assert!(matches!(
            read_table(csv.as_bytes(), OUTCOME_COLUMN),
            Err(DatasetLoadError::Empty)
        ));
        let csv = "Outcome\n1\n";
        assert!(matches!(
            read_table(csv.as_bytes(), OUTCOME_COLUMN),
            Err(DatasetLoadError::NoFeatures)
        ));
    }

    #[test]
    fn numeric_labels_accept_any_spelling_of_zero_and_one() {
        for (raw, expected) in [
            ("1.00", Some(1)),
            ("1e0", Some(1)),
            ("-0.0", Some(0)),
            ("0.000", Some(0)),
        ] {
            assert_eq!(decode_label(raw), expected, "label {raw:?}");
        }
        assert_eq!(decode_label("WIN"), Some(1));
        assert_eq!(decode_label("Loss"), Some(0));
        assert_eq!(decode_label("0.5"), None);
        assert_eq!(decode_label("2"), None);
        assert_eq!(decode_label("NaN"), None);

        let csv = "a,Outcome\n1,1.00\n0,0e0\n";
        let table = read_table(csv.as_bytes(), OUTCOME_COLUMN).unwrap();
        assert_eq!(table.y.to_vec(), vec![1, 0]);
    }

    #[test]
    fn repeated_outcome_header_is_rejected() {
        let csv = "Outcome,a,Outcome\n1,0,1\n";
        let err = read_table(csv.as_bytes(), OUTCOME_COLUMN).unwrap_err();
        assert!(matches!(err, DatasetLoadError::DuplicateColumn(name) if name == "Outcome"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = load_csv(&dir.path().join("absent.csv"), OUTCOME_COLUMN).unwrap_err();
        assert!(matches!(err, DatasetLoadError::Io { .. }));
    }
}
