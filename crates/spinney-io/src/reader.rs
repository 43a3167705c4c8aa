//! CSV training-set reader with full input validation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::TabularDataset;

/// Reads a labeled tabular dataset from a CSV file.
///
/// Expected CSV format:
/// - Header row required; one column matches the configured target name,
///   every other column is a numeric feature.
/// - One row per sample, all rows with the same number of columns.
///
/// The feature order is fixed by the header and preserved in the
/// returned dataset.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingTargetColumn`] | Target name absent from header |
/// | [`IoError::NoFeatureColumns`] | Header holds only the target |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row column count differs from header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable |
pub struct TrainingSetReader {
    path: PathBuf,
    target: String,
}

impl TrainingSetReader {
    /// Create a new reader for the given CSV path and target column name.
    pub fn new(path: &Path, target: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            target: target.to_string(),
        }
    }

    /// Read and validate the CSV file, returning a [`TabularDataset`].
    #[instrument(skip(self), fields(path = %self.path.display(), target = %self.target))]
    pub fn read(&self) -> Result<TabularDataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) allows rows with varying column counts so that our own
        // InconsistentRowLength check fires instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?
        .clone();
        let expected_cols = header.len();

        // Locate the target column; every other column is a feature.
        let target_idx = header
            .iter()
            .position(|name| name == self.target)
            .ok_or_else(|| IoError::MissingTargetColumn {
                path: self.path.clone(),
                target: self.target.clone(),
            })?;
        let feature_names: Vec<String> = header
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != target_idx)
            .map(|(_, name)| name.to_string())
            .collect();
        if feature_names.is_empty() {
            return Err(IoError::NoFeatureColumns {
                path: self.path.clone(),
                target: self.target.clone(),
            });
        }
        debug!(expected_cols, target_idx, "read CSV header");

        let mut features = Vec::new();
        let mut targets = Vec::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut row = Vec::with_capacity(expected_cols - 1);
            for (col_index, raw) in record.iter().enumerate() {
                let column = &header[col_index];
                let value: f64 = raw.parse().map_err(|_| IoError::NonFiniteValue {
                    path: self.path.clone(),
                    row_index,
                    column: column.to_string(),
                    raw: raw.to_string(),
                })?;
                if !value.is_finite() {
                    return Err(IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        column: column.to_string(),
                        raw: raw.to_string(),
                    });
                }
                if col_index == target_idx {
                    targets.push(value);
                } else {
                    row.push(value);
                }
            }
            features.push(row);
        }

        if features.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_samples = features.len(),
            n_features = feature_names.len(),
            "training set loaded"
        );

        Ok(TabularDataset::new(feature_names, features, targets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_valid_rows() {
        let csv = "sqft,rooms,price\n100.0,2,250.0\n80.0,1,180.0\n120.0,3,320.0\n";
        let f = write_csv(csv);
        let ds = TrainingSetReader::new(f.path(), "price").read().unwrap();
        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.feature_names(), &["sqft", "rooms"]);
        assert_eq!(ds.targets(), &[250.0, 180.0, 320.0]);
        assert_eq!(ds.features()[1], vec![80.0, 1.0]);
    }

    #[test]
    fn target_column_in_middle() {
        let csv = "a,price,b\n1.0,10.0,2.0\n3.0,30.0,4.0\n";
        let f = write_csv(csv);
        let ds = TrainingSetReader::new(f.path(), "price").read().unwrap();
        assert_eq!(ds.feature_names(), &["a", "b"]);
        assert_eq!(ds.features()[0], vec![1.0, 2.0]);
        assert_eq!(ds.targets(), &[10.0, 30.0]);
    }

    #[test]
    fn row_order_preserved() {
        let csv = "x,y\n9.0,1.0\n1.0,2.0\n5.0,3.0\n";
        let f = write_csv(csv);
        let ds = TrainingSetReader::new(f.path(), "y").read().unwrap();
        assert_eq!(ds.targets(), &[1.0, 2.0, 3.0]);
        assert_eq!(ds.features()[0], vec![9.0]);
    }

    #[test]
    fn error_file_not_found() {
        let result = TrainingSetReader::new(Path::new("/nonexistent/data.csv"), "y").read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_missing_target_column() {
        let csv = "a,b\n1.0,2.0\n";
        let f = write_csv(csv);
        let result = TrainingSetReader::new(f.path(), "price").read();
        assert!(matches!(result, Err(IoError::MissingTargetColumn { .. })));
    }

    #[test]
    fn error_no_feature_columns() {
        let csv = "price\n1.0\n";
        let f = write_csv(csv);
        let result = TrainingSetReader::new(f.path(), "price").read();
        assert!(matches!(result, Err(IoError::NoFeatureColumns { .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let csv = "a,price\n";
        let f = write_csv(csv);
        let result = TrainingSetReader::new(f.path(), "price").read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_inconsistent_row_length() {
        let csv = "a,b,price\n1.0,2.0,3.0\n1.0,2.0\n";
        let f = write_csv(csv);
        let result = TrainingSetReader::new(f.path(), "price").read();
        assert!(matches!(
            result,
            Err(IoError::InconsistentRowLength { row_index: 1, .. })
        ));
    }

    #[test]
    fn error_non_finite_nan() {
        let csv = "a,price\nNaN,1.0\n";
        let f = write_csv(csv);
        let result = TrainingSetReader::new(f.path(), "price").read();
        assert!(matches!(result, Err(IoError::NonFiniteValue { .. })));
    }

    #[test]
    fn error_non_finite_target() {
        let csv = "a,price\n1.0,Inf\n";
        let f = write_csv(csv);
        let result = TrainingSetReader::new(f.path(), "price").read();
        assert!(matches!(result, Err(IoError::NonFiniteValue { .. })));
    }

    #[test]
    fn error_unparseable_value() {
        let csv = "a,price\nabc,1.0\n";
        let f = write_csv(csv);
        let result = TrainingSetReader::new(f.path(), "price").read();
        assert!(matches!(result, Err(IoError::NonFiniteValue { .. })));
    }
}
