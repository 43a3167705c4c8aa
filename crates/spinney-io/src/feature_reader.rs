//! CSV feature reader for unlabeled prediction inputs.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::IoError;
use crate::domain::FeatureDataset;

/// Reads an unlabeled feature matrix from a CSV file.
///
/// Every header column is treated as a numeric feature; there is no
/// target column. Validation matches [`TrainingSetReader`]: consistent
/// row lengths, finite values, at least one data row.
///
/// [`TrainingSetReader`]: crate::TrainingSetReader
pub struct FeatureReader {
    path: PathBuf,
}

impl FeatureReader {
    /// Create a new reader for the given CSV path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`FeatureDataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<FeatureDataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;
        let feature_names: Vec<String> = header.iter().map(str::to_string).collect();
        let expected_cols = feature_names.len();

        let mut features = Vec::new();
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

            let mut row = Vec::with_capacity(expected_cols);
            for (col_index, raw) in record.iter().enumerate() {
                let value: f64 = raw.parse().map_err(|_| IoError::NonFiniteValue {
                    path: self.path.clone(),
                    row_index,
                    column: feature_names[col_index].clone(),
                    raw: raw.to_string(),
                })?;
                if !value.is_finite() {
                    return Err(IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        column: feature_names[col_index].clone(),
                        raw: raw.to_string(),
                    });
                }
                row.push(value);
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
            "feature set loaded"
        );

        Ok(FeatureDataset::new(feature_names, features))
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
        let csv = "sqft,rooms\n100.0,2\n80.0,1\n";
        let f = write_csv(csv);
        let ds = FeatureReader::new(f.path()).read().unwrap();
        assert_eq!(ds.n_samples(), 2);
        assert_eq!(ds.feature_names(), &["sqft", "rooms"]);
        assert_eq!(ds.features()[0], vec![100.0, 2.0]);
    }

    #[test]
    fn error_empty_dataset() {
        let csv = "a,b\n";
        let f = write_csv(csv);
        let result = FeatureReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_inconsistent_row_length() {
        let csv = "a,b\n1.0,2.0\n3.0\n";
        let f = write_csv(csv);
        let result = FeatureReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::InconsistentRowLength { row_index: 1, .. })
        ));
    }

    #[test]
    fn error_non_finite_value() {
        let csv = "a,b\n1.0,NaN\n";
        let f = write_csv(csv);
        let result = FeatureReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::NonFiniteValue { .. })));
    }

    #[test]
    fn error_file_not_found() {
        let result = FeatureReader::new(Path::new("/nonexistent/features.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }
}
