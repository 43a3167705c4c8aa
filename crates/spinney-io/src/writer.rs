//! Result artifact writer: predictions CSV, metrics JSON, model path layout.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use spinney_rf::{Metrics, Prediction};

use crate::IoError;
use crate::domain::ModelName;

/// JSON shape of the metrics artifact.
#[derive(Serialize)]
struct MetricsArtifact<'a> {
    model: &'a str,
    r2: f64,
    mae: f64,
    n_samples: usize,
    trained_at_ms: u64,
}

/// Writes model artifacts into an output directory.
///
/// All artifact file names are derived from the model name:
///
/// | Artifact | File |
/// |---|---|
/// | Trained model | `{name}_model.bin` |
/// | Predictions | `{name}_predictions.csv` |
/// | Metrics | `{name}_metrics.json` |
pub struct ResultWriter {
    output_dir: PathBuf,
    model_name: ModelName,
}

impl ResultWriter {
    /// Create a writer rooted at `output_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    pub fn new(output_dir: &Path, model_name: ModelName) -> Result<Self, IoError> {
        std::fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            model_name,
        })
    }

    /// Path where the serialized model is stored.
    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_model.bin", self.model_name))
    }

    /// Write predictions as CSV with columns `row,mean,lower,upper`.
    ///
    /// Row indices match the order of the input feature file.
    #[instrument(skip(self, predictions), fields(n = predictions.len()))]
    pub fn write_predictions(&self, predictions: &[Prediction]) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_predictions.csv", self.model_name));

        let mut wtr = csv::Writer::from_path(&path).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;

        let write_err = |e: csv::Error| IoError::WriteFile {
            path: path.clone(),
            source: std::io::Error::other(e),
        };
        wtr.write_record(["row", "mean", "lower", "upper"])
            .map_err(write_err)?;
        for (row, pred) in predictions.iter().enumerate() {
            wtr.write_record([
                row.to_string(),
                pred.mean.to_string(),
                pred.lower.to_string(),
                pred.upper.to_string(),
            ])
            .map_err(write_err)?;
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "predictions written");
        Ok(path)
    }

    /// Write training metrics as pretty-printed JSON.
    #[instrument(skip(self, metrics))]
    pub fn write_metrics(&self, metrics: &Metrics) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_metrics.json", self.model_name));

        let artifact = MetricsArtifact {
            model: self.model_name.as_str(),
            r2: metrics.r2,
            mae: metrics.mae,
            n_samples: metrics.n_samples,
            trained_at_ms: metrics.trained_at_ms,
        };
        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;
        std::fs::write(&path, json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "metrics written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn writer(dir: &TempDir) -> ResultWriter {
        ResultWriter::new(dir.path(), ModelName::new("house".to_string()).unwrap()).unwrap()
    }

    #[test]
    fn creates_output_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("out").join("models");
        let w = ResultWriter::new(&nested, ModelName::new("m".to_string()).unwrap()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(w.model_path(), nested.join("m_model.bin"));
    }

    #[test]
    fn model_path_uses_name() {
        let dir = TempDir::new().unwrap();
        let w = writer(&dir);
        assert_eq!(w.model_path(), dir.path().join("house_model.bin"));
    }

    #[test]
    fn writes_predictions_csv() {
        let dir = TempDir::new().unwrap();
        let w = writer(&dir);
        let preds = vec![
            Prediction { mean: 10.0, lower: 8.0, upper: 12.0 },
            Prediction { mean: 20.5, lower: 19.0, upper: 22.0 },
        ];
        let path = w.write_predictions(&preds).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("row,mean,lower,upper"));
        assert_eq!(lines.next(), Some("0,10,8,12"));
        assert_eq!(lines.next(), Some("1,20.5,19,22"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn writes_metrics_json() {
        let dir = TempDir::new().unwrap();
        let w = writer(&dir);
        let metrics = Metrics {
            r2: 0.95,
            mae: 1.25,
            n_samples: 100,
            trained_at_ms: 1_700_000_000_000,
        };
        let path = w.write_metrics(&metrics).unwrap();
        let content: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(content["model"], "house");
        assert_eq!(content["r2"], 0.95);
        assert_eq!(content["n_samples"], 100);
    }
}
