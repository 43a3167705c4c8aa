//! Model store: forest + metrics serialization via bincode.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::ForestError;
use crate::result::TrainedModel;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

/// Versioned envelope for the serialized model.
#[derive(serde::Serialize, serde::Deserialize)]
struct ModelEnvelope {
    /// Format version for compatibility checking.
    format_version: u32,
    /// Number of trees in the forest.
    n_trees: usize,
    /// Number of features the model was trained on.
    n_features: usize,
    /// Feature column names.
    feature_names: Vec<String>,
    /// The serialized forest with its paired metrics.
    model: TrainedModel,
}

impl TrainedModel {
    /// Save the model (forest plus metrics) to a binary file.
    ///
    /// Uses bincode encoding wrapped in a versioned envelope for
    /// forward-compatibility checking.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ForestError::SerializeModel`] | bincode encoding failed |
    /// | [`ForestError::WriteModel`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ForestError> {
        let path = path.as_ref();

        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            n_trees: self.forest.trees.len(),
            n_features: self.forest.n_features,
            feature_names: self.forest.feature_names.clone(),
            model: self.clone(),
        };

        let bytes = bincode::serialize(&envelope)
            .map_err(|e| ForestError::SerializeModel { source: e })?;

        std::fs::write(path, &bytes).map_err(|e| ForestError::WriteModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(
            size_bytes = bytes.len(),
            n_trees = self.forest.trees.len(),
            "model saved"
        );

        Ok(())
    }

    /// Load a model from a binary file.
    ///
    /// Checks the format version and returns an error on mismatch.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ForestError::ReadModel`] | file read failed |
    /// | [`ForestError::DeserializeModel`] | bincode decoding failed |
    /// | [`ForestError::IncompatibleModelVersion`] | format version mismatch |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ForestError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| ForestError::ReadModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        let envelope: ModelEnvelope =
            bincode::deserialize(&bytes).map_err(|e| ForestError::DeserializeModel {
                path: path.to_path_buf(),
                source: e,
            })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(ForestError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: envelope.format_version,
                path: path.to_path_buf(),
            });
        }

        debug!(
            n_trees = envelope.n_trees,
            n_features = envelope.n_features,
            "model loaded"
        );

        Ok(envelope.model)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::config::ForestConfig;
    use crate::result::TrainedModel;

    fn train_simple_model() -> TrainedModel {
        let features = vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![3.0, 0.0],
            vec![10.0, 0.0],
            vec![11.0, 0.0],
            vec![12.0, 0.0],
        ];
        let targets = vec![1.0, 1.5, 2.0, 10.0, 10.5, 11.0];
        let names = vec!["x".to_string(), "y".to_string()];
        ForestConfig::new()
            .with_n_trees(5)
            .with_min_samples_split(2)
            .with_seed(42)
            .fit(&features, &targets, &names)
            .unwrap()
    }

    #[test]
    fn round_trip_identical_predictions_and_metrics() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("test_model.bin");

        let model = train_simple_model();
        model.save(&model_path).unwrap();
        let loaded = TrainedModel::load(&model_path).unwrap();

        assert_eq!(model.metrics(), loaded.metrics());
        assert_eq!(loaded.forest().feature_names(), &["x", "y"]);

        let test_samples = vec![vec![1.5, 0.0], vec![11.0, 0.0], vec![5.0, 0.0]];
        for sample in &test_samples {
            let orig = model.forest().predict(sample).unwrap();
            let restored = loaded.forest().predict(sample).unwrap();
            assert_eq!(orig, restored, "predictions differ for sample {sample:?}");
        }
    }

    #[test]
    fn load_nonexistent_file_error() {
        let err = TrainedModel::load("/tmp/nonexistent_model_abc123.bin").unwrap_err();
        assert!(matches!(err, crate::ForestError::ReadModel { .. }));
    }

    #[test]
    fn load_corrupt_file_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.bin");
        std::fs::write(&path, b"not a valid bincode file").unwrap();
        let err = TrainedModel::load(&path).unwrap_err();
        assert!(matches!(err, crate::ForestError::DeserializeModel { .. }));
    }
}
