//! Domain types for spinney-io.

use crate::IoError;

/// A validated model name for artifact file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName(String);

impl ModelName {
    /// Parse and validate a model name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidModelName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidModelName { name });
        }
        Ok(Self(name))
    }

    /// Return the model name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labeled tabular dataset for training or evaluation.
///
/// Produced by [`TrainingSetReader`](crate::TrainingSetReader). Feature
/// names fix the column order; `features[i]` and `targets[i]` describe
/// the same CSV row, in file order.
#[derive(Debug)]
pub struct TabularDataset {
    /// Feature column names from the CSV header (target excluded).
    feature_names: Vec<String>,
    /// Feature values: `features[sample_index][feature_index]`.
    features: Vec<Vec<f64>>,
    /// Target values, parallel to `features`.
    targets: Vec<f64>,
}

impl TabularDataset {
    /// Create a new labeled dataset.
    pub(crate) fn new(
        feature_names: Vec<String>,
        features: Vec<Vec<f64>>,
        targets: Vec<f64>,
    ) -> Self {
        Self { feature_names, features, targets }
    }

    /// Return the feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the feature matrix (row-major).
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Return the target values.
    #[must_use]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Return the number of samples (rows).
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// An unlabeled tabular dataset for prediction.
///
/// Produced by [`FeatureReader`](crate::FeatureReader); every CSV column
/// is a feature.
#[derive(Debug)]
pub struct FeatureDataset {
    /// Feature column names from the CSV header.
    feature_names: Vec<String>,
    /// Feature values: `features[sample_index][feature_index]`.
    features: Vec<Vec<f64>>,
}

impl FeatureDataset {
    /// Create a new feature dataset.
    pub(crate) fn new(feature_names: Vec<String>, features: Vec<Vec<f64>>) -> Self {
        Self { feature_names, features }
    }

    /// Return the feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the feature matrix (row-major).
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Return the number of samples (rows).
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}
