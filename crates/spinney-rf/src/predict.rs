//! Point and interval prediction from a fitted forest.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::ForestError;
use crate::forest::RegressionForest;

/// A point prediction with its ensemble-spread interval.
///
/// The bounds are empirical percentiles of the per-tree votes: a measure
/// of ensemble dispersion, not a calibrated statistical prediction
/// interval (no out-of-bag residual correction is applied).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Prediction {
    /// Arithmetic mean of all per-tree predictions.
    pub mean: f64,
    /// Vote at the configured lower percentile.
    pub lower: f64,
    /// Vote at the configured upper percentile.
    pub upper: f64,
}

/// Index into a sorted vote vector for percentile `p`, clamped to `[0, n-1]`.
fn percentile_index(n: usize, p: f64) -> usize {
    ((n as f64 * p).floor() as usize).min(n - 1)
}

impl RegressionForest {
    /// Predict the target value and interval for a single sample.
    ///
    /// Routes the sample through every tree, sorts the votes ascending,
    /// and takes the mean plus the votes at the configured lower/upper
    /// percentile indices. Pure and safe to call concurrently.
    ///
    /// # Errors
    ///
    /// | Variant                                     | When                               |
    /// |---------------------------------------------|------------------------------------|
    /// | [`ForestError::UntrainedModel`]             | the forest has no trees            |
    /// | [`ForestError::PredictionFeatureMismatch`]  | `sample.len() != n_features`       |
    pub fn predict(&self, sample: &[f64]) -> Result<Prediction, ForestError> {
        if self.trees.is_empty() {
            return Err(ForestError::UntrainedModel);
        }
        if sample.len() != self.n_features {
            return Err(ForestError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }

        let mut votes: Vec<f64> = self.trees.iter().map(|t| t.predict_value(sample)).collect();
        votes.sort_unstable_by(|a, b| a.total_cmp(b));

        let n = votes.len();
        let mean = votes.iter().sum::<f64>() / n as f64;
        let lower = votes[percentile_index(n, self.lower_percentile)];
        let upper = votes[percentile_index(n, self.upper_percentile)];

        Ok(Prediction { mean, lower, upper })
    }

    /// Predict values and intervals for a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`RegressionForest::predict`].
    pub fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<Prediction>, ForestError> {
        features
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the number of features this forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the feature names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the lower interval percentile.
    #[must_use]
    pub fn lower_percentile(&self) -> f64 {
        self.lower_percentile
    }

    /// Return the upper interval percentile.
    #[must_use]
    pub fn upper_percentile(&self) -> f64 {
        self.upper_percentile
    }
}
