//! Configuration builder for regression forest training.

use std::sync::atomic::AtomicBool;

use crate::error::ForestError;
use crate::result::{TrainedModel, TrainingProgress};

/// Configuration for regression forest training.
///
/// Construct via [`ForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter                 | Default |
/// |---------------------------|---------|
/// | `n_trees`                 | 200     |
/// | `max_depth`               | 15      |
/// | `min_samples_split`       | 5       |
/// | `feature_subsample_ratio` | 0.7     |
/// | `threshold_candidate_cap` | 20      |
/// | `lower_percentile`        | 0.1     |
/// | `upper_percentile`        | 0.9     |
/// | `seed`                    | 42      |
#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) max_depth: usize,
    pub(crate) min_samples_split: usize,
    pub(crate) feature_subsample_ratio: f64,
    pub(crate) threshold_candidate_cap: usize,
    pub(crate) lower_percentile: f64,
    pub(crate) upper_percentile: f64,
    pub(crate) seed: u64,
}

impl ForestConfig {
    /// Create a new config with default values.
    ///
    /// All parameters use the defaults shown in the struct-level documentation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_trees: 200,
            max_depth: 15,
            min_samples_split: 5,
            feature_subsample_ratio: 0.7,
            threshold_candidate_cap: 20,
            lower_percentile: 0.1,
            upper_percentile: 0.9,
            seed: 42,
        }
    }

    // --- Setters ---

    /// Set the number of trees in the ensemble.
    #[must_use]
    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    /// Set the maximum tree depth (root is depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the fraction of features considered at each split.
    ///
    /// The per-node candidate count is `ceil(n_features * ratio)`.
    #[must_use]
    pub fn with_feature_subsample_ratio(mut self, ratio: f64) -> Self {
        self.feature_subsample_ratio = ratio;
        self
    }

    /// Set the maximum number of distinct threshold candidates per feature.
    #[must_use]
    pub fn with_threshold_candidate_cap(mut self, cap: usize) -> Self {
        self.threshold_candidate_cap = cap;
        self
    }

    /// Set the percentile pair used for interval bounds.
    #[must_use]
    pub fn with_percentiles(mut self, lower: f64, upper: f64) -> Self {
        self.lower_percentile = lower;
        self.upper_percentile = upper;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the maximum tree depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the minimum samples required to split a node.
    #[must_use]
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Return the feature subsample ratio.
    #[must_use]
    pub fn feature_subsample_ratio(&self) -> f64 {
        self.feature_subsample_ratio
    }

    /// Return the threshold candidate cap.
    #[must_use]
    pub fn threshold_candidate_cap(&self) -> usize {
        self.threshold_candidate_cap
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

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Validate the configuration values.
    pub(crate) fn validate(&self) -> Result<(), ForestError> {
        if self.n_trees == 0 {
            return Err(ForestError::InvalidTreeCount { n_trees: 0 });
        }
        if self.max_depth == 0 {
            return Err(ForestError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_samples_split < 2 {
            return Err(ForestError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }
        if self.feature_subsample_ratio <= 0.0 || self.feature_subsample_ratio > 1.0 {
            return Err(ForestError::InvalidFeatureRatio {
                ratio: self.feature_subsample_ratio,
            });
        }
        if self.threshold_candidate_cap == 0 {
            return Err(ForestError::InvalidThresholdCap { cap: 0 });
        }
        let ordered = (0.0..=1.0).contains(&self.lower_percentile)
            && (0.0..=1.0).contains(&self.upper_percentile)
            && self.lower_percentile <= self.upper_percentile;
        if !ordered {
            return Err(ForestError::InvalidPercentiles {
                lower: self.lower_percentile,
                upper: self.upper_percentile,
            });
        }
        Ok(())
    }

    /// Train a regression forest on the provided dataset.
    ///
    /// `features[sample_idx][feature_idx]` is row-major; `targets[sample_idx]`
    /// holds the numeric regression targets; `feature_names` names each
    /// feature column.
    ///
    /// Fit metrics (R², MAE) are computed in-sample over the full training
    /// set and returned alongside the forest.
    ///
    /// # Errors
    ///
    /// | Variant                                  | When                                        |
    /// |------------------------------------------|---------------------------------------------|
    /// | [`ForestError::InvalidTreeCount`]        | `n_trees` is zero                           |
    /// | [`ForestError::InvalidMaxDepth`]         | `max_depth` is zero                         |
    /// | [`ForestError::InvalidMinSamplesSplit`]  | `min_samples_split` < 2                     |
    /// | [`ForestError::InvalidFeatureRatio`]     | ratio is not in (0.0, 1.0]                  |
    /// | [`ForestError::InvalidThresholdCap`]     | cap is zero                                 |
    /// | [`ForestError::InvalidPercentiles`]      | percentile pair unordered or outside [0, 1] |
    /// | [`ForestError::EmptyDataset`]            | `features` is empty                         |
    /// | [`ForestError::ZeroFeatures`]            | rows have zero feature columns              |
    /// | [`ForestError::FeatureCountMismatch`]    | rows have inconsistent lengths              |
    /// | [`ForestError::TargetCountMismatch`]     | `targets.len() != features.len()`           |
    /// | [`ForestError::NonFiniteValue`]          | any feature or target is NaN or infinite    |
    pub fn fit(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        feature_names: &[String],
    ) -> Result<TrainedModel, ForestError> {
        crate::forest::train(self, features, targets, feature_names, None, None)
    }

    /// Train with a progress observer and an optional cancellation flag.
    ///
    /// `on_progress` is invoked between tree batches; `cancel` is checked at
    /// the same points, and a raised flag aborts training with
    /// [`ForestError::Cancelled`]. Tree construction itself is identical to
    /// [`ForestConfig::fit`] and produces the same forest for the same seed.
    ///
    /// # Errors
    ///
    /// Everything [`ForestConfig::fit`] returns, plus [`ForestError::Cancelled`].
    pub fn fit_with_observer(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        feature_names: &[String],
        on_progress: &(dyn Fn(TrainingProgress) + Sync),
        cancel: Option<&AtomicBool>,
    ) -> Result<TrainedModel, ForestError> {
        crate::forest::train(self, features, targets, feature_names, Some(on_progress), cancel)
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ForestConfig;
    use crate::error::ForestError;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ForestConfig::new();
        assert_eq!(cfg.n_trees(), 200);
        assert_eq!(cfg.max_depth(), 15);
        assert_eq!(cfg.min_samples_split(), 5);
        assert!((cfg.feature_subsample_ratio() - 0.7).abs() < f64::EPSILON);
        assert_eq!(cfg.threshold_candidate_cap(), 20);
        assert!((cfg.lower_percentile() - 0.1).abs() < f64::EPSILON);
        assert!((cfg.upper_percentile() - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_trees_rejected() {
        let err = ForestConfig::new().with_n_trees(0).validate().unwrap_err();
        assert!(matches!(err, ForestError::InvalidTreeCount { n_trees: 0 }));
    }

    #[test]
    fn zero_depth_rejected() {
        let err = ForestConfig::new().with_max_depth(0).validate().unwrap_err();
        assert!(matches!(err, ForestError::InvalidMaxDepth { .. }));
    }

    #[test]
    fn min_samples_split_below_two_rejected() {
        let err = ForestConfig::new()
            .with_min_samples_split(1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ForestError::InvalidMinSamplesSplit { .. }));
    }

    #[test]
    fn feature_ratio_bounds_enforced() {
        assert!(matches!(
            ForestConfig::new().with_feature_subsample_ratio(0.0).validate(),
            Err(ForestError::InvalidFeatureRatio { .. })
        ));
        assert!(matches!(
            ForestConfig::new().with_feature_subsample_ratio(1.5).validate(),
            Err(ForestError::InvalidFeatureRatio { .. })
        ));
        assert!(ForestConfig::new().with_feature_subsample_ratio(1.0).validate().is_ok());
    }

    #[test]
    fn unordered_percentiles_rejected() {
        let err = ForestConfig::new()
            .with_percentiles(0.9, 0.1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ForestError::InvalidPercentiles { .. }));
    }

    #[test]
    fn out_of_range_percentiles_rejected() {
        let err = ForestConfig::new()
            .with_percentiles(-0.1, 0.9)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ForestError::InvalidPercentiles { .. }));
    }
}
