//! Training result types for the regression forest.

use crate::forest::RegressionForest;
use crate::metrics::Metrics;

/// Progress snapshot delivered between tree batches during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingProgress {
    /// Trees completed so far.
    pub trees_built: usize,
    /// Total trees requested.
    pub n_trees: usize,
}

/// Result of regression forest training: the fitted forest paired with
/// its in-sample fit metrics.
///
/// The two always travel together: the metrics describe exactly this
/// forest's fit on the data it was trained on, and the model store
/// persists and restores them as one unit.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TrainedModel {
    pub(crate) forest: RegressionForest,
    pub(crate) metrics: Metrics,
}

impl TrainedModel {
    /// Create a new trained model.
    pub(crate) fn new(forest: RegressionForest, metrics: Metrics) -> Self {
        Self { forest, metrics }
    }

    /// Borrow the fitted forest.
    #[must_use]
    pub fn forest(&self) -> &RegressionForest {
        &self.forest
    }

    /// Return the in-sample fit metrics.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Consume the result and return the fitted forest.
    #[must_use]
    pub fn into_forest(self) -> RegressionForest {
        self.forest
    }
}
