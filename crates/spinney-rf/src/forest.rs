//! Regression forest training with parallel tree construction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::ForestConfig;
use crate::error::ForestError;
use crate::metrics::{self, Metrics};
use crate::result::{TrainedModel, TrainingProgress};
use crate::sample::bootstrap_indices;
use crate::tree::{GrowParams, RegressionTree, grow};

/// Trees built between progress/cancellation checks.
const PROGRESS_BATCH: usize = 10;

/// A fitted regression forest ensemble.
///
/// Immutable once trained; retraining produces a whole new forest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegressionForest {
    pub(crate) trees: Vec<RegressionTree>,
    pub(crate) n_features: usize,
    pub(crate) feature_names: Vec<String>,
    pub(crate) lower_percentile: f64,
    pub(crate) upper_percentile: f64,
}

/// Validate the training matrix and targets.
fn validate_data(
    features: &[Vec<f64>],
    targets: &[f64],
) -> Result<(usize, usize), ForestError> {
    if features.is_empty() {
        return Err(ForestError::EmptyDataset);
    }
    let n_samples = features.len();
    let n_features = features[0].len();
    if n_features == 0 {
        return Err(ForestError::ZeroFeatures);
    }
    if targets.len() != n_samples {
        return Err(ForestError::TargetCountMismatch {
            expected: n_samples,
            got: targets.len(),
        });
    }
    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(ForestError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        for (feature_index, &val) in row.iter().enumerate() {
            if !val.is_finite() {
                return Err(ForestError::NonFiniteValue {
                    sample_index,
                    column: feature_index.to_string(),
                });
            }
        }
    }
    for (sample_index, &val) in targets.iter().enumerate() {
        if !val.is_finite() {
            return Err(ForestError::NonFiniteValue {
                sample_index,
                column: "target".to_string(),
            });
        }
    }
    Ok((n_samples, n_features))
}

/// Milliseconds since the Unix epoch, for metrics provenance.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

/// Train the regression forest ensemble.
///
/// Trees are built in batches of [`PROGRESS_BATCH`]; each batch fans out
/// over rayon, and the optional progress callback and cancellation flag
/// are serviced between batches. Within a batch every tree reads only
/// the shared immutable dataset.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = features.len()))]
pub(crate) fn train(
    config: &ForestConfig,
    features: &[Vec<f64>],
    targets: &[f64],
    feature_names: &[String],
    on_progress: Option<&(dyn Fn(TrainingProgress) + Sync)>,
    cancel: Option<&AtomicBool>,
) -> Result<TrainedModel, ForestError> {
    config.validate()?;
    let (n_samples, n_features) = validate_data(features, targets)?;

    let n_candidate_features = (n_features as f64 * config.feature_subsample_ratio).ceil() as usize;
    let params = GrowParams {
        max_depth: config.max_depth,
        min_samples_split: config.min_samples_split,
        n_candidate_features,
        threshold_cap: config.threshold_candidate_cap,
    };

    info!(
        n_trees = config.n_trees,
        n_samples,
        n_features,
        n_candidate_features,
        "training regression forest"
    );

    // Convert to column-major layout once; every tree indexes into it.
    let col_features: Vec<Vec<f64>> = (0..n_features)
        .map(|feat_idx| features.iter().map(|row| row[feat_idx]).collect())
        .collect();

    // Generate per-tree seeds from the master RNG.
    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.r#gen()).collect();

    let mut trees: Vec<RegressionTree> = Vec::with_capacity(config.n_trees);
    for batch in tree_seeds.chunks(PROGRESS_BATCH) {
        if let Some(flag) = cancel
            && flag.load(Ordering::Relaxed)
        {
            return Err(ForestError::Cancelled {
                trees_built: trees.len(),
                n_trees: config.n_trees,
            });
        }

        let batch_trees: Vec<RegressionTree> = batch
            .par_iter()
            .map(|&seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let sample_indices = bootstrap_indices(n_samples, &mut rng);
                grow(&col_features, targets, &sample_indices, &params, &mut rng)
            })
            .collect();
        trees.extend(batch_trees);

        if let Some(report) = on_progress {
            report(TrainingProgress {
                trees_built: trees.len(),
                n_trees: config.n_trees,
            });
        }
    }

    debug!(n_trees_trained = trees.len(), "tree construction complete");

    let forest = RegressionForest {
        trees,
        n_features,
        feature_names: feature_names.to_vec(),
        lower_percentile: config.lower_percentile,
        upper_percentile: config.upper_percentile,
    };

    // In-sample fit quality over the full training set.
    let predictions = forest.predict_batch(features)?;
    let means: Vec<f64> = predictions.iter().map(|p| p.mean).collect();
    let fit = metrics::evaluate(targets, &means)?;
    let metrics = Metrics {
        r2: fit.r2,
        mae: fit.mae,
        n_samples,
        trained_at_ms: now_ms(),
    };

    info!(r2 = metrics.r2, mae = metrics.mae, "regression forest training complete");

    Ok(TrainedModel::new(forest, metrics))
}
