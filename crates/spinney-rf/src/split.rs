use rand::Rng;
use rand::seq::SliceRandom;

use crate::node::FeatureIndex;

/// Result of finding the best split for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitCandidate {
    /// Feature used for the split.
    pub(crate) feature: FeatureIndex,
    /// Threshold value: samples with feature <= threshold go left.
    pub(crate) threshold: f64,
    /// Sample indices going to the left child.
    pub(crate) left_indices: Vec<usize>,
    /// Sample indices going to the right child.
    pub(crate) right_indices: Vec<usize>,
}

/// Population variance (mean squared deviation, divisor = count) of the
/// targets selected by `sample_indices`.
///
/// Returns 0.0 for an empty selection.
#[must_use]
pub(crate) fn population_variance(targets: &[f64], sample_indices: &[usize]) -> f64 {
    let n = sample_indices.len();
    if n == 0 {
        return 0.0;
    }
    let mean = sample_indices.iter().map(|&si| targets[si]).sum::<f64>() / n as f64;
    sample_indices
        .iter()
        .map(|&si| {
            let d = targets[si] - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64
}

/// Find the best split among a random subset of features, scored by
/// variance reduction.
///
/// For each of `n_candidate_features` randomly chosen features, the
/// candidate thresholds are the distinct feature values occurring in the
/// node's data, randomly subsampled down to `threshold_cap` when there
/// are more. Each candidate partition (`value <= threshold` left, `>`
/// right) is scored by
///
/// ```text
/// parent_var - (n_left/n * var_left + n_right/n * var_right)
/// ```
///
/// with population variances throughout. Partitions with an empty side
/// are discarded. The candidate with the strictly greatest reduction
/// wins; ties go to the first one encountered, which is deterministic
/// for a fixed RNG seed.
///
/// Returns `None` when no valid partition exists (every candidate
/// feature is constant over the node's samples).
///
/// # Column-major layout
///
/// `features` is column-major: `features[feature_idx][sample_idx]`.
/// `sample_indices` index into the inner Vecs and may repeat (bootstrap
/// draws).
pub(crate) fn find_best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    sample_indices: &[usize],
    n_candidate_features: usize,
    threshold_cap: usize,
    rng: &mut impl Rng,
) -> Option<SplitCandidate> {
    let n_features = features.len();
    let n_samples = sample_indices.len();

    if n_samples == 0 || n_features == 0 {
        return None;
    }

    let parent_var = population_variance(targets, sample_indices);

    // Randomly shuffle feature indices and take up to n_candidate_features.
    // Partial Fisher-Yates: shuffle only the first `take` positions.
    let mut feature_order: Vec<usize> = (0..n_features).collect();
    let take = n_candidate_features.min(n_features);
    for i in 0..take {
        let j = rng.gen_range(i..n_features);
        feature_order.swap(i, j);
    }
    let selected_features = &feature_order[..take];

    let mut best_reduction = f64::NEG_INFINITY;
    let mut best: Option<(FeatureIndex, f64)> = None;

    for &feat_idx in selected_features {
        let feat_col = &features[feat_idx];

        // Distinct values in this node become the threshold candidates.
        let mut thresholds: Vec<f64> = sample_indices.iter().map(|&si| feat_col[si]).collect();
        thresholds.sort_unstable_by(|a, b| a.total_cmp(b));
        thresholds.dedup();
        if thresholds.len() > threshold_cap {
            thresholds.shuffle(rng);
            thresholds.truncate(threshold_cap);
        }

        for &threshold in &thresholds {
            // First pass: side sizes and sums.
            let mut n_left = 0usize;
            let mut sum_left = 0.0f64;
            let mut sum_right = 0.0f64;
            for &si in sample_indices {
                if feat_col[si] <= threshold {
                    n_left += 1;
                    sum_left += targets[si];
                } else {
                    sum_right += targets[si];
                }
            }
            let n_right = n_samples - n_left;
            if n_left == 0 || n_right == 0 {
                continue;
            }

            // Second pass: squared deviations per side.
            let mean_left = sum_left / n_left as f64;
            let mean_right = sum_right / n_right as f64;
            let mut ss_left = 0.0f64;
            let mut ss_right = 0.0f64;
            for &si in sample_indices {
                if feat_col[si] <= threshold {
                    let d = targets[si] - mean_left;
                    ss_left += d * d;
                } else {
                    let d = targets[si] - mean_right;
                    ss_right += d * d;
                }
            }
            let var_left = ss_left / n_left as f64;
            let var_right = ss_right / n_right as f64;

            let n = n_samples as f64;
            let weighted = (n_left as f64 / n) * var_left + (n_right as f64 / n) * var_right;
            let reduction = parent_var - weighted;

            if reduction > best_reduction {
                best_reduction = reduction;
                best = Some((FeatureIndex::new(feat_idx), threshold));
            }
        }
    }

    let (feature, threshold) = best?;

    // Partition sample_indices into left/right for the winning split.
    let feat_col = &features[feature.index()];
    let mut left_indices = Vec::with_capacity(n_samples / 2);
    let mut right_indices = Vec::with_capacity(n_samples / 2);
    for &si in sample_indices {
        if feat_col[si] <= threshold {
            left_indices.push(si);
        } else {
            right_indices.push(si);
        }
    }

    Some(SplitCandidate {
        feature,
        threshold,
        left_indices,
        right_indices,
    })
}
