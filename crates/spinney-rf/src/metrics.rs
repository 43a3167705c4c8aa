//! Regression fit-quality statistics: R² and mean absolute error.

use crate::error::ForestError;

/// Fit-quality statistics for one set of true/predicted value pairs.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitMetrics {
    /// Coefficient of determination.
    pub r2: f64,
    /// Mean absolute error.
    pub mae: f64,
}

/// A fit-quality snapshot paired with the forest it describes.
///
/// Computed in-sample over the full training set at training time
/// (an in-sample fit measure, not a generalization estimate), and
/// persisted alongside the forest by the model store.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Metrics {
    /// Coefficient of determination on the training set.
    pub r2: f64,
    /// Mean absolute error on the training set.
    pub mae: f64,
    /// Number of training samples.
    pub n_samples: usize,
    /// Training timestamp, milliseconds since the Unix epoch.
    pub trained_at_ms: u64,
}

/// Compute R² and MAE over true/predicted value pairs.
///
/// `r2 = 1 - ss_res / ss_tot`. When every true value is identical
/// (`ss_tot == 0`) the statistic is undefined; this returns `r2 = 0.0`
/// instead of NaN.
///
/// # Errors
///
/// | Variant                                      | When                              |
/// |----------------------------------------------|-----------------------------------|
/// | [`ForestError::EmptyEvaluation`]             | zero value pairs                  |
/// | [`ForestError::EvaluationLengthMismatch`]    | vector lengths differ             |
pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Result<FitMetrics, ForestError> {
    if y_true.is_empty() {
        return Err(ForestError::EmptyEvaluation);
    }
    if y_true.len() != y_pred.len() {
        return Err(ForestError::EvaluationLengthMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }

    Ok(FitMetrics {
        r2: r_squared(y_true, y_pred),
        mae: mean_absolute_error(y_true, y_pred),
    })
}

fn r_squared(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    let mean_y = y_true.iter().sum::<f64>() / n;
    let ss_tot: f64 = y_true.iter().map(|&y| (y - mean_y) * (y - mean_y)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(&y, &p)| (y - p) * (y - p))
        .sum();
    1.0 - ss_res / ss_tot
}

fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let sum: f64 = y_true.iter().zip(y_pred).map(|(&y, &p)| (y - p).abs()).sum();
    sum / y_true.len() as f64
}
