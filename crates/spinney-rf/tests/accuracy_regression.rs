//! Accuracy regression tests for spinney-rf.
//!
//! These tests verify that algorithmic changes do not degrade regression
//! forest fit quality on a deterministic synthetic dataset.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use spinney_rf::{ForestConfig, evaluate};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic regression dataset
// ---------------------------------------------------------------------------

/// Generate a 300-sample, 8-feature regression dataset.
///
/// The target is `3*f0 + 2*f1 - f2` plus noise in [0, 0.5].
/// Features 3-7 are pure noise in [0, 1].
fn make_regression() -> (Vec<Vec<f64>>, Vec<f64>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let n_samples = 300;
    let n_features = 8;

    let mut features = Vec::with_capacity(n_samples);
    let mut targets = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let row: Vec<f64> = (0..n_features).map(|_| rng.r#gen::<f64>() * 10.0).collect();
        let target =
            3.0 * row[0] + 2.0 * row[1] - row[2] + rng.r#gen::<f64>() * 0.5;
        features.push(row);
        targets.push(target);
    }
    let names: Vec<String> = (0..n_features).map(|f| format!("f{f}")).collect();
    (features, targets, names)
}

// ---------------------------------------------------------------------------
// a) in_sample_r2_above_threshold
// ---------------------------------------------------------------------------

/// In-sample R² with 100 trees must exceed 0.85 on the synthetic dataset.
#[test]
fn in_sample_r2_above_threshold() {
    let (features, targets, names) = make_regression();
    let model = ForestConfig::new()
        .with_n_trees(100)
        .with_seed(42)
        .fit(&features, &targets, &names)
        .unwrap();

    let r2 = model.metrics().r2;
    assert!(r2 > 0.85, "in-sample r2 {r2} <= 0.85");
}

// ---------------------------------------------------------------------------
// b) in_sample_mae_below_threshold
// ---------------------------------------------------------------------------

/// In-sample MAE with 100 trees must stay well below the target spread.
///
/// The target ranges over roughly [-10, 50]; a fitted forest should sit
/// far inside that.
#[test]
fn in_sample_mae_below_threshold() {
    let (features, targets, names) = make_regression();
    let model = ForestConfig::new()
        .with_n_trees(100)
        .with_seed(42)
        .fit(&features, &targets, &names)
        .unwrap();

    let mae = model.metrics().mae;
    assert!(mae < 5.0, "in-sample mae {mae} >= 5.0");
}

// ---------------------------------------------------------------------------
// c) deterministic_predictions
// ---------------------------------------------------------------------------

/// Same config and seed must produce identical predictions across two
/// independent runs.
#[test]
fn deterministic_predictions() {
    let (features, targets, names) = make_regression();
    let cfg = ForestConfig::new().with_n_trees(50).with_seed(42);

    let model1 = cfg.fit(&features, &targets, &names).unwrap();
    let model2 = cfg.fit(&features, &targets, &names).unwrap();

    let preds1 = model1.forest().predict_batch(&features).unwrap();
    let preds2 = model2.forest().predict_batch(&features).unwrap();
    assert_eq!(preds1, preds2, "predictions differ across runs with the same seed");
}

// ---------------------------------------------------------------------------
// d) intervals_bracket_most_training_targets
// ---------------------------------------------------------------------------

/// The 10th/90th-percentile vote spread should be ordered on every row
/// and should contain the training target for a reasonable share of rows.
///
/// The interval is an ensemble-dispersion heuristic, not a calibrated
/// 80% interval, so the containment bar is deliberately loose.
#[test]
fn intervals_bracket_most_training_targets() {
    let (features, targets, names) = make_regression();
    let model = ForestConfig::new()
        .with_n_trees(100)
        .with_seed(42)
        .fit(&features, &targets, &names)
        .unwrap();

    let preds = model.forest().predict_batch(&features).unwrap();
    let mut covered = 0usize;
    for (pred, &target) in preds.iter().zip(&targets) {
        assert!(pred.lower <= pred.upper);
        if target >= pred.lower && target <= pred.upper {
            covered += 1;
        }
    }
    let coverage = covered as f64 / targets.len() as f64;
    assert!(coverage > 0.3, "interval coverage {coverage} <= 0.3");
}

// ---------------------------------------------------------------------------
// e) evaluate_consistent_with_training_metrics
// ---------------------------------------------------------------------------

/// Re-running `evaluate` on the training set must reproduce the metrics
/// stored at training time.
#[test]
fn evaluate_consistent_with_training_metrics() {
    let (features, targets, names) = make_regression();
    let model = ForestConfig::new()
        .with_n_trees(50)
        .with_seed(42)
        .fit(&features, &targets, &names)
        .unwrap();

    let preds = model.forest().predict_batch(&features).unwrap();
    let means: Vec<f64> = preds.iter().map(|p| p.mean).collect();
    let fit = evaluate(&targets, &means).unwrap();

    assert!((fit.r2 - model.metrics().r2).abs() < 1e-12);
    assert!((fit.mae - model.metrics().mae).abs() < 1e-12);
}
