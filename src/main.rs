use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use spinney_io::{FeatureReader, ModelName, ResultWriter, TrainingSetReader};
use spinney_rf::{ForestConfig, TrainedModel, evaluate};

#[derive(Parser)]
#[command(name = "spinney")]
#[command(about = "Regression forest training and interval prediction on tabular CSV data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared tuning parameters for forest training.
#[derive(Args, Debug, Clone)]
struct TuningArgs {
    /// Number of trees in the ensemble
    #[arg(long, default_value_t = 200)]
    n_trees: usize,

    /// Maximum tree depth (root is depth 0)
    #[arg(long, default_value_t = 15)]
    max_depth: usize,

    /// Minimum number of samples required to attempt a split
    #[arg(long, default_value_t = 5)]
    min_samples_split: usize,

    /// Fraction of features considered at each split
    #[arg(long, default_value_t = 0.7)]
    feature_ratio: f64,

    /// Maximum number of distinct threshold candidates per feature
    #[arg(long, default_value_t = 20)]
    threshold_cap: usize,

    /// Lower percentile for interval bounds
    #[arg(long, default_value_t = 0.1)]
    lower_percentile: f64,

    /// Upper percentile for interval bounds
    #[arg(long, default_value_t = 0.9)]
    upper_percentile: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Train a regression forest on a labeled CSV dataset
    Train {
        /// Path to the training CSV file
        #[arg(long)]
        data: PathBuf,

        /// Name of the target column in the CSV header
        #[arg(long)]
        target: String,

        /// Model name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        name: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Predict values and intervals for an unlabeled CSV dataset
    Predict {
        /// Path to the trained model binary
        #[arg(long)]
        model: PathBuf,

        /// Path to the feature CSV file (all columns are features)
        #[arg(long)]
        data: PathBuf,

        /// Model name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        name: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Score a trained model against a labeled CSV dataset
    Evaluate {
        /// Path to the trained model binary
        #[arg(long)]
        model: PathBuf,

        /// Path to the evaluation CSV file
        #[arg(long)]
        data: PathBuf,

        /// Name of the target column in the CSV header
        #[arg(long)]
        target: String,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct TrainOutput {
    name: String,
    n_samples: usize,
    n_features: usize,
    n_trees: usize,
    r2: f64,
    mae: f64,
    model_path: PathBuf,
}

#[derive(Serialize)]
struct PredictOutput {
    name: String,
    n_samples: usize,
    model_n_trees: usize,
    model_n_features: usize,
    predictions_path: PathBuf,
}

#[derive(Serialize)]
struct EvaluateOutput {
    n_samples: usize,
    model_n_trees: usize,
    r2: f64,
    mae: f64,
}

fn build_config(tuning: &TuningArgs, seed: u64) -> ForestConfig {
    ForestConfig::new()
        .with_n_trees(tuning.n_trees)
        .with_max_depth(tuning.max_depth)
        .with_min_samples_split(tuning.min_samples_split)
        .with_feature_subsample_ratio(tuning.feature_ratio)
        .with_threshold_candidate_cap(tuning.threshold_cap)
        .with_percentiles(tuning.lower_percentile, tuning.upper_percentile)
        .with_seed(seed)
}

fn check_feature_names(model_names: &[String], data_names: &[String]) -> Result<()> {
    if model_names != data_names {
        anyhow::bail!(
            "feature columns do not match the model: model expects [{}], data has [{}]",
            model_names.join(", "),
            data_names.join(", ")
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Train {
            data,
            target,
            name,
            output_dir,
            tuning,
        } => {
            let model_name = ModelName::new(name.clone())?;

            // Read dataset
            let dataset = TrainingSetReader::new(&data, &target)
                .read()
                .context("failed to read training CSV")?;
            info!(
                n_samples = dataset.n_samples(),
                n_features = dataset.n_features(),
                "dataset loaded"
            );

            // Train with progress logging between tree batches
            let config = build_config(&tuning, cli.seed);
            let model = config
                .fit_with_observer(
                    dataset.features(),
                    dataset.targets(),
                    dataset.feature_names(),
                    &|progress| {
                        info!(
                            trees_built = progress.trees_built,
                            n_trees = progress.n_trees,
                            "training progress"
                        );
                    },
                    None,
                )
                .context("training failed")?;
            info!(
                r2 = model.metrics().r2,
                mae = model.metrics().mae,
                "training complete"
            );

            // Save model and metrics artifacts
            let writer = ResultWriter::new(&output_dir, model_name)?;
            model
                .save(writer.model_path())
                .context("failed to save model")?;
            info!(path = %writer.model_path().display(), "model saved");
            writer.write_metrics(model.metrics())?;

            // Print summary
            let output = TrainOutput {
                name,
                n_samples: dataset.n_samples(),
                n_features: dataset.n_features(),
                n_trees: model.forest().n_trees(),
                r2: model.metrics().r2,
                mae: model.metrics().mae,
                model_path: writer.model_path(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Predict {
            model,
            data,
            name,
            output_dir,
        } => {
            let model_name = ModelName::new(name.clone())?;

            // Load model
            let trained = TrainedModel::load(&model).context("failed to load model")?;
            let forest = trained.forest();
            info!(
                n_trees = forest.n_trees(),
                n_features = forest.n_features(),
                "model loaded"
            );

            // Read features
            let dataset = FeatureReader::new(&data)
                .read()
                .context("failed to read feature CSV")?;
            info!(n_samples = dataset.n_samples(), "features loaded");

            check_feature_names(forest.feature_names(), dataset.feature_names())?;

            // Predict
            let predictions = forest
                .predict_batch(dataset.features())
                .context("prediction failed")?;

            // Write predictions CSV
            let writer = ResultWriter::new(&output_dir, model_name)?;
            let predictions_path = writer.write_predictions(&predictions)?;

            // Print summary
            let output = PredictOutput {
                name,
                n_samples: dataset.n_samples(),
                model_n_trees: forest.n_trees(),
                model_n_features: forest.n_features(),
                predictions_path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Evaluate {
            model,
            data,
            target,
        } => {
            // Load model
            let trained = TrainedModel::load(&model).context("failed to load model")?;
            let forest = trained.forest();
            info!(
                n_trees = forest.n_trees(),
                n_features = forest.n_features(),
                "model loaded"
            );

            // Read labeled dataset
            let dataset = TrainingSetReader::new(&data, &target)
                .read()
                .context("failed to read evaluation CSV")?;
            info!(n_samples = dataset.n_samples(), "dataset loaded");

            check_feature_names(forest.feature_names(), dataset.feature_names())?;

            // Predict and score against the true targets
            let predictions = forest
                .predict_batch(dataset.features())
                .context("prediction failed")?;
            let means: Vec<f64> = predictions.iter().map(|p| p.mean).collect();
            let metrics = evaluate(dataset.targets(), &means).context("evaluation failed")?;
            info!(r2 = metrics.r2, mae = metrics.mae, "evaluation complete");

            // Print summary
            let output = EvaluateOutput {
                n_samples: dataset.n_samples(),
                model_n_trees: forest.n_trees(),
                r2: metrics.r2,
                mae: metrics.mae,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
