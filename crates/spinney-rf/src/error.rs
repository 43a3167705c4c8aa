use std::path::PathBuf;

/// Errors from regression forest operations.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when max_depth is zero.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid max_depth value provided.
        max_depth: usize,
    },

    /// Returned when min_samples_split is less than 2.
    #[error("min_samples_split must be at least 2, got {min_samples_split}")]
    InvalidMinSamplesSplit {
        /// The invalid min_samples_split value provided.
        min_samples_split: usize,
    },

    /// Returned when feature_subsample_ratio is not in (0.0, 1.0].
    #[error("feature_subsample_ratio must be in (0.0, 1.0], got {ratio}")]
    InvalidFeatureRatio {
        /// The invalid ratio provided.
        ratio: f64,
    },

    /// Returned when threshold_candidate_cap is zero.
    #[error("threshold_candidate_cap must be at least 1, got {cap}")]
    InvalidThresholdCap {
        /// The invalid cap provided.
        cap: usize,
    },

    /// Returned when the percentile pair is not ordered inside [0.0, 1.0].
    #[error("percentiles must satisfy 0.0 <= lower <= upper <= 1.0, got ({lower}, {upper})")]
    InvalidPercentiles {
        /// The lower percentile provided.
        lower: f64,
        /// The upper percentile provided.
        upper: f64,
    },

    /// Returned when the training dataset has zero samples.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// Returned when the training dataset has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a sample has a different number of features than expected.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the sample.
        got: usize,
        /// The zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when the target vector length differs from the sample count.
    #[error("got {got} targets for {expected} samples")]
    TargetCountMismatch {
        /// The number of samples.
        expected: usize,
        /// The number of targets provided.
        got: usize,
    },

    /// Returned when a training value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, column {column}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// Which column: a feature index, or the target.
        column: String,
    },

    /// Returned when prediction is invoked on a forest with no trees.
    #[error("model has no trained trees")]
    UntrainedModel,

    /// Returned when a sample has a different number of features at prediction time.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when training is cancelled between tree batches.
    #[error("training cancelled after {trees_built} of {n_trees} trees")]
    Cancelled {
        /// Trees completed before cancellation.
        trees_built: usize,
        /// Trees requested.
        n_trees: usize,
    },

    /// Returned when evaluate is given vectors of different lengths.
    #[error("evaluate got {got} predictions for {expected} true values")]
    EvaluationLengthMismatch {
        /// The number of true values.
        expected: usize,
        /// The number of predictions.
        got: usize,
    },

    /// Returned when evaluate is given zero value pairs.
    #[error("evaluate requires at least one value pair")]
    EmptyEvaluation,

    /// Returned when model serialization fails.
    #[error("failed to serialize model")]
    SerializeModel {
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when model deserialization fails.
    #[error("failed to deserialize model from {path}")]
    DeserializeModel {
        /// Path to the model file that could not be deserialized.
        path: PathBuf,
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when writing the model file fails.
    #[error("failed to write model to {path}")]
    WriteModel {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading the model file fails.
    #[error("failed to read model from {path}")]
    ReadModel {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when loading a model with an incompatible format version.
    #[error("incompatible model version in {path}: expected {expected}, found {found}")]
    IncompatibleModelVersion {
        /// The model format version this build expects.
        expected: u32,
        /// The model format version found in the file.
        found: u32,
        /// Path to the model file with the incompatible version.
        path: PathBuf,
    },
}
