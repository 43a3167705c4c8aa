//! Regression forest training and interval prediction.
//!
//! Provides a hand-rolled bootstrap-aggregated regression tree ensemble:
//! variance-reduction splitting with per-node feature subsampling,
//! quantile-based interval prediction from the ensemble vote spread,
//! in-sample R²/MAE fit metrics, parallel training via rayon, and
//! model serialization.

mod config;
mod error;
mod forest;
mod metrics;
mod node;
mod predict;
mod result;
mod sample;
mod serialize;
mod split;
mod tree;

pub use config::ForestConfig;
pub use error::ForestError;
pub use forest::RegressionForest;
pub use metrics::{FitMetrics, Metrics, evaluate};
pub use node::{FeatureIndex, Node, NodeIndex};
pub use predict::Prediction;
pub use result::{TrainedModel, TrainingProgress};
pub use sample::bootstrap_indices;
pub use tree::RegressionTree;
