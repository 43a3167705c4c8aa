//! CSV dataset access and result artifacts for spinney.
//!
//! Provides validated CSV readers for labeled training sets and
//! unlabeled feature sets, plus a writer that lays out model, prediction,
//! and metric artifacts in an output directory.

mod domain;
mod error;
mod feature_reader;
mod reader;
mod writer;

pub use domain::{FeatureDataset, ModelName, TabularDataset};
pub use error::IoError;
pub use feature_reader::FeatureReader;
pub use reader::TrainingSetReader;
pub use writer::ResultWriter;
