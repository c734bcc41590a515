//! Trainable weather classifiers and evaluation helpers.

pub mod boosted_stumps;
pub mod metrics;

use thiserror::Error;

use crate::weather::{FeatureVector, Label, TrainingExample};

/// Errors a classifier may report to the engine.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// `fit` was called with no examples.
    #[error("Cannot train on an empty dataset")]
    EmptyDataset,
    /// `predict` was called before any successful `fit`.
    #[error("Classifier has not been trained yet")]
    NotTrained,
    /// Implementation-specific training or inference failure.
    #[error("Classifier failure: {0}")]
    Internal(String),
}

/// Contract the prediction engine expects from a trainable model.
///
/// `fit` replaces the trained state with a fresh fit over the full example
/// list; there is no incremental update. Any supervised multi-class
/// classifier over the fixed label set is substitutable, including datasets
/// where only one label occurs.
pub trait Classifier {
    /// Train from scratch on the accumulated examples.
    fn fit(&mut self, examples: &[TrainingExample]) -> Result<(), ClassifierError>;

    /// Predict the most likely label for one sample.
    fn predict(&self, vector: &FeatureVector) -> Result<Label, ClassifierError>;
}
