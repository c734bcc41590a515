//! Gradient-boosted decision stumps over the fixed weather feature space.
//!
//! The bundled classifier behind the engine's [`Classifier`] seam. Small
//! datasets and single-label datasets both train cleanly: class priors seed
//! the initial logits, so a dataset of only `Rain` corrections predicts
//! `Rain` before any stump fires.

mod model;
mod train;

pub use model::{Stump, StumpModel, softmax};
pub use train::{TrainOptions, train_stumps};

use super::{Classifier, ClassifierError};
use crate::weather::{FeatureVector, Label, TrainingExample};

/// Boosted-stump classifier satisfying the engine's [`Classifier`] contract.
#[derive(Debug, Clone)]
pub struct BoostedStumps {
    options: TrainOptions,
    model: Option<StumpModel>,
}

impl BoostedStumps {
    /// Create an untrained classifier with the given hyperparameters.
    pub fn new(options: TrainOptions) -> Self {
        Self {
            options,
            model: None,
        }
    }

    /// Borrow the trained model, if any fit succeeded yet.
    pub fn model(&self) -> Option<&StumpModel> {
        self.model.as_ref()
    }
}

impl Default for BoostedStumps {
    fn default() -> Self {
        Self::new(TrainOptions::default())
    }
}

impl Classifier for BoostedStumps {
    fn fit(&mut self, examples: &[TrainingExample]) -> Result<(), ClassifierError> {
        self.model = Some(train_stumps(examples, &self.options)?);
        Ok(())
    }

    fn predict(&self, vector: &FeatureVector) -> Result<Label, ClassifierError> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotTrained)?;
        Ok(model.predict(vector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::FeatureVector;

    #[test]
    fn predict_before_fit_is_an_error() {
        let classifier = BoostedStumps::default();
        let vector = FeatureVector::new([10.0, 10.5, 45.0, 1012.0]);
        assert!(matches!(
            classifier.predict(&vector),
            Err(ClassifierError::NotTrained)
        ));
    }

    #[test]
    fn fit_then_predict_returns_a_label() {
        let mut classifier = BoostedStumps::default();
        let examples = vec![
            TrainingExample::new(FeatureVector::new([25.0, 24.0, 30.0, 1025.0]), Label::Sunny),
            TrainingExample::new(FeatureVector::new([12.0, 11.0, 90.0, 990.0]), Label::Rain),
        ];
        classifier.fit(&examples).unwrap();
        assert!(classifier.model().is_some());
        let vector = FeatureVector::new([24.0, 23.0, 35.0, 1024.0]);
        classifier.predict(&vector).unwrap();
    }
}
