//! Trained boosted-stump model and scoring.

use crate::weather::{FeatureVector, Label};

/// One logit slot per label.
pub(super) const NUM_LABELS: usize = Label::CANONICAL.len();

/// Single-split weak learner over one feature.
#[derive(Debug, Clone)]
pub struct Stump {
    /// Index into the feature vector used for the split.
    pub feature_index: usize,
    /// Split threshold in feature units.
    pub threshold: f32,
    /// Response for `feature <= threshold`.
    pub left_value: f32,
    /// Response for `feature > threshold`.
    pub right_value: f32,
}

impl Stump {
    /// Response of this stump for one sample.
    pub fn response(&self, vector: &FeatureVector) -> f32 {
        if vector.values()[self.feature_index] <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// Gradient-boosted stump ensemble over the three weather labels.
#[derive(Debug, Clone)]
pub struct StumpModel {
    /// Learning rate applied to each stump response.
    pub learning_rate: f32,
    /// Initial logits from the class priors, canonical label order.
    pub init_raw: [f32; NUM_LABELS],
    /// One stump per label per boosting round.
    pub rounds: Vec<[Stump; NUM_LABELS]>,
}

impl StumpModel {
    /// Raw per-label logits for one sample.
    pub fn raw_scores(&self, vector: &FeatureVector) -> [f32; NUM_LABELS] {
        let mut raw = self.init_raw;
        for round in &self.rounds {
            for (slot, stump) in raw.iter_mut().zip(round.iter()) {
                *slot += self.learning_rate * stump.response(vector);
            }
        }
        raw
    }

    /// Per-label probabilities for one sample.
    pub fn proba(&self, vector: &FeatureVector) -> [f32; NUM_LABELS] {
        softmax(self.raw_scores(vector))
    }

    /// Most likely label; ties resolve to the earliest canonical label.
    pub fn predict(&self, vector: &FeatureVector) -> Label {
        best_label(&self.raw_scores(vector))
    }
}

/// Numerically-stable softmax over the fixed logit slots.
pub fn softmax(raw: [f32; NUM_LABELS]) -> [f32; NUM_LABELS] {
    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut exps = raw.map(|v| (v - max).exp());
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 {
        return [1.0 / NUM_LABELS as f32; NUM_LABELS];
    }
    for v in &mut exps {
        *v /= sum;
    }
    exps
}

fn best_label(scores: &[f32; NUM_LABELS]) -> Label {
    let mut best = Label::CANONICAL[0];
    let mut best_score = scores[0];
    for (label, &score) in Label::CANONICAL.into_iter().zip(scores.iter()).skip(1) {
        if score > best_score {
            best_score = score;
            best = label;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stump_response_branches_on_threshold() {
        let stump = Stump {
            feature_index: 2,
            threshold: 50.0,
            left_value: -1.0,
            right_value: 2.0,
        };
        assert_eq!(
            stump.response(&FeatureVector::new([0.0, 0.0, 50.0, 0.0])),
            -1.0
        );
        assert_eq!(
            stump.response(&FeatureVector::new([0.0, 0.0, 50.1, 0.0])),
            2.0
        );
    }

    #[test]
    fn tied_scores_fall_back_to_canonical_order() {
        assert_eq!(best_label(&[0.0, 0.0, 0.0]), Label::Sunny);
        assert_eq!(best_label(&[0.0, 1.0, 1.0]), Label::Cloudy);
        assert_eq!(best_label(&[-1.0, 0.0, 2.0]), Label::Rain);
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax([1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn model_with_no_rounds_predicts_the_prior() {
        let model = StumpModel {
            learning_rate: 0.1,
            init_raw: [-2.0, 0.5, -1.0],
            rounds: Vec::new(),
        };
        let vector = FeatureVector::new([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(model.predict(&vector), Label::Cloudy);
    }
}
