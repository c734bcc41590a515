//! Evaluation helpers for weather classifiers.

use crate::weather::Label;

/// Fraction of `(truth, predicted)` pairs that agree. Empty input is 0.
pub fn accuracy(pairs: &[(Label, Label)]) -> f32 {
    if pairs.is_empty() {
        return 0.0;
    }
    let correct = pairs
        .iter()
        .filter(|(truth, predicted)| truth == predicted)
        .count();
    correct as f32 / pairs.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_matches() {
        let pairs = [
            (Label::Sunny, Label::Sunny),
            (Label::Rain, Label::Cloudy),
            (Label::Rain, Label::Rain),
            (Label::Cloudy, Label::Cloudy),
        ];
        assert!((accuracy(&pairs) - 0.75).abs() < f32::EPSILON);
        assert_eq!(accuracy(&[]), 0.0);
    }
}
