//! Softmax gradient boosting for the stump ensemble.

use super::model::{NUM_LABELS, Stump, StumpModel, softmax};
use crate::ml::ClassifierError;
use crate::weather::{FEATURE_LEN, TrainingExample};

/// Training hyperparameters for stump boosting.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Number of boosting rounds.
    pub rounds: usize,
    /// Learning rate applied per round.
    pub learning_rate: f32,
    /// Number of bins used for split search.
    pub bins: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            rounds: 60,
            learning_rate: 0.1,
            bins: 16,
        }
    }
}

/// Train a stump ensemble on the accumulated corrections.
///
/// The label set is fixed, so datasets where some labels never occur train
/// fine; their priors bottom out at a small floor instead of dropping the
/// class.
pub fn train_stumps(
    examples: &[TrainingExample],
    options: &TrainOptions,
) -> Result<StumpModel, ClassifierError> {
    if examples.is_empty() {
        return Err(ClassifierError::EmptyDataset);
    }
    let bins = options.bins.clamp(2, 256);
    let ranges = feature_ranges(examples);
    let binned = bin_examples(examples, &ranges, bins);

    let init_raw = prior_logits(examples);
    let mut raw = vec![init_raw; examples.len()];

    let mut rounds = Vec::with_capacity(options.rounds);
    for _ in 0..options.rounds {
        let residuals = residuals_per_label(examples, &raw);
        let round: [Stump; NUM_LABELS] = std::array::from_fn(|class_idx| {
            fit_best_stump(examples, &binned, &ranges, bins, &residuals[class_idx])
        });
        for (sample_raw, example) in raw.iter_mut().zip(examples) {
            for (slot, stump) in sample_raw.iter_mut().zip(round.iter()) {
                *slot += options.learning_rate * stump.response(&example.vector);
            }
        }
        rounds.push(round);
    }

    Ok(StumpModel {
        learning_rate: options.learning_rate,
        init_raw,
        rounds,
    })
}

fn prior_logits(examples: &[TrainingExample]) -> [f32; NUM_LABELS] {
    let mut counts = [0usize; NUM_LABELS];
    for example in examples {
        counts[example.label.class_index()] += 1;
    }
    let total = examples.len() as f32;
    counts.map(|count| ((count as f32 / total).max(1e-6)).ln())
}

fn residuals_per_label(
    examples: &[TrainingExample],
    raw: &[[f32; NUM_LABELS]],
) -> [Vec<f32>; NUM_LABELS] {
    let mut out: [Vec<f32>; NUM_LABELS] = std::array::from_fn(|_| vec![0.0; examples.len()]);
    for (i, (example, sample_raw)) in examples.iter().zip(raw).enumerate() {
        let probs = softmax(*sample_raw);
        let truth = example.label.class_index();
        for (class_idx, residuals) in out.iter_mut().enumerate() {
            let target = if class_idx == truth { 1.0 } else { 0.0 };
            residuals[i] = target - probs[class_idx];
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct FeatureRange {
    min: f32,
    max: f32,
}

fn feature_ranges(examples: &[TrainingExample]) -> [FeatureRange; FEATURE_LEN] {
    let mut ranges = [FeatureRange {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    }; FEATURE_LEN];
    for example in examples {
        for (range, &value) in ranges.iter_mut().zip(example.vector.values()) {
            if value.is_finite() {
                range.min = range.min.min(value);
                range.max = range.max.max(value);
            }
        }
    }
    for range in &mut ranges {
        if !range.min.is_finite() || !range.max.is_finite() {
            range.min = 0.0;
            range.max = 0.0;
        }
        if range.min == range.max {
            range.max = range.min + 1.0;
        }
    }
    ranges
}

fn bin_examples(
    examples: &[TrainingExample],
    ranges: &[FeatureRange; FEATURE_LEN],
    bins: usize,
) -> Vec<[u8; FEATURE_LEN]> {
    let top = (bins - 1) as f32;
    examples
        .iter()
        .map(|example| {
            let mut row = [0u8; FEATURE_LEN];
            for ((slot, &value), range) in row
                .iter_mut()
                .zip(example.vector.values())
                .zip(ranges.iter())
            {
                let t = ((value - range.min) / (range.max - range.min)).clamp(0.0, 1.0);
                *slot = (t * top).round() as u8;
            }
            row
        })
        .collect()
}

fn fit_best_stump(
    examples: &[TrainingExample],
    binned: &[[u8; FEATURE_LEN]],
    ranges: &[FeatureRange; FEATURE_LEN],
    bins: usize,
    residuals: &[f32],
) -> Stump {
    let mut best = BestSplit::default();
    for feature_index in 0..FEATURE_LEN {
        let split = best_split_for_feature(binned, residuals, feature_index, bins);
        if split.score < best.score {
            best = split;
        }
    }
    let threshold = threshold_for_bin(ranges[best.feature_index], best.split_bin, bins);
    let (left_value, right_value) =
        leaf_means(examples, residuals, best.feature_index, threshold);
    Stump {
        feature_index: best.feature_index,
        threshold,
        left_value,
        right_value,
    }
}

#[derive(Debug, Clone)]
struct BestSplit {
    score: f64,
    feature_index: usize,
    split_bin: usize,
}

impl Default for BestSplit {
    fn default() -> Self {
        Self {
            score: f64::INFINITY,
            feature_index: 0,
            split_bin: 0,
        }
    }
}

fn best_split_for_feature(
    binned: &[[u8; FEATURE_LEN]],
    residuals: &[f32],
    feature_index: usize,
    bins: usize,
) -> BestSplit {
    let mut counts = vec![0u32; bins];
    let mut sums = vec![0f64; bins];
    let mut sums_sq = vec![0f64; bins];
    for (row, &residual) in binned.iter().zip(residuals) {
        let bin = row[feature_index] as usize;
        let r = residual as f64;
        counts[bin] += 1;
        sums[bin] += r;
        sums_sq[bin] += r * r;
    }
    let total_count: u32 = counts.iter().sum();
    let total_sum: f64 = sums.iter().sum();
    let total_sum_sq: f64 = sums_sq.iter().sum();

    let mut best = BestSplit {
        feature_index,
        ..BestSplit::default()
    };
    let mut left_count = 0u32;
    let mut left_sum = 0f64;
    let mut left_sum_sq = 0f64;
    for split_bin in 0..bins.saturating_sub(1) {
        left_count += counts[split_bin];
        left_sum += sums[split_bin];
        left_sum_sq += sums_sq[split_bin];
        let right_count = total_count - left_count;
        if left_count == 0 || right_count == 0 {
            continue;
        }
        let right_sum = total_sum - left_sum;
        let right_sum_sq = total_sum_sq - left_sum_sq;
        let left_sse = left_sum_sq - (left_sum * left_sum) / f64::from(left_count);
        let right_sse = right_sum_sq - (right_sum * right_sum) / f64::from(right_count);
        let score = left_sse + right_sse;
        if score < best.score {
            best.score = score;
            best.split_bin = split_bin;
        }
    }
    best
}

fn threshold_for_bin(range: FeatureRange, split_bin: usize, bins: usize) -> f32 {
    let t = (split_bin + 1) as f32 / bins as f32;
    range.min + t * (range.max - range.min)
}

fn leaf_means(
    examples: &[TrainingExample],
    residuals: &[f32],
    feature_index: usize,
    threshold: f32,
) -> (f32, f32) {
    let mut left_sum = 0.0f32;
    let mut left_count = 0u32;
    let mut right_sum = 0.0f32;
    let mut right_count = 0u32;
    for (example, &residual) in examples.iter().zip(residuals) {
        if example.vector.values()[feature_index] <= threshold {
            left_sum += residual;
            left_count += 1;
        } else {
            right_sum += residual;
            right_count += 1;
        }
    }
    let left_mean = if left_count == 0 {
        0.0
    } else {
        left_sum / left_count as f32
    };
    let right_mean = if right_count == 0 {
        0.0
    } else {
        right_sum / right_count as f32
    };
    (left_mean, right_mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::metrics::accuracy;
    use crate::weather::{FeatureVector, Label};

    fn example(values: [f32; FEATURE_LEN], label: Label) -> TrainingExample {
        TrainingExample::new(FeatureVector::new(values), label)
    }

    fn weather_corpus() -> Vec<TrainingExample> {
        vec![
            example([26.0, 25.0, 25.0, 1028.0], Label::Sunny),
            example([27.5, 26.0, 22.0, 1031.0], Label::Sunny),
            example([24.0, 23.5, 28.0, 1026.0], Label::Sunny),
            example([25.0, 24.0, 30.0, 1029.0], Label::Sunny),
            example([17.0, 16.0, 60.0, 1012.0], Label::Cloudy),
            example([16.0, 15.5, 58.0, 1010.0], Label::Cloudy),
            example([18.0, 17.0, 64.0, 1013.0], Label::Cloudy),
            example([15.5, 15.0, 62.0, 1011.0], Label::Cloudy),
            example([11.0, 10.5, 92.0, 995.0], Label::Rain),
            example([10.0, 9.5, 95.0, 992.0], Label::Rain),
            example([12.0, 11.0, 90.0, 997.0], Label::Rain),
            example([9.0, 8.5, 96.0, 990.0], Label::Rain),
        ]
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let result = train_stumps(&[], &TrainOptions::default());
        assert!(matches!(result, Err(ClassifierError::EmptyDataset)));
    }

    #[test]
    fn separable_corpus_fits_the_training_set() {
        let corpus = weather_corpus();
        let model = train_stumps(&corpus, &TrainOptions::default()).unwrap();
        let pairs: Vec<(Label, Label)> = corpus
            .iter()
            .map(|ex| (ex.label, model.predict(&ex.vector)))
            .collect();
        assert!(accuracy(&pairs) >= 0.9, "training accuracy too low");
    }

    #[test]
    fn single_label_dataset_predicts_that_label() {
        let corpus: Vec<TrainingExample> = (0..21)
            .map(|i| example([10.0 + i as f32, 10.5, 45.0, 1012.0], Label::Rain))
            .collect();
        let model = train_stumps(&corpus, &TrainOptions::default()).unwrap();
        let vector = FeatureVector::new([30.0, 12.0, 50.0, 1000.0]);
        assert_eq!(model.predict(&vector), Label::Rain);
    }

    #[test]
    fn single_example_trains() {
        let corpus = vec![example([10.0, 10.5, 45.0, 1012.0], Label::Cloudy)];
        let model = train_stumps(&corpus, &TrainOptions::default()).unwrap();
        assert_eq!(model.predict(&corpus[0].vector), Label::Cloudy);
    }
}
