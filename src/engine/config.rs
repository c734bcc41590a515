//! Constructor-time tuning for the prediction engine.

use std::time::Duration;

/// Engine timing and training parameters, fixed at spawn time.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Retraining happens only while the dataset is strictly larger than
    /// this.
    pub training_size_threshold: usize,
    /// Spacing between published predictions, advanced deadline-to-deadline
    /// so the schedule does not drift.
    pub prediction_interval: Duration,
    /// Bounded wait for one correction per worker cycle. Dominates loop
    /// latency when idle; the system is paced by button presses, not
    /// throughput.
    pub correction_poll_timeout: Duration,
    /// Bounded wait the caller spends on a prediction reply.
    pub prediction_reply_timeout: Duration,
    /// Sleep between worker cycles.
    pub idle_pause: Duration,
    /// How often the blocking input wait re-checks the stop flag. Bounds
    /// shutdown latency, not the demand-driven semantics.
    pub input_poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            training_size_threshold: 20,
            prediction_interval: Duration::from_secs(60 * 60),
            correction_poll_timeout: Duration::from_secs(5),
            prediction_reply_timeout: Duration::from_secs(1),
            idle_pause: Duration::from_millis(100),
            input_poll_interval: Duration::from_millis(200),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_contract() {
        let config = EngineConfig::default();
        assert_eq!(config.training_size_threshold, 20);
        assert_eq!(config.prediction_interval, Duration::from_secs(3600));
        assert_eq!(config.correction_poll_timeout, Duration::from_secs(5));
        assert_eq!(config.prediction_reply_timeout, Duration::from_secs(1));
    }
}
