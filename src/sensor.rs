//! Sensor sampling boundary.
//!
//! The engine only needs a function-shaped collaborator that yields one
//! fixed-arity sample per call. The Sense HAT variant lives outside this
//! crate; the simulated sensor below keeps the binary and the tests
//! runnable on any machine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::weather::FeatureVector;

/// Errors raised while reading a sample.
#[derive(Debug, Error)]
pub enum SensorError {
    /// The underlying device failed to produce a reading.
    #[error("Sensor read failed: {0}")]
    Read(String),
}

/// Source of sensor samples consumed by the interaction loop.
pub trait Sensor {
    /// Take one sample: pressure temperature, humidity temperature,
    /// relative humidity, pressure.
    fn sample(&mut self) -> Result<FeatureVector, SensorError>;
}

/// Jittered readings around a plausible indoor baseline.
#[derive(Debug)]
pub struct SimulatedSensor {
    rng: StdRng,
    baseline: FeatureVector,
}

impl SimulatedSensor {
    /// Simulate a sensor near the given baseline reading.
    pub fn new(baseline: FeatureVector) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            baseline,
        }
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new(FeatureVector::new([21.0, 20.5, 45.0, 1013.0]))
    }
}

impl Sensor for SimulatedSensor {
    fn sample(&mut self) -> Result<FeatureVector, SensorError> {
        let base = self.baseline.values();
        Ok(FeatureVector::new([
            base[0] + self.rng.random_range(-0.5_f32..=0.5_f32),
            base[1] + self.rng.random_range(-0.5_f32..=0.5_f32),
            (base[2] + self.rng.random_range(-2.0_f32..=2.0_f32)).clamp(0.0, 100.0),
            base[3] + self.rng.random_range(-1.0_f32..=1.0_f32),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_samples_stay_near_the_baseline() {
        let mut sensor = SimulatedSensor::default();
        for _ in 0..32 {
            let sample = sensor.sample().unwrap();
            let values = sample.values();
            let base = [21.0, 20.5, 45.0, 1013.0];
            assert!((values[0] - base[0]).abs() <= 0.5);
            assert!((values[1] - base[1]).abs() <= 0.5);
            assert!((values[2] - base[2]).abs() <= 2.0);
            assert!((values[3] - base[3]).abs() <= 1.0);
            assert!(values.iter().all(|v| v.is_finite()));
        }
    }
}
