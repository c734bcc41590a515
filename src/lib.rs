//! Library exports for reuse in the binary and integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// TOML application configuration.
pub mod config;
/// Interaction controller contract and console frontend.
pub mod controller;
/// Background prediction/training engine.
pub mod engine;
/// Logging setup.
pub mod logging;
/// Trainable classifiers.
pub mod ml;
/// Sensor sampling boundary.
pub mod sensor;
/// Dataset persistence.
pub mod store;
/// Core weather domain types.
pub mod weather;
