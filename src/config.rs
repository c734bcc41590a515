//! TOML application configuration for the prediction engine.
//!
//! Lives at `.weathersense/weathersense.toml`. Every field has a default,
//! so a missing file or a sparse one both work; a file that fails to parse
//! is reported and replaced by the defaults rather than aborting startup.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::app_dirs::{self, AppDirError};
use crate::engine::EngineConfig;

/// Default filename of the app configuration.
pub const CONFIG_FILE_NAME: &str = "weathersense.toml";
/// Default filename of the persisted training dataset.
pub const DATA_FILE_NAME: &str = "training_data.csv";

/// User-tunable settings, all optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Retrain only while the dataset is strictly larger than this.
    pub training_size_threshold: usize,
    /// Seconds between published predictions.
    pub prediction_interval_secs: u64,
    /// Seconds the worker waits for one correction per cycle.
    pub correction_poll_timeout_secs: u64,
    /// Milliseconds the caller waits for a prediction reply.
    pub prediction_reply_timeout_millis: u64,
    /// Milliseconds the worker sleeps between cycles.
    pub idle_pause_millis: u64,
    /// Explicit dataset file; defaults to the app data directory.
    pub data_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            training_size_threshold: 20,
            prediction_interval_secs: 60 * 60,
            correction_poll_timeout_secs: 5,
            prediction_reply_timeout_millis: 1000,
            idle_pause_millis: 100,
            data_file: None,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load the config file from the app directory, falling back to the
    /// defaults when it is missing or unreadable.
    pub fn load_or_default() -> Self {
        let path = match app_dirs::app_root_dir() {
            Ok(root) => root.join(CONFIG_FILE_NAME),
            Err(err) => {
                tracing::warn!("Using default config, no app directory: {err}");
                return Self::default();
            }
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                tracing::warn!("Using default config, {} unreadable: {err}", path.display());
                return Self::default();
            }
        };
        match Self::from_toml(&text) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Using default config, {} invalid: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Engine parameters derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            training_size_threshold: self.training_size_threshold,
            prediction_interval: Duration::from_secs(self.prediction_interval_secs),
            correction_poll_timeout: Duration::from_secs(self.correction_poll_timeout_secs),
            prediction_reply_timeout: Duration::from_millis(self.prediction_reply_timeout_millis),
            idle_pause: Duration::from_millis(self.idle_pause_millis),
            ..EngineConfig::default()
        }
    }

    /// Where the training dataset lives.
    pub fn data_path(&self) -> Result<PathBuf, AppDirError> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dirs::data_dir()?.join(DATA_FILE_NAME)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_toml_fills_in_defaults() {
        let config = AppConfig::from_toml("training_size_threshold = 5\n").unwrap();
        assert_eq!(config.training_size_threshold, 5);
        assert_eq!(config.prediction_interval_secs, 3600);
        assert_eq!(config.data_file, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::from_toml("not_a_setting = true\n").is_err());
    }

    #[test]
    fn engine_config_maps_units() {
        let config = AppConfig::from_toml(
            "prediction_interval_secs = 10\nprediction_reply_timeout_millis = 250\n",
        )
        .unwrap();
        let engine = config.engine_config();
        assert_eq!(engine.prediction_interval, Duration::from_secs(10));
        assert_eq!(engine.prediction_reply_timeout, Duration::from_millis(250));
        assert_eq!(engine.training_size_threshold, 20);
    }

    #[test]
    fn explicit_data_file_wins() {
        let config = AppConfig {
            data_file: Some(PathBuf::from("/tmp/custom.csv")),
            ..AppConfig::default()
        };
        assert_eq!(config.data_path().unwrap(), PathBuf::from("/tmp/custom.csv"));
    }

    #[test]
    fn default_data_path_lands_in_the_data_dir() {
        let base = tempfile::tempdir().unwrap();
        let _guard = crate::app_dirs::OverrideGuard::set(base.path().to_path_buf());
        let path = AppConfig::default().data_path().unwrap();
        assert!(path.ends_with(format!("data/{DATA_FILE_NAME}")));
    }
}
