//! Flat-file persistence for the accumulated training dataset.
//!
//! One line per example: the four feature values in fixed order, then the
//! label code, comma separated, no header. Every save rewrites the whole
//! file through a temp file plus rename, so a concurrent reader never sees
//! a partial write. A missing file is simply an empty dataset.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::weather::{FEATURE_LEN, FeatureVector, Label, TrainingExample, WeatherDataError};

/// Errors raised by dataset persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the dataset file.
    #[error("Failed to read training data from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write or atomically replace the dataset file.
    #[error("Failed to write training data to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A stored record did not parse back into a training example.
    #[error("Invalid training record at {path} line {line}: {message}")]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Load/save endpoint for the ordered training dataset.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the dataset file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full ordered dataset. A missing file is an empty dataset.
    pub fn load(&self) -> Result<Vec<TrainingExample>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };
        let reader = BufReader::new(file);
        let mut examples = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|err| StoreError::Read {
                path: self.path.clone(),
                source: err,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let example = parse_record(&line).map_err(|message| StoreError::InvalidRecord {
                path: self.path.clone(),
                line: idx + 1,
                message,
            })?;
            examples.push(example);
        }
        Ok(examples)
    }

    /// Replace the stored dataset with `examples`, in order.
    ///
    /// An empty dataset truncates the file rather than leaving stale records
    /// behind.
    pub fn save(&self, examples: &[TrainingExample]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|err| self.write_error(err))?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|err| self.write_error(err))?;
        for example in examples {
            writeln!(tmp, "{}", format_record(example)).map_err(|err| self.write_error(err))?;
        }
        tmp.persist(&self.path)
            .map_err(|err| self.write_error(err.error))?;
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

fn format_record(example: &TrainingExample) -> String {
    let v = example.vector.values();
    format!(
        "{},{},{},{},{}",
        v[0],
        v[1],
        v[2],
        v[3],
        example.label.code()
    )
}

fn parse_record(line: &str) -> Result<TrainingExample, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FEATURE_LEN + 1 {
        return Err(format!(
            "expected {} fields, got {}",
            FEATURE_LEN + 1,
            fields.len()
        ));
    }
    let mut values = [0.0f32; FEATURE_LEN];
    for (slot, field) in values.iter_mut().zip(&fields[..FEATURE_LEN]) {
        *slot = field
            .trim()
            .parse::<f32>()
            .map_err(|err| format!("bad feature value {field:?}: {err}"))?;
    }
    let code = fields[FEATURE_LEN]
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("bad label code {:?}: {err}", fields[FEATURE_LEN]))?;
    let label = Label::from_code(code).map_err(|err: WeatherDataError| err.to_string())?;
    Ok(TrainingExample::new(FeatureVector::new(values), label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_dataset() -> Vec<TrainingExample> {
        vec![
            TrainingExample::new(
                FeatureVector::new([10.0, 10.5, 45.0, 1012.0]),
                Label::Sunny,
            ),
            TrainingExample::new(FeatureVector::new([9.25, 9.0, 80.5, 998.75]), Label::Rain),
            TrainingExample::new(
                FeatureVector::new([-3.5, -4.0, 60.0, 1020.0]),
                Label::Cloudy,
            ),
        ]
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("absent.csv"));
        assert_eq!(store.load().unwrap(), Vec::new());
    }

    #[test]
    fn round_trip_preserves_order_and_values() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("data.csv"));
        let dataset = sample_dataset();
        store.save(&dataset).unwrap();
        assert_eq!(store.load().unwrap(), dataset);
    }

    #[test]
    fn empty_dataset_round_trips() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("data.csv"));
        store.save(&sample_dataset()).unwrap();
        store.save(&[]).unwrap();
        assert_eq!(store.load().unwrap(), Vec::new());
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("data.csv"));
        store.save(&sample_dataset()).unwrap();
        let shorter = sample_dataset()[..1].to_vec();
        store.save(&shorter).unwrap();
        assert_eq!(store.load().unwrap(), shorter);
    }

    #[test]
    fn malformed_records_are_reported_with_line_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "10,10.5,45,1012,2\nnot,a,valid,row\n").unwrap();
        let store = DatasetStore::new(&path);
        match store.load() {
            Err(StoreError::InvalidRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn unknown_label_code_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "10,10.5,45,1012,7\n").unwrap();
        let store = DatasetStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(StoreError::InvalidRecord { line: 1, .. })
        ));
    }
}
