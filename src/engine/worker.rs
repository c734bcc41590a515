//! Background thread that owns the dataset, the classifier and the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::thread;
use std::time::Instant;

use thiserror::Error;

use super::config::EngineConfig;
use crate::ml::{Classifier, ClassifierError};
use crate::store::{DatasetStore, StoreError};
use crate::weather::{FeatureVector, Label, PredictionRanking, TrainingExample};

/// Terminal worker failures, surfaced through `Engine::wait_for_exit`.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The classifier failed to fit or predict. No recovery path exists;
    /// a dead worker beats a silently hung one.
    #[error("Classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
    /// The dataset could not be persisted.
    #[error("Dataset persistence failed: {0}")]
    Store(#[from] StoreError),
}

enum InputWait {
    Vector(FeatureVector),
    Shutdown,
}

pub(super) struct Worker<C: Classifier> {
    config: EngineConfig,
    store: DatasetStore,
    classifier: C,
    dataset: Vec<TrainingExample>,
    trained: bool,
    input_rx: Receiver<FeatureVector>,
    prediction_tx: SyncSender<PredictionRanking>,
    correction_rx: Receiver<Label>,
    stop: Arc<AtomicBool>,
}

impl<C: Classifier> Worker<C> {
    pub(super) fn new(
        config: EngineConfig,
        store: DatasetStore,
        classifier: C,
        input_rx: Receiver<FeatureVector>,
        prediction_tx: SyncSender<PredictionRanking>,
        correction_rx: Receiver<Label>,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            store,
            classifier,
            dataset: Vec::new(),
            trained: false,
            input_rx,
            prediction_tx,
            correction_rx,
            stop,
        }
    }

    /// Load, serve until stopped, then persist once more on the way out.
    pub(super) fn run(mut self) -> Result<(), WorkerError> {
        self.load_and_fit()?;
        let served = self.serve();
        let persisted = self.store.save(&self.dataset).map_err(WorkerError::from);
        tracing::debug!("Prediction worker exiting");
        served.and(persisted)
    }

    fn load_and_fit(&mut self) -> Result<(), WorkerError> {
        self.dataset = match self.store.load() {
            Ok(examples) => examples,
            Err(err) => {
                tracing::warn!("Starting with an empty dataset: {err}");
                Vec::new()
            }
        };
        if self.dataset.len() > self.config.training_size_threshold {
            self.classifier.fit(&self.dataset)?;
            self.trained = true;
            tracing::debug!(examples = self.dataset.len(), "Initial training complete");
        } else {
            tracing::debug!(
                examples = self.dataset.len(),
                threshold = self.config.training_size_threshold,
                "Not enough data for initial training"
            );
        }
        Ok(())
    }

    fn serve(&mut self) -> Result<(), WorkerError> {
        let mut next_prediction = Instant::now();
        loop {
            let vector = match self.wait_for_input() {
                InputWait::Vector(vector) => vector,
                InputWait::Shutdown => return Ok(()),
            };

            if Instant::now() >= next_prediction {
                let ranking = self.current_ranking(&vector)?;
                match self.prediction_tx.try_send(ranking) {
                    Ok(()) => tracing::debug!(best = %ranking.first(), "Prediction published"),
                    Err(TrySendError::Full(_)) => {
                        tracing::debug!("No caller waiting; prediction dropped")
                    }
                    Err(TrySendError::Disconnected(_)) => return Ok(()),
                }
                // Advance from the previous deadline, not from now, so the
                // schedule does not drift.
                next_prediction += self.config.prediction_interval;
            }

            match self
                .correction_rx
                .recv_timeout(self.config.correction_poll_timeout)
            {
                Ok(label) => self.absorb_correction(vector, label)?,
                Err(RecvTimeoutError::Timeout) => tracing::trace!("No correction this cycle"),
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }

            if self.stop.load(Ordering::Relaxed) {
                return Ok(());
            }
            thread::sleep(self.config.idle_pause);
        }
    }

    /// Block until a feature vector arrives, re-checking the stop flag at
    /// each poll interval so shutdown never hangs on an idle caller.
    fn wait_for_input(&self) -> InputWait {
        loop {
            if self.stop.load(Ordering::Relaxed) {
                return InputWait::Shutdown;
            }
            match self.input_rx.recv_timeout(self.config.input_poll_interval) {
                Ok(vector) => return InputWait::Vector(vector),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return InputWait::Shutdown,
            }
        }
    }

    fn current_ranking(&self, vector: &FeatureVector) -> Result<PredictionRanking, WorkerError> {
        if self.trained {
            let best = self.classifier.predict(vector)?;
            Ok(PredictionRanking::from_best(best))
        } else {
            Ok(PredictionRanking::canonical())
        }
    }

    fn absorb_correction(
        &mut self,
        vector: FeatureVector,
        label: Label,
    ) -> Result<(), WorkerError> {
        self.dataset.push(TrainingExample::new(vector, label));
        if self.dataset.len() > self.config.training_size_threshold {
            self.classifier.fit(&self.dataset)?;
            self.trained = true;
            tracing::debug!(examples = self.dataset.len(), "Retrained on full dataset");
        } else {
            tracing::debug!(
                examples = self.dataset.len(),
                threshold = self.config.training_size_threshold,
                "Correction stored, still below training threshold"
            );
        }
        self.store.save(&self.dataset)?;
        Ok(())
    }
}
