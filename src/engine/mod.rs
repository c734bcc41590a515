//! Background prediction/training engine and its caller-facing surface.
//!
//! One caller thread talks to one worker thread over three single-producer
//! single-consumer channels: `input` (rendezvous, blocking send gives the
//! caller real backpressure), `prediction` (capacity 1, non-blocking
//! publish, at most one ranking pending) and `correction` (unbounded,
//! fire-and-forget, drained one per worker cycle). A shared stop flag plus
//! the join handle make shutdown deterministic.

mod config;
mod worker;

pub use config::EngineConfig;
pub use worker::WorkerError;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use crate::ml::Classifier;
use crate::store::DatasetStore;
use crate::weather::{FeatureVector, Label, PredictionRanking};

use worker::Worker;

/// Failures visible to the engine's caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The worker thread is gone; no further requests can be served.
    #[error("Prediction worker has stopped")]
    WorkerStopped,
    /// The worker terminated with an error of its own.
    #[error(transparent)]
    Worker(#[from] WorkerError),
    /// The worker thread panicked.
    #[error("Prediction worker panicked")]
    WorkerPanicked,
}

/// Handle owning the worker thread and the three channels.
///
/// Dropping the engine disconnects the channels, which also stops the
/// worker; `request_stop` + `wait_for_exit` is the deterministic route.
pub struct Engine {
    input_tx: SyncSender<FeatureVector>,
    prediction_rx: Receiver<PredictionRanking>,
    correction_tx: Sender<Label>,
    stop: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<Result<(), WorkerError>>>,
    reply_timeout: Duration,
}

impl Engine {
    /// Start the worker thread over `store` and `classifier`.
    pub fn spawn<C>(config: EngineConfig, store: DatasetStore, classifier: C) -> Self
    where
        C: Classifier + Send + 'static,
    {
        let (input_tx, input_rx) = mpsc::sync_channel(0);
        let (prediction_tx, prediction_rx) = mpsc::sync_channel(1);
        let (correction_tx, correction_rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let reply_timeout = config.prediction_reply_timeout;

        let worker = Worker::new(
            config,
            store,
            classifier,
            input_rx,
            prediction_tx,
            correction_rx,
            Arc::clone(&stop),
        );
        let join_handle = thread::spawn(move || worker.run());
        tracing::debug!("Prediction worker started");

        Self {
            input_tx,
            prediction_rx,
            correction_tx,
            stop,
            join_handle: Some(join_handle),
            reply_timeout,
        }
    }

    /// Hand one sensor sample to the worker and wait briefly for a ranking.
    ///
    /// The send blocks until the worker picks the vector up; if the worker
    /// stalls, callers stall. `Ok(None)` means no new prediction was
    /// published within the reply timeout — expected between scheduled
    /// publishes, and the caller should keep showing its previous ranking.
    pub fn request_prediction(
        &self,
        vector: FeatureVector,
    ) -> Result<Option<PredictionRanking>, EngineError> {
        self.input_tx
            .send(vector)
            .map_err(|_| EngineError::WorkerStopped)?;
        match self.prediction_rx.recv_timeout(self.reply_timeout) {
            Ok(ranking) => Ok(Some(ranking)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::WorkerStopped),
        }
    }

    /// Queue a confirmed label for the most recently consumed sample.
    ///
    /// Fire-and-forget: bursts queue up and the worker drains one per
    /// cycle. A send after the worker died is silently dropped; the next
    /// `request_prediction` reports the failure.
    pub fn correction(&self, label: Label) {
        if self.correction_tx.send(label).is_err() {
            tracing::debug!(%label, "Correction dropped, worker is gone");
        }
    }

    /// Ask the worker to finish its current cycle and exit. Does not wait.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Join the worker and surface its terminal result. Idempotent; also
    /// sets the stop flag so calling this alone shuts the engine down.
    pub fn wait_for_exit(&mut self) -> Result<(), EngineError> {
        let Some(handle) = self.join_handle.take() else {
            return Ok(());
        };
        self.request_stop();
        match handle.join() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(EngineError::Worker(err)),
            Err(_) => Err(EngineError::WorkerPanicked),
        }
    }
}
