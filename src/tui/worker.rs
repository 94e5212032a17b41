//! Background prediction worker.
//!
//! Runs the scoring pipeline off the TUI thread so the main loop keeps
//! drawing while a (possibly slow) classifier works.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::{PredictionService, PredictionStage};
use crate::domain::{Assessment, PatientObservation};
use crate::ports::Classifier;

/// Progress updates from the prediction worker.
#[derive(Debug, Clone)]
pub enum PredictionProgress {
    /// A pipeline step started
    Stage(PredictionStage),
    /// Prediction complete
    Complete(Box<Assessment>),
    /// Error occurred during prediction
    Error(String),
}

/// Handle to a running prediction worker.
pub struct PredictionWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<PredictionProgress>,
    _handle: JoinHandle<()>,
}

impl PredictionWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    ///
    /// A worker that exits without a final update (it panicked) is reported
    /// as an `Error` so the caller can release it.
    #[must_use]
    pub fn try_recv(&self) -> Option<PredictionProgress> {
        match self.progress_rx.try_recv() {
            Ok(progress) => Some(progress),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Prediction worker exited without a result");
                Some(PredictionProgress::Error(
                    "Prediction worker stopped unexpectedly".to_string(),
                ))
            }
        }
    }
}

/// Spawns prediction requests on background threads.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Spawn a background prediction task.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<C>(
        service: Arc<PredictionService<C>>,
        observation: PatientObservation,
    ) -> PredictionWorkerHandle
    where
        C: Classifier + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, observation, &tx);
        });

        PredictionWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress<C>(
        service: &PredictionService<C>,
        observation: PatientObservation,
        tx: &Sender<PredictionProgress>,
    ) where
        C: Classifier + 'static,
    {
        let result = service.assess_with_progress(observation, |stage| {
            let _ = tx.send(PredictionProgress::Stage(stage));
        });

        let message = match result {
            Ok(assessment) => PredictionProgress::Complete(Box::new(assessment)),
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                PredictionProgress::Error(e.to_string())
            }
        };
        let _ = tx.send(message);
    }
}
