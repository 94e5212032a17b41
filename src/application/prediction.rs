//! Prediction service: Orchestrates the scoring pipeline.
//!
//! This service coordinates:
//! - Range validation of the observation
//! - Feature encoding
//! - Scaling (per-request or reference)
//! - Scoring, optionally bounded by a timeout
//! - The threshold rule

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    encode, Assessment, FeatureScaling, FeatureVector, PatientObservation, PredictionResult,
    RawObservation, FEATURE_COUNT,
};
use crate::ports::Classifier;
use crate::HeartwiseError;

/// Pipeline step, reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionStage {
    Encoding,
    Scaling,
    Scoring,
}

impl PredictionStage {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Encoding => "Encoding clinical features...",
            Self::Scaling => "Scaling feature vector...",
            Self::Scoring => "Scoring with classifier...",
        }
    }
}

/// Service for scoring observations.
///
/// Holds the classifier loaded at startup. When loading failed, the service
/// still exists and every request reports `ModelUnavailable` with the load
/// error. Immutable after construction, so it can be shared across threads
/// behind an `Arc`.
pub struct PredictionService<C: Classifier + 'static> {
    classifier: Option<Arc<C>>,
    unavailable_reason: String,
    scaling: FeatureScaling,
    timeout: Option<Duration>,
}

impl<C: Classifier + 'static> PredictionService<C> {
    /// Create a service around a loaded classifier.
    pub fn new(classifier: Arc<C>, scaling: FeatureScaling) -> Self {
        Self {
            classifier: Some(classifier),
            unavailable_reason: String::new(),
            scaling,
            timeout: None,
        }
    }

    /// Create a service whose classifier failed to load.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            classifier: None,
            unavailable_reason: reason.into(),
            scaling: FeatureScaling::PerRequest,
            timeout: None,
        }
    }

    /// Bound the scoring step. `None` waits indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check whether a classifier is loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.classifier.is_some()
    }

    /// Model status line for the home page.
    #[must_use]
    pub fn status(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{} loaded, {} scaling",
                classifier.describe(),
                self.scaling.name()
            ),
            None => format!("Model unavailable: {}", self.unavailable_reason),
        }
    }

    #[must_use]
    pub fn scaling_name(&self) -> &'static str {
        self.scaling.name()
    }

    /// Parse a string-valued submission and score it.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the submission cannot be parsed, and any
    /// error of [`assess`](Self::assess).
    pub fn predict(&self, raw: &RawObservation) -> Result<Assessment, HeartwiseError> {
        let observation = PatientObservation::try_from(raw)?;
        self.assess(observation)
    }

    /// Run the pipeline on an observation.
    ///
    /// # Errors
    /// Returns `InvalidInput`, `ModelUnavailable`, `ScoringFailure` or
    /// `Timeout`.
    pub fn assess(&self, observation: PatientObservation) -> Result<Assessment, HeartwiseError> {
        self.assess_with_progress(observation, |_| {})
    }

    /// Run the pipeline, calling `on_stage` as each step starts.
    ///
    /// # Errors
    /// See [`assess`](Self::assess).
    pub fn assess_with_progress<F>(
        &self,
        observation: PatientObservation,
        mut on_stage: F,
    ) -> Result<Assessment, HeartwiseError>
    where
        F: FnMut(PredictionStage),
    {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| HeartwiseError::ModelUnavailable(self.unavailable_reason.clone()))?;
        if classifier.input_dim() != FEATURE_COUNT {
            return Err(HeartwiseError::ScoringFailure(format!(
                "{} expects {} features, observations encode {FEATURE_COUNT}",
                classifier.describe(),
                classifier.input_dim()
            )));
        }

        if let Err(errors) = observation.validate() {
            if let Some(first) = errors.into_iter().next() {
                return Err(first.into());
            }
        }

        tracing::debug!("Step 1: Encoding observation...");
        on_stage(PredictionStage::Encoding);
        let features = encode(&observation);

        tracing::debug!("Step 2: Applying {} scaling...", self.scaling.name());
        on_stage(PredictionStage::Scaling);
        let scaled = self.scaling.apply(&features).map_err(|e| {
            HeartwiseError::ScoringFailure(format!("{} scaling failed: {e}", self.scaling.name()))
        })?;

        tracing::debug!("Step 3: Scoring with {}...", classifier.describe());
        on_stage(PredictionStage::Scoring);
        let probability = self.score(classifier, &scaled)?;

        let result = PredictionResult::from_probability(probability).ok_or_else(|| {
            HeartwiseError::ScoringFailure(format!(
                "classifier returned {probability}, expected a probability in [0, 1]"
            ))
        })?;

        tracing::info!(
            "Prediction complete: label={}, probability={:.2}%",
            result.label,
            result.probability * 100.0
        );

        Ok(Assessment::new(features, scaled, result, self.scaling.name()))
    }

    fn score(&self, classifier: &Arc<C>, scaled: &FeatureVector) -> Result<f64, HeartwiseError> {
        let Some(timeout) = self.timeout else {
            return Ok(classifier.score(scaled.as_slice())?);
        };

        let (tx, rx) = mpsc::channel();
        let classifier = Arc::clone(classifier);
        let input = scaled.to_vec();
        std::thread::Builder::new()
            .name("heartwise-score".into())
            .spawn(move || {
                // The receiver is gone if the request already timed out.
                let _ = tx.send(classifier.score(&input));
            })?;

        match rx.recv_timeout(timeout) {
            Ok(result) => Ok(result?),
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Scoring exceeded {:?}; discarding result", timeout);
                Err(HeartwiseError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(HeartwiseError::ScoringFailure(
                "scoring thread exited without a result".into(),
            )),
        }
    }
}
