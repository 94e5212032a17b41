//! # Heartwise
//!
//! Heart disease risk prediction from a clinical form.
//!
//! This crate provides:
//! - Validation and encoding of the 13 clinical observations
//! - Scaling and scoring with a pre-trained classifier loaded once at startup
//! - Terminal UI with a Home page and a prediction form
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Observations, feature encoding, scaling, threshold rule
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (dense network, artifact loading, log sanitization)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

use std::time::Duration;

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, PatientObservation, PredictionLabel, PredictionResult};

/// Result type for Heartwise operations
pub type Result<T> = std::result::Result<T, HeartwiseError>;

/// Main error type for Heartwise
#[derive(Debug, thiserror::Error)]
pub enum HeartwiseError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] domain::ObservationError),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Scoring failed: {0}")]
    ScoringFailure(String),

    #[error("Prediction timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ports::ClassifierError> for HeartwiseError {
    fn from(err: ports::ClassifierError) -> Self {
        match err {
            ports::ClassifierError::Unavailable(reason) => Self::ModelUnavailable(reason),
            other => Self::ScoringFailure(other.to_string()),
        }
    }
}

impl From<adapters::ArtifactError> for HeartwiseError {
    fn from(err: adapters::ArtifactError) -> Self {
        Self::ModelUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ClassifierError;

    #[test]
    fn test_classifier_errors_map_to_taxonomy() {
        let unavailable: HeartwiseError = ClassifierError::Unavailable("not loaded".into()).into();
        assert!(matches!(unavailable, HeartwiseError::ModelUnavailable(_)));

        let mismatch: HeartwiseError = ClassifierError::DimensionMismatch {
            expected: 13,
            actual: 12,
        }
        .into();
        match mismatch {
            HeartwiseError::ScoringFailure(msg) => assert!(msg.contains("expected 13")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_artifact_errors_are_model_unavailable() {
        let err: HeartwiseError =
            adapters::ArtifactError::NotFound(std::path::PathBuf::from("models/model.json")).into();
        assert!(matches!(err, HeartwiseError::ModelUnavailable(_)));
        assert!(err.to_string().contains("model.json"));
    }
}
