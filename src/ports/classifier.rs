//! Classifier port: Trait for the pre-trained scoring model.
//!
//! The model is a black box mapping an ordered numeric vector to a
//! probability. This trait keeps the artifact format out of the application
//! logic.

/// Errors that can occur while scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("scoring failed: {0}")]
    Scoring(String),
}

/// Trait for binary classifiers.
///
/// Implementations are immutable once loaded and shared read-only between
/// concurrent requests.
pub trait Classifier: Send + Sync {
    /// Number of inputs the model expects.
    fn input_dim(&self) -> usize;

    /// Score a (scaled) feature vector.
    ///
    /// # Returns
    /// A probability, expected in `[0, 1]`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` for a vector of the wrong length and
    /// `Scoring` for any other failure.
    fn score(&self, features: &[f64]) -> Result<f64, ClassifierError>;

    /// Short description for status displays and logs.
    fn describe(&self) -> String;
}
