//! Prediction result types.
//!
//! Represents the classifier output after the threshold rule is applied.

use serde::{Deserialize, Serialize};

use super::features::FeatureVector;

/// Decision boundary: probabilities at or above it are positive.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Binary diagnosis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionLabel {
    /// No heart disease detected
    Negative,
    /// Heart disease detected
    Positive,
}

impl PredictionLabel {
    /// Apply the threshold rule.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= DECISION_THRESHOLD {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Negative => "No Heart Disease Detected",
            Self::Positive => "Heart Disease Detected",
        }
    }
}

impl std::fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "NEGATIVE"),
            Self::Positive => write!(f, "POSITIVE"),
        }
    }
}

/// Classifier probability with its label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability of heart disease (0.0 to 1.0)
    pub probability: f64,

    pub label: PredictionLabel,
}

impl PredictionResult {
    /// Label a probability.
    ///
    /// Returns `None` if the value is NaN or outside `[0, 1]`.
    #[must_use]
    pub fn from_probability(probability: f64) -> Option<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return None;
        }
        Some(Self {
            probability,
            label: PredictionLabel::from_probability(probability),
        })
    }

    /// Probability as a percentage with two decimals, e.g. `"73.21%"`.
    #[must_use]
    pub fn percentage(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.label == PredictionLabel::Positive
    }
}

/// Everything the result view renders for one submission. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Encoded observation
    pub features: FeatureVector,

    /// Vector actually passed to the classifier
    pub scaled: FeatureVector,

    pub result: PredictionResult,

    /// Scaling mode name ("per-request" or "reference")
    pub scaling: String,

    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(
        features: FeatureVector,
        scaled: FeatureVector,
        result: PredictionResult,
        scaling: impl Into<String>,
    ) -> Self {
        Self {
            features,
            scaled,
            result,
            scaling: scaling.into(),
            assessed_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(PredictionLabel::from_probability(0.5), PredictionLabel::Positive);
        assert_eq!(PredictionLabel::from_probability(0.4999), PredictionLabel::Negative);
        assert_eq!(PredictionLabel::from_probability(0.5001), PredictionLabel::Positive);
        assert_eq!(PredictionLabel::from_probability(0.0), PredictionLabel::Negative);
        assert_eq!(PredictionLabel::from_probability(1.0), PredictionLabel::Positive);
    }

    #[test]
    fn test_result_rejects_out_of_range() {
        assert!(PredictionResult::from_probability(f64::NAN).is_none());
        assert!(PredictionResult::from_probability(-0.01).is_none());
        assert!(PredictionResult::from_probability(1.01).is_none());

        let result = PredictionResult::from_probability(0.7321).expect("in range");
        assert!(result.is_positive());
        assert_eq!(result.percentage(), "73.21%");
    }

    #[test]
    fn test_label_text() {
        assert_eq!(PredictionLabel::Negative.description(), "No Heart Disease Detected");
        assert_eq!(PredictionLabel::Positive.to_string(), "POSITIVE");
    }
}
