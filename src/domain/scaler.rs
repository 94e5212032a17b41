//! Standard scaling of feature vectors.
//!
//! Two modes exist. `PerRequest` fits the scaler on the single incoming vector
//! and transforms it with that same fit, which maps every input to all zeros.
//! This is what the deployed form has always done, and scores stay comparable
//! with it. `Reference` applies a scaler fitted once on the training data.

use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, FEATURE_COUNT};

/// Zero-mean, unit-variance scaler.
///
/// Population standard deviation (ddof = 0); a zero deviation is replaced by
/// 1.0 so constant features are only centred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Errors for scaler fitting and loading.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalerError {
    #[error("cannot fit a scaler on zero samples")]
    Empty,

    #[error("scaler has {mean} means and {scale} scales, expected 13")]
    Shape { mean: usize, scale: usize },

    #[error("scale for feature {0} must be finite and non-zero")]
    InvalidScale(usize),
}

impl StandardScaler {
    /// Fit on a set of samples.
    ///
    /// # Errors
    /// Returns `ScalerError::Empty` when `samples` is empty.
    pub fn fit(samples: &[FeatureVector]) -> Result<Self, ScalerError> {
        if samples.is_empty() {
            return Err(ScalerError::Empty);
        }
        let n = samples.len() as f64;

        let mut mean = vec![0.0; FEATURE_COUNT];
        for sample in samples {
            for (m, x) in mean.iter_mut().zip(sample.as_slice()) {
                *m += x;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }

        let mut variance = vec![0.0; FEATURE_COUNT];
        for sample in samples {
            for ((v, x), m) in variance.iter_mut().zip(sample.as_slice()).zip(&mean) {
                *v += (x - m).powi(2);
            }
        }

        let scale = variance
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std == 0.0 {
                    1.0
                } else {
                    std
                }
            })
            .collect();

        Ok(Self { mean, scale })
    }

    /// Check the shape and scales of a loaded scaler.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ScalerError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(ScalerError::Shape {
                mean: self.mean.len(),
                scale: self.scale.len(),
            });
        }
        if let Some(i) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(ScalerError::InvalidScale(i));
        }
        Ok(())
    }

    /// Standardize one vector.
    ///
    /// # Errors
    /// Returns the [`validate`](Self::validate) error for a malformed scaler.
    pub fn transform(&self, vector: &FeatureVector) -> Result<FeatureVector, ScalerError> {
        self.validate()?;
        let mut out = [0.0; FEATURE_COUNT];
        for ((o, x), (m, s)) in out
            .iter_mut()
            .zip(vector.as_slice())
            .zip(self.mean.iter().zip(&self.scale))
        {
            *o = (x - m) / s;
        }
        Ok(FeatureVector::new(out))
    }
}

/// How a vector is scaled before scoring.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureScaling {
    /// Fit on the request's own vector, then transform it.
    PerRequest,
    /// Apply a scaler fitted on the training distribution.
    Reference(StandardScaler),
}

impl FeatureScaling {
    /// Scale a vector.
    ///
    /// # Errors
    /// Returns a `ScalerError` when a reference scaler is malformed.
    pub fn apply(&self, vector: &FeatureVector) -> Result<FeatureVector, ScalerError> {
        match self {
            Self::PerRequest => {
                StandardScaler::fit(std::slice::from_ref(vector))?.transform(vector)
            }
            Self::Reference(scaler) => scaler.transform(vector),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PerRequest => "per-request",
            Self::Reference(_) => "reference",
        }
    }
}
