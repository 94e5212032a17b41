//! Domain layer: Core types and pure logic.
//!
//! Observations, the feature encoder, scaling and the threshold rule.
//! Nothing here performs I/O.

mod features;
mod observation;
mod prediction;
mod scaler;

pub use features::{encode, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use observation::{
    parse_yes_no, ChestPainType, FieldKind, ObservationError, ObservationField,
    PatientObservation, RawObservation, RestingEcg, Sex, StSlope, Thalassemia,
};
pub use prediction::{Assessment, PredictionLabel, PredictionResult, DECISION_THRESHOLD};
pub use scaler::{FeatureScaling, ScalerError, StandardScaler};
