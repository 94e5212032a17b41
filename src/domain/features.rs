//! Feature vector encoding.
//!
//! Maps a [`PatientObservation`] to the ordered numeric vector the classifier
//! was trained on. Categorical fields use integer codes (not one-hot).

use serde::{Deserialize, Serialize};

use super::observation::{ObservationField, PatientObservation};

/// Number of classifier inputs.
pub const FEATURE_COUNT: usize = 13;

/// Feature names in classifier input order (dataset codes).
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Ordered numeric encoding of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Build from a slice.
    ///
    /// # Errors
    /// Returns the actual length if it is not [`FEATURE_COUNT`].
    pub fn from_slice(values: &[f64]) -> Result<Self, usize> {
        let array: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| values.len())?;
        Ok(Self(array))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    #[must_use]
    pub fn get(&self, field: ObservationField) -> f64 {
        self.0[field as usize]
    }

    /// Pairs of (dataset code, value) in input order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Encode an observation.
///
/// Pure and total: every `PatientObservation` maps to exactly one vector.
/// Out-of-domain categories are rejected earlier, when the observation is
/// parsed from a [`RawObservation`](super::RawObservation).
#[must_use]
pub fn encode(observation: &PatientObservation) -> FeatureVector {
    FeatureVector([
        f64::from(observation.age),
        f64::from(observation.sex.code()),
        f64::from(observation.chest_pain_type.code()),
        f64::from(observation.resting_bp),
        f64::from(observation.cholesterol),
        flag(observation.fasting_blood_sugar_high),
        f64::from(observation.resting_ecg.code()),
        f64::from(observation.max_heart_rate),
        flag(observation.exercise_angina),
        observation.st_depression,
        f64::from(observation.st_slope.code()),
        f64::from(observation.vessels_colored),
        f64::from(observation.thalassemia.code()),
    ])
}

impl From<&PatientObservation> for FeatureVector {
    fn from(observation: &PatientObservation) -> Self {
        encode(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observation::{
        ChestPainType, RawObservation, RestingEcg, Sex, StSlope, Thalassemia,
    };

    #[test]
    fn test_default_scenario_encoding() {
        let vector = encode(&PatientObservation::default());
        assert_eq!(
            vector.as_slice(),
            &[50.0, 1.0, 1.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 0.0, 1.0, 0.0, 3.0]
        );
    }

    #[test]
    fn test_categorical_codes() {
        let code_of = |observation: PatientObservation, field: ObservationField| {
            encode(&observation).get(field)
        };

        for (sex, code) in [(Sex::Male, 1.0), (Sex::Female, 0.0)] {
            let obs = PatientObservation { sex, ..Default::default() };
            assert_eq!(code_of(obs, ObservationField::Sex), code);
        }

        let chest = [
            (ChestPainType::TypicalAngina, 1.0),
            (ChestPainType::AtypicalAngina, 2.0),
            (ChestPainType::NonAnginalPain, 3.0),
            (ChestPainType::Asymptomatic, 4.0),
        ];
        for (chest_pain_type, code) in chest {
            let obs = PatientObservation { chest_pain_type, ..Default::default() };
            assert_eq!(code_of(obs, ObservationField::ChestPainType), code);
        }

        let ecg = [
            (RestingEcg::Normal, 0.0),
            (RestingEcg::StTAbnormality, 1.0),
            (RestingEcg::LvHypertrophy, 2.0),
        ];
        for (resting_ecg, code) in ecg {
            let obs = PatientObservation { resting_ecg, ..Default::default() };
            assert_eq!(code_of(obs, ObservationField::RestingEcg), code);
        }

        let slope = [
            (StSlope::Upsloping, 1.0),
            (StSlope::Flat, 2.0),
            (StSlope::Downsloping, 3.0),
        ];
        for (st_slope, code) in slope {
            let obs = PatientObservation { st_slope, ..Default::default() };
            assert_eq!(code_of(obs, ObservationField::StSlope), code);
        }

        let thal = [
            (Thalassemia::Normal, 3.0),
            (Thalassemia::FixedDefect, 6.0),
            (Thalassemia::ReversibleDefect, 7.0),
        ];
        for (thalassemia, code) in thal {
            let obs = PatientObservation { thalassemia, ..Default::default() };
            assert_eq!(code_of(obs, ObservationField::Thalassemia), code);
        }

        for (flag_value, code) in [(true, 1.0), (false, 0.0)] {
            let obs = PatientObservation {
                fasting_blood_sugar_high: flag_value,
                exercise_angina: flag_value,
                ..Default::default()
            };
            let vector = encode(&obs);
            assert_eq!(vector.get(ObservationField::FastingBloodSugarHigh), code);
            assert_eq!(vector.get(ObservationField::ExerciseAngina), code);
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let obs = PatientObservation {
            age: 63,
            chest_pain_type: ChestPainType::Asymptomatic,
            st_depression: 2.3,
            ..Default::default()
        };
        assert_eq!(encode(&obs), encode(&obs.clone()));
    }

    #[test]
    fn test_order_ignores_collection_order() {
        let pairs = [
            ("thal", "Fixed Defect"),
            ("oldpeak", "1.4"),
            ("sex", "Female"),
            ("ca", "2"),
            ("exang", "Yes"),
            ("age", "61"),
            ("slope", "Flat"),
            ("chol", "310"),
            ("restecg", "LV Hypertrophy"),
            ("fbs", "Yes"),
            ("trestbps", "145"),
            ("thalach", "120"),
            ("cp", "Non-anginal Pain"),
        ];
        let shuffled = RawObservation::from_pairs(pairs).expect("known fields");
        let reversed = RawObservation::from_pairs(pairs.iter().rev().copied()).expect("known fields");

        let a = encode(&PatientObservation::try_from(&shuffled).expect("valid"));
        let b = encode(&PatientObservation::try_from(&reversed).expect("valid"));

        assert_eq!(a, b);
        assert_eq!(
            a.as_slice(),
            &[61.0, 0.0, 3.0, 145.0, 310.0, 1.0, 2.0, 120.0, 1.0, 1.4, 2.0, 2.0, 6.0]
        );
    }

    #[test]
    fn test_unknown_category_yields_no_vector() {
        let mut raw = RawObservation::from(&PatientObservation::default());
        raw.set(ObservationField::ChestPainType, "Unknown");
        let vector = PatientObservation::try_from(&raw).map(|obs| encode(&obs));
        assert!(vector.is_err());
    }

    #[test]
    fn test_feature_names_follow_field_order() {
        for (field, name) in ObservationField::ALL.iter().zip(FEATURE_NAMES) {
            assert_eq!(field.dataset_code(), name);
        }
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert_eq!(FeatureVector::from_slice(&[1.0, 2.0]), Err(2));
        let v = FeatureVector::from_slice(&[0.0; FEATURE_COUNT]).expect("13 values");
        assert_eq!(v.named().count(), FEATURE_COUNT);
    }
}
