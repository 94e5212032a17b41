//! Patient observation types for heart disease screening.
//!
//! The thirteen clinical measurements collected by the prediction form, their
//! categorical domains, and the string-valued submission they are parsed from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised while turning a submission into a [`PatientObservation`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObservationError {
    #[error("{field}: unknown value {value:?}")]
    UnknownCategory { field: &'static str, value: String },

    #[error("{field}: invalid number {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field}: value is required")]
    MissingField { field: &'static str },

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("{field}: value {value} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

fn matches_label(input: &str, label: &str) -> bool {
    input.trim().eq_ignore_ascii_case(label)
}

/// Declares a categorical field: its variants, their display labels (plus
/// accepted aliases) and the integer code the classifier was trained on.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $label:literal $(| $alias:literal)* = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every choice, in form order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Human-readable label shown on the form.
            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Integer code fed to the classifier.
            #[must_use]
            pub fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ObservationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if matches_label(s, $label) $(|| matches_label(s, $alias))* {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ObservationError::UnknownCategory {
                    field: $field,
                    value: s.to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical! {
    /// Biological sex.
    Sex, "sex" {
        Male => "Male" = 1,
        Female => "Female" = 0,
    }
}

categorical! {
    /// Type of chest pain experienced.
    ChestPainType, "chest_pain_type" {
        TypicalAngina => "Typical Angina" = 1,
        AtypicalAngina => "Atypical Angina" = 2,
        NonAnginalPain => "Non-anginal Pain" = 3,
        Asymptomatic => "Asymptomatic" = 4,
    }
}

categorical! {
    /// Resting electrocardiogram result.
    RestingEcg, "resting_ecg" {
        Normal => "Normal" = 0,
        StTAbnormality => "ST-T Abnormality" | "ST-T Wave Abnormality" = 1,
        LvHypertrophy => "LV Hypertrophy" | "Left Ventricular Hypertrophy" = 2,
    }
}

categorical! {
    /// Slope of the peak exercise ST segment.
    StSlope, "st_slope" {
        Upsloping => "Upsloping" = 1,
        Flat => "Flat" = 2,
        Downsloping => "Downsloping" = 3,
    }
}

categorical! {
    /// Thalassemia type.
    Thalassemia, "thalassemia" {
        Normal => "Normal" = 3,
        FixedDefect => "Fixed Defect" = 6,
        ReversibleDefect => "Reversible Defect" = 7,
    }
}

/// Parse a Yes/No answer.
///
/// # Errors
/// Returns `UnknownCategory` for anything other than yes/no, true/false, 1/0.
pub fn parse_yes_no(field: &'static str, value: &str) -> Result<bool, ObservationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(ObservationError::UnknownCategory {
            field,
            value: value.to_string(),
        }),
    }
}

/// Widget kind used to collect a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Whole number within `[min, max]`.
    Integer { min: f64, max: f64 },
    /// Decimal number within `[min, max]`.
    Decimal { min: f64, max: f64 },
    /// One of a fixed list of labels.
    Choice(&'static [&'static str]),
}

const YES_NO: &[&str] = &["No", "Yes"];
const SEX_CHOICES: &[&str] = &["Male", "Female"];
const CHEST_PAIN_CHOICES: &[&str] = &[
    "Typical Angina",
    "Atypical Angina",
    "Non-anginal Pain",
    "Asymptomatic",
];
const RESTING_ECG_CHOICES: &[&str] = &["Normal", "ST-T Abnormality", "LV Hypertrophy"];
const ST_SLOPE_CHOICES: &[&str] = &["Upsloping", "Flat", "Downsloping"];
const THALASSEMIA_CHOICES: &[&str] = &["Normal", "Fixed Defect", "Reversible Defect"];

/// Identifies one of the thirteen observation fields.
///
/// `ALL` is in classifier input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationField {
    Age,
    Sex,
    ChestPainType,
    RestingBp,
    Cholesterol,
    FastingBloodSugarHigh,
    RestingEcg,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    StSlope,
    VesselsColored,
    Thalassemia,
}

impl ObservationField {
    pub const ALL: [Self; 13] = [
        Self::Age,
        Self::Sex,
        Self::ChestPainType,
        Self::RestingBp,
        Self::Cholesterol,
        Self::FastingBloodSugarHigh,
        Self::RestingEcg,
        Self::MaxHeartRate,
        Self::ExerciseAngina,
        Self::StDepression,
        Self::StSlope,
        Self::VesselsColored,
        Self::Thalassemia,
    ];

    /// Canonical snake_case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::ChestPainType => "chest_pain_type",
            Self::RestingBp => "resting_bp",
            Self::Cholesterol => "cholesterol",
            Self::FastingBloodSugarHigh => "fasting_blood_sugar_high",
            Self::RestingEcg => "resting_ecg",
            Self::MaxHeartRate => "max_heart_rate",
            Self::ExerciseAngina => "exercise_angina",
            Self::StDepression => "st_depression",
            Self::StSlope => "st_slope",
            Self::VesselsColored => "vessels_colored",
            Self::Thalassemia => "thalassemia",
        }
    }

    /// Column code in the heart disease dataset the classifier was trained on.
    #[must_use]
    pub fn dataset_code(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::ChestPainType => "cp",
            Self::RestingBp => "trestbps",
            Self::Cholesterol => "chol",
            Self::FastingBloodSugarHigh => "fbs",
            Self::RestingEcg => "restecg",
            Self::MaxHeartRate => "thalach",
            Self::ExerciseAngina => "exang",
            Self::StDepression => "oldpeak",
            Self::StSlope => "slope",
            Self::VesselsColored => "ca",
            Self::Thalassemia => "thal",
        }
    }

    /// Form label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::ChestPainType => "Chest Pain Type",
            Self::RestingBp => "Resting Blood Pressure (mm Hg)",
            Self::Cholesterol => "Cholesterol (mg/dl)",
            Self::FastingBloodSugarHigh => "Fasting Blood Sugar > 120 mg/dl",
            Self::RestingEcg => "Resting ECG Results",
            Self::MaxHeartRate => "Maximum Heart Rate",
            Self::ExerciseAngina => "Exercise Induced Angina",
            Self::StDepression => "ST Depression",
            Self::StSlope => "Slope of Peak Exercise ST Segment",
            Self::VesselsColored => "Major Vessels Colored",
            Self::Thalassemia => "Thalassemia",
        }
    }

    /// One-line explanation shown in the feature information panel.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Age => "Age in years",
            Self::Sex => "Gender of the patient",
            Self::ChestPainType => "Type of chest pain experienced",
            Self::RestingBp => "Blood pressure (mm Hg) while resting",
            Self::Cholesterol => "Serum cholesterol in mg/dl",
            Self::FastingBloodSugarHigh => "Whether fasting blood sugar > 120 mg/dl",
            Self::RestingEcg => "Results of resting electrocardiogram",
            Self::MaxHeartRate => "Maximum heart rate achieved",
            Self::ExerciseAngina => "Whether angina was induced by exercise",
            Self::StDepression => "ST depression induced by exercise relative to rest",
            Self::StSlope => "Slope of the peak exercise ST segment",
            Self::VesselsColored => "Number of major vessels colored by fluoroscopy",
            Self::Thalassemia => "Type of thalassemia",
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Age => FieldKind::Integer { min: 20.0, max: 100.0 },
            Self::RestingBp => FieldKind::Integer { min: 90.0, max: 200.0 },
            Self::Cholesterol => FieldKind::Integer { min: 100.0, max: 600.0 },
            Self::MaxHeartRate => FieldKind::Integer { min: 70.0, max: 220.0 },
            Self::StDepression => FieldKind::Decimal { min: 0.0, max: 6.2 },
            Self::VesselsColored => FieldKind::Integer { min: 0.0, max: 3.0 },
            Self::Sex => FieldKind::Choice(SEX_CHOICES),
            Self::ChestPainType => FieldKind::Choice(CHEST_PAIN_CHOICES),
            Self::FastingBloodSugarHigh | Self::ExerciseAngina => FieldKind::Choice(YES_NO),
            Self::RestingEcg => FieldKind::Choice(RESTING_ECG_CHOICES),
            Self::StSlope => FieldKind::Choice(ST_SLOPE_CHOICES),
            Self::Thalassemia => FieldKind::Choice(THALASSEMIA_CHOICES),
        }
    }

    /// Look a field up by canonical name or dataset code.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|field| {
            name.eq_ignore_ascii_case(field.name()) || name.eq_ignore_ascii_case(field.dataset_code())
        })
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ObservationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated clinical observation, constructed fresh per submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientObservation {
    /// Age in years (20-100)
    pub age: u8,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    /// Resting blood pressure in mmHg (90-200)
    pub resting_bp: u16,
    /// Serum cholesterol in mg/dl (100-600)
    pub cholesterol: u16,
    /// Fasting blood sugar above 120 mg/dl
    pub fasting_blood_sugar_high: bool,
    pub resting_ecg: RestingEcg,
    /// Maximum heart rate achieved (70-220)
    pub max_heart_rate: u16,
    pub exercise_angina: bool,
    /// ST depression induced by exercise relative to rest (0.0-6.2)
    pub st_depression: f64,
    pub st_slope: StSlope,
    /// Major vessels colored by fluoroscopy (0-3)
    pub vessels_colored: u8,
    pub thalassemia: Thalassemia,
}

impl Default for PatientObservation {
    /// The values the prediction form opens with.
    fn default() -> Self {
        Self {
            age: 50,
            sex: Sex::Male,
            chest_pain_type: ChestPainType::TypicalAngina,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar_high: false,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: false,
            st_depression: 0.0,
            st_slope: StSlope::Upsloping,
            vessels_colored: 0,
            thalassemia: Thalassemia::Normal,
        }
    }
}

impl PatientObservation {
    /// Value of a numeric field as `f64`, `None` for categorical fields.
    fn numeric_value(&self, field: ObservationField) -> Option<f64> {
        match field {
            ObservationField::Age => Some(f64::from(self.age)),
            ObservationField::RestingBp => Some(f64::from(self.resting_bp)),
            ObservationField::Cholesterol => Some(f64::from(self.cholesterol)),
            ObservationField::MaxHeartRate => Some(f64::from(self.max_heart_rate)),
            ObservationField::StDepression => Some(self.st_depression),
            ObservationField::VesselsColored => Some(f64::from(self.vessels_colored)),
            _ => None,
        }
    }

    /// Check numeric fields against the ranges offered by the form widgets.
    ///
    /// # Errors
    /// Returns every violation found.
    pub fn validate(&self) -> Result<(), Vec<ObservationError>> {
        let mut errors = Vec::new();

        for field in ObservationField::ALL {
            let (min, max) = match field.kind() {
                FieldKind::Integer { min, max } | FieldKind::Decimal { min, max } => (min, max),
                FieldKind::Choice(_) => continue,
            };
            let Some(value) = self.numeric_value(field) else {
                continue;
            };
            // NaN fails the range test too.
            if !(min..=max).contains(&value) {
                errors.push(ObservationError::OutOfRange {
                    field: field.name(),
                    value,
                    min,
                    max,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Form representation of a field's value.
    #[must_use]
    pub fn display_value(&self, field: ObservationField) -> String {
        let yes_no = |b: bool| (if b { "Yes" } else { "No" }).to_string();
        match field {
            ObservationField::Sex => self.sex.label().to_string(),
            ObservationField::ChestPainType => self.chest_pain_type.label().to_string(),
            ObservationField::FastingBloodSugarHigh => yes_no(self.fasting_blood_sugar_high),
            ObservationField::RestingEcg => self.resting_ecg.label().to_string(),
            ObservationField::ExerciseAngina => yes_no(self.exercise_angina),
            ObservationField::StSlope => self.st_slope.label().to_string(),
            ObservationField::Thalassemia => self.thalassemia.label().to_string(),
            // Shortest text that parses back to the same value.
            ObservationField::StDepression => format!("{:?}", self.st_depression),
            other => self
                .numeric_value(other)
                .map(|v| format!("{v:.0}"))
                .unwrap_or_default(),
        }
    }
}

/// A string-valued submission as collected by a form or an API client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    values: [Option<String>; 13],
}

impl RawObservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value.
    pub fn set(&mut self, field: ObservationField, value: impl Into<String>) {
        self.values[field.position()] = Some(value.into());
    }

    #[must_use]
    pub fn get(&self, field: ObservationField) -> Option<&str> {
        self.values[field.position()].as_deref()
    }

    /// Collect `(field name, value)` pairs in any order.
    ///
    /// # Errors
    /// Returns `UnknownField` for a name that is neither a canonical field name
    /// nor a dataset code.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ObservationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut raw = Self::new();
        for (name, value) in pairs {
            let field = ObservationField::from_name(name)
                .ok_or_else(|| ObservationError::UnknownField(name.to_string()))?;
            raw.set(field, value);
        }
        Ok(raw)
    }

    /// Wipe the collected strings.
    pub fn clear(&mut self) {
        use zeroize::Zeroize;
        for value in self.values.iter_mut() {
            if let Some(v) = value.as_mut() {
                v.zeroize();
            }
            *value = None;
        }
    }

    fn required(&self, field: ObservationField) -> Result<&str, ObservationError> {
        self.get(field)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ObservationError::MissingField {
                field: field.name(),
            })
    }

    fn number<T: FromStr>(&self, field: ObservationField) -> Result<T, ObservationError> {
        let value = self.required(field)?;
        value
            .trim()
            .parse()
            .map_err(|_| ObservationError::InvalidNumber {
                field: field.name(),
                value: value.to_string(),
            })
    }

    fn category<T: FromStr<Err = ObservationError>>(
        &self,
        field: ObservationField,
    ) -> Result<T, ObservationError> {
        self.required(field)?.parse()
    }

    fn yes_no(&self, field: ObservationField) -> Result<bool, ObservationError> {
        parse_yes_no(field.name(), self.required(field)?)
    }
}

impl TryFrom<&RawObservation> for PatientObservation {
    type Error = ObservationError;

    fn try_from(raw: &RawObservation) -> Result<Self, Self::Error> {
        use ObservationField as F;

        let st_depression: f64 = raw.number(F::StDepression)?;
        if !st_depression.is_finite() {
            return Err(ObservationError::InvalidNumber {
                field: F::StDepression.name(),
                value: st_depression.to_string(),
            });
        }

        Ok(Self {
            age: raw.number(F::Age)?,
            sex: raw.category(F::Sex)?,
            chest_pain_type: raw.category(F::ChestPainType)?,
            resting_bp: raw.number(F::RestingBp)?,
            cholesterol: raw.number(F::Cholesterol)?,
            fasting_blood_sugar_high: raw.yes_no(F::FastingBloodSugarHigh)?,
            resting_ecg: raw.category(F::RestingEcg)?,
            max_heart_rate: raw.number(F::MaxHeartRate)?,
            exercise_angina: raw.yes_no(F::ExerciseAngina)?,
            st_depression,
            st_slope: raw.category(F::StSlope)?,
            vessels_colored: raw.number(F::VesselsColored)?,
            thalassemia: raw.category(F::Thalassemia)?,
        })
    }
}

impl TryFrom<RawObservation> for PatientObservation {
    type Error = ObservationError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        Self::try_from(&raw)
    }
}

impl From<&PatientObservation> for RawObservation {
    fn from(observation: &PatientObservation) -> Self {
        let mut raw = Self::new();
        for field in ObservationField::ALL {
            raw.set(field, observation.display_value(field));
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("age", "50"),
            ("sex", "Male"),
            ("chest_pain_type", "Typical Angina"),
            ("resting_bp", "120"),
            ("cholesterol", "200"),
            ("fasting_blood_sugar_high", "No"),
            ("resting_ecg", "Normal"),
            ("max_heart_rate", "150"),
            ("exercise_angina", "No"),
            ("st_depression", "0.0"),
            ("st_slope", "Upsloping"),
            ("vessels_colored", "0"),
            ("thalassemia", "Normal"),
        ]
    }

    #[test]
    fn test_category_labels_parse() {
        assert_eq!("Asymptomatic".parse::<ChestPainType>(), Ok(ChestPainType::Asymptomatic));
        assert_eq!(" fixed defect ".parse::<Thalassemia>(), Ok(Thalassemia::FixedDefect));
        assert_eq!(
            "Left Ventricular Hypertrophy".parse::<RestingEcg>(),
            Ok(RestingEcg::LvHypertrophy)
        );
        assert_eq!(
            "ST-T Wave Abnormality".parse::<RestingEcg>(),
            Ok(RestingEcg::StTAbnormality)
        );
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = "Unknown".parse::<ChestPainType>().expect_err("should reject");
        assert_eq!(
            err,
            ObservationError::UnknownCategory {
                field: "chest_pain_type",
                value: "Unknown".to_string(),
            }
        );
        assert!(parse_yes_no("exercise_angina", "maybe").is_err());
    }

    #[test]
    fn test_choice_lists_match_enum_labels() {
        fn labels<'a>(all: &[&'a str]) -> Vec<&'a str> {
            all.to_vec()
        }
        let FieldKind::Choice(cp) = ObservationField::ChestPainType.kind() else {
            panic!("chest pain should be a choice");
        };
        assert_eq!(
            labels(cp),
            ChestPainType::ALL.iter().map(|c| c.label()).collect::<Vec<_>>()
        );
        let FieldKind::Choice(thal) = ObservationField::Thalassemia.kind() else {
            panic!("thalassemia should be a choice");
        };
        assert_eq!(
            labels(thal),
            Thalassemia::ALL.iter().map(|c| c.label()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_raw_observation_parses_defaults() {
        let raw = RawObservation::from_pairs(default_pairs()).expect("known fields");
        let observation = PatientObservation::try_from(&raw).expect("valid submission");
        assert_eq!(observation, PatientObservation::default());
    }

    #[test]
    fn test_raw_observation_accepts_dataset_codes() {
        let mut pairs = default_pairs();
        pairs[2] = ("cp", "Asymptomatic");
        pairs[12] = ("thal", "Reversible Defect");
        let raw = RawObservation::from_pairs(pairs).expect("known fields");
        let observation = PatientObservation::try_from(raw).expect("valid submission");
        assert_eq!(observation.chest_pain_type, ChestPainType::Asymptomatic);
        assert_eq!(observation.thalassemia, Thalassemia::ReversibleDefect);
    }

    #[test]
    fn test_raw_observation_errors() {
        let mut pairs = default_pairs();
        pairs.retain(|(name, _)| *name != "cholesterol");
        let raw = RawObservation::from_pairs(pairs).expect("known fields");
        assert_eq!(
            PatientObservation::try_from(&raw),
            Err(ObservationError::MissingField {
                field: "cholesterol"
            })
        );

        let mut raw = RawObservation::from_pairs(default_pairs()).expect("known fields");
        raw.set(ObservationField::Age, "fifty");
        assert!(matches!(
            PatientObservation::try_from(&raw),
            Err(ObservationError::InvalidNumber { field: "age", .. })
        ));

        raw.set(ObservationField::Age, "50");
        raw.set(ObservationField::StDepression, "NaN");
        assert!(PatientObservation::try_from(&raw).is_err());

        assert!(matches!(
            RawObservation::from_pairs([("heart_shape", "round")]),
            Err(ObservationError::UnknownField(_))
        ));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(PatientObservation::default().validate().is_ok());

        let invalid = PatientObservation {
            age: 12,
            st_depression: 7.5,
            vessels_colored: 4,
            ..Default::default()
        };
        let errors = invalid.validate().expect_err("should fail");
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| matches!(e, ObservationError::OutOfRange { .. })));
    }

    #[test]
    fn test_raw_roundtrip_through_display_values() {
        let observation = PatientObservation {
            sex: Sex::Female,
            resting_ecg: RestingEcg::StTAbnormality,
            exercise_angina: true,
            st_depression: 2.3,
            ..Default::default()
        };
        let raw = RawObservation::from(&observation);
        assert_eq!(raw.get(ObservationField::ExerciseAngina), Some("Yes"));
        assert_eq!(PatientObservation::try_from(&raw), Ok(observation));
    }

    #[test]
    fn test_two_decimal_st_depression_survives_roundtrip() {
        let observation = PatientObservation {
            st_depression: 2.35,
            ..Default::default()
        };
        let raw = RawObservation::from(&observation);
        assert_eq!(raw.get(ObservationField::StDepression), Some("2.35"));
        assert_eq!(PatientObservation::try_from(&raw), Ok(observation));
        assert_eq!(
            PatientObservation::default().display_value(ObservationField::StDepression),
            "1.0"
        );
    }

    #[test]
    fn test_clear_wipes_values() {
        let mut raw = RawObservation::from_pairs(default_pairs()).expect("known fields");
        raw.clear();
        assert!(ObservationField::ALL.iter().all(|f| raw.get(*f).is_none()));
    }
}
