//! Dense network adapter: `Classifier` backed by an exported feed-forward net.
//!
//! The training pipeline exports the trained network's layers to `model.json`
//! (weights, biases and activation per layer). Inference is a plain forward
//! pass; the last layer must be a single sigmoid unit so the output is a
//! probability.

use serde::{Deserialize, Serialize};

use crate::domain::{ObservationField, FEATURE_COUNT};
use crate::ports::{Classifier, ClassifierError};

/// Artifact format understood by this adapter.
pub const FORMAT_VERSION: u32 = 1;

/// Errors found while validating an exported network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("unsupported model format version {0} (expected 1)")]
    UnsupportedVersion(u32),

    #[error("model has no layers")]
    NoLayers,

    #[error("model expects {actual} inputs, the encoder produces {expected}")]
    InputWidth { expected: usize, actual: usize },

    #[error("feature {index} is {actual:?}, expected {expected:?}")]
    FeatureOrder {
        index: usize,
        expected: &'static str,
        actual: String,
    },

    #[error("layer {layer}: {reason}")]
    Shape { layer: usize, reason: String },

    #[error("output layer must be a single sigmoid unit")]
    Output,

    #[error("layer {0} contains non-finite parameters")]
    NonFinite(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Relu => x.max(0.0),
            Self::Sigmoid => sigmoid(x),
            Self::Tanh => x.tanh(),
            Self::Linear => x,
        }
    }
}

/// Logistic function, split by sign so `exp` never overflows.
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// One fully connected layer. `weights[j]` holds the input weights of unit `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    fn input_dim(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn output_dim(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let z: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias;
                self.activation.apply(z)
            })
            .collect()
    }
}

/// Network parameters as written by the export step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedNetwork {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub layers: Vec<DenseLayer>,
}

/// A validated, immutable network.
#[derive(Debug, Clone)]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
    label: String,
}

impl DenseNetwork {
    /// Validate exported parameters.
    ///
    /// Feature names must follow the encoder's order, either as dataset codes
    /// (`cp`, `trestbps`, ...) or as field names (`chest_pain_type`, ...).
    ///
    /// # Errors
    /// Returns the first structural problem found.
    pub fn from_exported(exported: ExportedNetwork) -> Result<Self, ModelError> {
        if exported.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion(exported.format_version));
        }

        if exported.feature_names.len() != FEATURE_COUNT {
            return Err(ModelError::InputWidth {
                expected: FEATURE_COUNT,
                actual: exported.feature_names.len(),
            });
        }
        for (index, (field, name)) in ObservationField::ALL
            .iter()
            .zip(&exported.feature_names)
            .enumerate()
        {
            if name != field.dataset_code() && name != field.name() {
                return Err(ModelError::FeatureOrder {
                    index,
                    expected: field.dataset_code(),
                    actual: name.clone(),
                });
            }
        }

        let first = exported.layers.first().ok_or(ModelError::NoLayers)?;
        if first.input_dim() != FEATURE_COUNT {
            return Err(ModelError::InputWidth {
                expected: FEATURE_COUNT,
                actual: first.input_dim(),
            });
        }

        let mut width = FEATURE_COUNT;
        for (index, layer) in exported.layers.iter().enumerate() {
            if layer.output_dim() == 0 {
                return Err(ModelError::Shape {
                    layer: index,
                    reason: "no units".into(),
                });
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != width) {
                return Err(ModelError::Shape {
                    layer: index,
                    reason: format!("weight row has {} inputs, expected {width}", row.len()),
                });
            }
            if layer.biases.len() != layer.output_dim() {
                return Err(ModelError::Shape {
                    layer: index,
                    reason: format!(
                        "{} biases for {} units",
                        layer.biases.len(),
                        layer.output_dim()
                    ),
                });
            }
            let finite = layer.weights.iter().flatten().chain(&layer.biases).all(|v| v.is_finite());
            if !finite {
                return Err(ModelError::NonFinite(index));
            }
            width = layer.output_dim();
        }

        let last = exported.layers.last().ok_or(ModelError::NoLayers)?;
        if last.output_dim() != 1 || last.activation != Activation::Sigmoid {
            return Err(ModelError::Output);
        }

        let label = format!(
            "dense network ({})",
            exported
                .layers
                .iter()
                .map(|l| l.output_dim().to_string())
                .collect::<Vec<_>>()
                .join("-")
        );

        Ok(Self {
            layers: exported.layers,
            label,
        })
    }

    /// Number of layers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

impl Classifier for DenseNetwork {
    fn input_dim(&self) -> usize {
        FEATURE_COUNT
    }

    fn score(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        if features.len() != FEATURE_COUNT {
            return Err(ClassifierError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: features.len(),
            });
        }
        if features.iter().any(|x| !x.is_finite()) {
            return Err(ClassifierError::Scoring("non-finite input".into()));
        }

        let mut activations = features.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        match activations.as_slice() {
            [p] if p.is_finite() => Ok(*p),
            [p] => Err(ClassifierError::Scoring(format!("non-finite output {p}"))),
            other => Err(ClassifierError::Scoring(format!(
                "expected one output, got {}",
                other.len()
            ))),
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::FEATURE_NAMES;

    /// Logistic regression in network form: one sigmoid unit.
    pub(crate) fn logistic(weights: [f64; FEATURE_COUNT], bias: f64) -> ExportedNetwork {
        ExportedNetwork {
            format_version: FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            layers: vec![DenseLayer {
                weights: vec![weights.to_vec()],
                biases: vec![bias],
                activation: Activation::Sigmoid,
            }],
        }
    }

    #[test]
    fn test_zero_input_scores_bias_only() {
        let net = DenseNetwork::from_exported(logistic([0.3; FEATURE_COUNT], 0.0)).expect("valid");
        let p = net.score(&[0.0; FEATURE_COUNT]).expect("scores");
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_hidden_layer_forward_pass() {
        let mut exported = logistic([0.0; FEATURE_COUNT], 0.0);
        let mut hidden_row = vec![0.0; FEATURE_COUNT];
        hidden_row[0] = 1.0;
        exported.layers = vec![
            DenseLayer {
                weights: vec![hidden_row.clone(), hidden_row.iter().map(|w| -w).collect()],
                biases: vec![0.0, 0.0],
                activation: Activation::Relu,
            },
            DenseLayer {
                weights: vec![vec![2.0, 1.0]],
                biases: vec![-1.0],
                activation: Activation::Sigmoid,
            },
        ];
        let net = DenseNetwork::from_exported(exported).expect("valid");
        assert_eq!(net.depth(), 2);
        assert_eq!(net.describe(), "dense network (2-1)");

        let mut x = [0.0; FEATURE_COUNT];
        x[0] = 1.0;
        // relu -> [1, 0]; 2*1 + 0 - 1 = 1
        let p = net.score(&x).expect("scores");
        assert!((p - sigmoid(1.0)).abs() < 1e-12);

        x[0] = -3.0;
        // relu -> [0, 3]; 0 + 3 - 1 = 2
        let p = net.score(&x).expect("scores");
        assert!((p - sigmoid(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_wrong_input_width() {
        let mut exported = logistic([0.0; FEATURE_COUNT], 0.0);
        exported.layers[0].weights = vec![vec![0.0; 9]];
        assert_eq!(
            DenseNetwork::from_exported(exported).err(),
            Some(ModelError::InputWidth {
                expected: FEATURE_COUNT,
                actual: 9
            })
        );
    }

    #[test]
    fn test_rejects_non_sigmoid_output() {
        let mut exported = logistic([0.0; FEATURE_COUNT], 0.0);
        exported.layers[0].activation = Activation::Linear;
        assert_eq!(DenseNetwork::from_exported(exported).err(), Some(ModelError::Output));
    }

    #[test]
    fn test_rejects_misordered_features() {
        let mut exported = logistic([0.0; FEATURE_COUNT], 0.0);
        exported.feature_names.swap(1, 2);
        assert!(matches!(
            DenseNetwork::from_exported(exported),
            Err(ModelError::FeatureOrder { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_bias_mismatch_and_non_finite() {
        let mut exported = logistic([0.0; FEATURE_COUNT], 0.0);
        exported.layers[0].biases = vec![0.0, 1.0];
        assert!(matches!(
            DenseNetwork::from_exported(exported),
            Err(ModelError::Shape { layer: 0, .. })
        ));

        let mut exported = logistic([0.0; FEATURE_COUNT], 0.0);
        exported.layers[0].weights[0][3] = f64::INFINITY;
        assert_eq!(
            DenseNetwork::from_exported(exported).err(),
            Some(ModelError::NonFinite(0))
        );
    }

    #[test]
    fn test_score_checks_dimension() {
        let net = DenseNetwork::from_exported(logistic([0.0; FEATURE_COUNT], 0.0)).expect("valid");
        assert_eq!(
            net.score(&[0.0; 4]),
            Err(ClassifierError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: 4
            })
        );
        assert!(net.score(&[f64::NAN; FEATURE_COUNT]).is_err());
    }

    #[test]
    fn test_sigmoid_is_stable_for_large_inputs() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
    }

    #[test]
    fn test_accepts_field_names() {
        let mut exported = logistic([0.0; FEATURE_COUNT], 0.0);
        exported.feature_names = ObservationField::ALL
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert!(DenseNetwork::from_exported(exported).is_ok());
    }
}
