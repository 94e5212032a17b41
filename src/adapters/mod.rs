//! Adapters layer: Concrete implementations of ports.
//!
//! - `dense`: JSON-exported feed-forward network behind the `Classifier` port
//! - `artifact`: model directory loading and manifest verification
//! - `sanitize`: patient-data filtering for logs

pub mod artifact;
pub mod dense;
pub mod sanitize;

pub use artifact::{load_artifacts, ArtifactError, Manifest, ModelArtifacts};
pub use dense::{DenseNetwork, ModelError};
