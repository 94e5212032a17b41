//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the prediction pipeline and the model implementation.

mod classifier;

pub use classifier::{Classifier, ClassifierError};
