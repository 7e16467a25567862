//! Exoplanet Inference Engine
//!
//! Wraps a fitted binary classifier behind the [`Classifier`] contract and runs the
//! normalize-then-classify sequence on light-curve features.

mod artifact;
mod classifier;
mod engine;
mod onnx;
mod tree;

pub use artifact::{load_classifier, load_scaler, ArtifactFormat, ClassifierArtifact};
pub use classifier::{Classifier, Label, LogisticClassifier};
pub use engine::{InferenceEngine, InferenceResult, Prediction};
pub use onnx::OnnxClassifier;
pub use tree::{DecisionTree, TreeEnsembleClassifier, TreeNode};

use data_validator::ValidationError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Normalization failed: {0}")]
    Normalization(#[from] ValidationError),
}
