//! Fitted Artifact Loading
//!
//! Scaler and classifier artifacts are read once at startup. The format follows the
//! file extension: `.json` (serde_json), `.bin` / `.postcard` (postcard) or `.onnx`.

use crate::classifier::{Classifier, LogisticClassifier};
use crate::onnx::OnnxClassifier;
use crate::tree::TreeEnsembleClassifier;
use crate::InferenceError;
use data_validator::StandardScaler;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// On-disk artifact encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Postcard,
    Onnx,
}

impl ArtifactFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(ArtifactFormat::Json),
            Some("bin") | Some("postcard") => Ok(ArtifactFormat::Postcard),
            Some("onnx") => Ok(ArtifactFormat::Onnx),
            _ => Err(InferenceError::InvalidArtifact(format!(
                "unrecognized artifact extension: {}",
                path.display()
            ))),
        }
    }
}

/// Serialized classifier backends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Logistic(LogisticClassifier),
    TreeEnsemble(TreeEnsembleClassifier),
}

impl ClassifierArtifact {
    /// Validate and wrap as a shareable classifier
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, InferenceError> {
        match self {
            ClassifierArtifact::Logistic(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
            ClassifierArtifact::TreeEnsemble(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
        }
    }
}

fn read_serialized<T: DeserializeOwned>(path: &Path, format: ArtifactFormat) -> Result<T, InferenceError> {
    let bytes = std::fs::read(path)
        .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
    match format {
        ArtifactFormat::Json => serde_json::from_slice(&bytes)
            .map_err(|e| InferenceError::InvalidArtifact(format!("{}: {}", path.display(), e))),
        ArtifactFormat::Postcard => postcard::from_bytes(&bytes)
            .map_err(|e| InferenceError::InvalidArtifact(format!("{}: {}", path.display(), e))),
        ArtifactFormat::Onnx => Err(InferenceError::InvalidArtifact(format!(
            "{} is an ONNX graph, not a serialized artifact",
            path.display()
        ))),
    }
}

/// Load a fitted scaler
pub fn load_scaler(path: &Path) -> Result<StandardScaler, InferenceError> {
    let format = ArtifactFormat::from_path(path)?;
    let scaler: StandardScaler = read_serialized(path, format)?;
    info!("Loaded scaler from {} ({:?})", path.display(), format);
    Ok(scaler)
}

/// Load a fitted classifier taking `dimension` features
pub fn load_classifier(path: &Path, dimension: usize) -> Result<Arc<dyn Classifier>, InferenceError> {
    let format = ArtifactFormat::from_path(path)?;
    let classifier = match format {
        ArtifactFormat::Onnx => Arc::new(OnnxClassifier::load(path, dimension)?) as Arc<dyn Classifier>,
        ArtifactFormat::Json | ArtifactFormat::Postcard => {
            read_serialized::<ClassifierArtifact>(path, format)?.into_classifier()?
        }
    };

    if classifier.dimension() != dimension {
        return Err(InferenceError::InvalidInputShape {
            expected: format!("{} features", dimension),
            actual: format!("classifier fitted on {} features", classifier.dimension()),
        });
    }

    info!("Loaded classifier from {} ({:?})", path.display(), format);
    Ok(classifier)
}
