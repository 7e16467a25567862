//! Inference Engine Implementation

use crate::artifact::{load_classifier, load_scaler};
use crate::classifier::{Classifier, Label};
use crate::InferenceError;
use data_validator::Scaler;
use feature_engine::{FeatureLayout, LightCurveFeatures};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Prediction result from inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Discrete label as produced by the classifier
    pub label: Label,
    /// Probability of the exoplanet class (0.0 to 1.0)
    pub probability: f64,
    /// Timestamp when prediction was made
    pub timestamp_ms: u64,
}

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: Prediction,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// Normalize-then-classify engine over a fitted scaler and classifier.
///
/// Both collaborators are immutable and shared; the engine is `Send + Sync` and
/// can serve concurrent callers.
#[derive(Clone)]
pub struct InferenceEngine {
    scaler: Arc<dyn Scaler>,
    classifier: Arc<dyn Classifier>,
}

impl InferenceEngine {
    /// Create an engine, checking that scaler and classifier agree on the light-curve shape
    pub fn new(scaler: Arc<dyn Scaler>, classifier: Arc<dyn Classifier>) -> Result<Self, InferenceError> {
        let layout = FeatureLayout::LightCurve;
        if scaler.layout() != layout {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("scaler fitted on {:?} layout", layout),
                actual: format!("{:?}", scaler.layout()),
            });
        }
        if classifier.dimension() != layout.dimension() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("{} features", layout.dimension()),
                actual: format!("classifier fitted on {} features", classifier.dimension()),
            });
        }

        info!("Creating inference engine for {} light-curve features", layout.dimension());
        Ok(Self { scaler, classifier })
    }

    /// Load both artifacts from disk
    pub fn from_artifacts(scaler_path: &Path, model_path: &Path) -> Result<Self, InferenceError> {
        let scaler = load_scaler(scaler_path)?;
        let classifier = load_classifier(model_path, FeatureLayout::LightCurve.dimension())?;
        Self::new(Arc::new(scaler), classifier)
    }

    /// Run inference on extracted light-curve features
    pub fn predict(&self, features: &LightCurveFeatures) -> Result<InferenceResult, InferenceError> {
        let start = std::time::Instant::now();

        let normalized = self.scaler.transform(&features.to_vector())?;
        let (label, probability) = self.classifier.classify(&normalized)?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::InferenceFailed(format!(
                "probability {} outside [0, 1]",
                probability
            )));
        }

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            "Inference completed in {}us: {} (p={:.4})",
            latency_us,
            label.as_str(),
            probability
        );
        metrics::counter!("exoplanet_predictions_total", "label" => label.as_str()).increment(1);
        metrics::histogram!("exoplanet_inference_latency_us").record(latency_us as f64);

        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Ok(InferenceResult {
            prediction: Prediction {
                label,
                probability,
                timestamp_ms,
            },
            latency_us,
        })
    }
}
