//! ONNX Classifier using tract
//!
//! Runs a converted classifier graph (e.g. a LightGBM or scikit-learn model exported
//! with `zipmap=False`) whose outputs are an `int64` label tensor and a `[1, 2]` float
//! probability tensor.

use crate::classifier::{check_dimension, Classifier, Label};
use crate::InferenceError;
use feature_engine::FeatureVector;
use std::path::Path;
use tracing::info;
use tract_onnx::prelude::*;

/// Index of the label output in the graph
const LABEL_OUTPUT: usize = 0;
/// Index of the class-probability output in the graph
const PROBABILITY_OUTPUT: usize = 1;

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Classifier backed by an optimized tract plan
pub struct OnnxClassifier {
    plan: OnnxPlan,
    dimension: usize,
}

impl OnnxClassifier {
    /// Load and optimize an ONNX graph taking a `[1, dimension]` f32 input
    pub fn load(path: &Path, dimension: usize) -> Result<Self, InferenceError> {
        info!("Loading ONNX classifier from {}", path.display());

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, dimension]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

        Ok(Self { plan, dimension })
    }

    fn run(&self, features: &FeatureVector) -> Result<TVec<TValue>, InferenceError> {
        check_dimension(self.dimension, features)?;

        let values: Vec<f32> = features.values().iter().map(|&v| v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.dimension), values)
            .map_err(|e| InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", self.dimension),
                actual: e.to_string(),
            })?
            .into();

        self.plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))
    }
}

fn output<'a>(outputs: &'a TVec<TValue>, index: usize) -> Result<&'a TValue, InferenceError> {
    outputs.get(index).ok_or_else(|| {
        InferenceError::InferenceFailed(format!(
            "model produced {} outputs, expected output {}",
            outputs.len(),
            index
        ))
    })
}

impl Classifier for OnnxClassifier {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label, InferenceError> {
        read_label(&self.run(features)?)
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        read_probability(&self.run(features)?)
    }

    fn classify(&self, features: &FeatureVector) -> Result<(Label, f64), InferenceError> {
        let outputs = self.run(features)?;
        Ok((read_label(&outputs)?, read_probability(&outputs)?))
    }
}

fn read_label(outputs: &TVec<TValue>) -> Result<Label, InferenceError> {
    let labels = output(outputs, LABEL_OUTPUT)?
        .to_array_view::<i64>()
        .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
    let label = labels
        .iter()
        .next()
        .copied()
        .ok_or_else(|| InferenceError::InferenceFailed("empty label output".into()))?;
    Label::from_class_index(label)
}

fn read_probability(outputs: &TVec<TValue>) -> Result<f64, InferenceError> {
    let probabilities = output(outputs, PROBABILITY_OUTPUT)?
        .to_array_view::<f32>()
        .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
    // Row 0, column 1: positive class
    probabilities
        .iter()
        .nth(1)
        .map(|&p| p as f64)
        .ok_or_else(|| InferenceError::InferenceFailed("probability output has fewer than 2 classes".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_model_file() {
        let result = OnnxClassifier::load(Path::new("/nonexistent/model.onnx"), 10);
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_garbage_model_file() {
        let mut file = tempfile::Builder::new().suffix(".onnx").tempfile().unwrap();
        file.write_all(b"not an onnx graph").unwrap();
        let result = OnnxClassifier::load(file.path(), 10);
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }
}
