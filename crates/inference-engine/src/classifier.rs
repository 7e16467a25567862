//! Classifier Contract

use crate::InferenceError;
use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};

/// Default decision threshold on the positive-class probability
pub(crate) const DEFAULT_THRESHOLD: f64 = 0.5;

pub(crate) fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Discrete classifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    NonExoplanet,
    Exoplanet,
}

impl Label {
    /// Class index as used at training time (1 = exoplanet)
    pub fn class_index(&self) -> u8 {
        match self {
            Label::NonExoplanet => 0,
            Label::Exoplanet => 1,
        }
    }

    pub fn from_class_index(index: i64) -> Result<Self, InferenceError> {
        match index {
            0 => Ok(Label::NonExoplanet),
            1 => Ok(Label::Exoplanet),
            other => Err(InferenceError::InferenceFailed(format!(
                "classifier returned class {} outside {{0, 1}}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::NonExoplanet => "non_exoplanet",
            Label::Exoplanet => "exoplanet",
        }
    }
}

/// A fitted binary classifier consuming normalized feature vectors.
///
/// Implementations produce their label themselves, so callers never re-derive it
/// from the probability with a threshold of their own.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier was fitted on
    fn dimension(&self) -> usize;

    /// Predicted class
    fn predict(&self, features: &FeatureVector) -> Result<Label, InferenceError>;

    /// Probability of the positive (exoplanet) class, in [0, 1]
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Label and probability together. Backends whose forward pass yields both
    /// outputs override this to evaluate the model once.
    fn classify(&self, features: &FeatureVector) -> Result<(Label, f64), InferenceError> {
        Ok((self.predict(features)?, self.predict_probability(features)?))
    }
}

pub(crate) fn check_dimension(expected: usize, features: &FeatureVector) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::InvalidInputShape {
            expected: format!("{} features", expected),
            actual: format!("{} features", features.len()),
        });
    }
    Ok(())
}

pub(crate) fn check_threshold(threshold: f64) -> Result<(), InferenceError> {
    if !(threshold > 0.0 && threshold < 1.0) {
        return Err(InferenceError::InvalidArtifact(format!(
            "decision threshold {} outside (0, 1)",
            threshold
        )));
    }
    Ok(())
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Fitted logistic-regression classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64, threshold: f64) -> Result<Self, InferenceError> {
        let classifier = Self {
            coefficients,
            intercept,
            threshold,
        };
        classifier.validate()?;
        Ok(classifier)
    }

    pub(crate) fn validate(&self) -> Result<(), InferenceError> {
        if self.coefficients.is_empty() {
            return Err(InferenceError::InvalidArtifact("logistic model has no coefficients".into()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InferenceError::InvalidArtifact("logistic model has non-finite weights".into()));
        }
        check_threshold(self.threshold)
    }

    fn decision(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        check_dimension(self.coefficients.len(), features)?;
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.values())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        if z.is_nan() {
            return Err(InferenceError::InferenceFailed(
                "logistic decision function is undefined for NaN features".into(),
            ));
        }
        Ok(z)
    }
}

impl Classifier for LogisticClassifier {
    fn dimension(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label, InferenceError> {
        let probability = self.predict_probability(features)?;
        Ok(if probability > self.threshold {
            Label::Exoplanet
        } else {
            Label::NonExoplanet
        })
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(sigmoid(self.decision(features)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::FeatureLayout;
    use proptest::prelude::*;

    fn vector(values: Vec<f64>) -> FeatureVector {
        FeatureVector::new(FeatureLayout::LightCurve, values).unwrap()
    }

    fn model(threshold: f64) -> LogisticClassifier {
        let mut coefficients = vec![0.0; 10];
        coefficients[7] = 2.0; // dip_max
        LogisticClassifier::new(coefficients, -1.0, threshold).unwrap()
    }

    #[test]
    fn test_probability_at_decision_boundary() {
        let mut values = vec![0.0; 10];
        values[7] = 0.5;
        let p = model(0.5).predict_probability(&vector(values)).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_label_follows_model_threshold() {
        let mut values = vec![0.0; 10];
        values[7] = 0.75;
        let x = vector(values);
        // sigmoid(0.5) ≈ 0.62
        assert_eq!(model(0.5).predict(&x).unwrap(), Label::Exoplanet);
        assert_eq!(model(0.7).predict(&x).unwrap(), Label::NonExoplanet);
    }

    #[test]
    fn test_classify_matches_separate_calls() {
        let mut values = vec![0.0; 10];
        values[7] = 0.75;
        let x = vector(values);
        let classifier = model(0.5);
        let (label, p) = classifier.classify(&x).unwrap();
        assert_eq!(label, classifier.predict(&x).unwrap());
        assert_eq!(p, classifier.predict_probability(&x).unwrap());
    }

    #[test]
    fn test_dimension_mismatch() {
        let catalog = FeatureVector::new(FeatureLayout::Catalog, vec![0.0; 5]).unwrap();
        assert!(matches!(
            model(0.5).predict_probability(&catalog),
            Err(InferenceError::InvalidInputShape { .. })
        ));
    }

    #[test]
    fn test_nan_feature_is_an_error() {
        let mut values = vec![0.0; 10];
        values[5] = f64::NAN;
        let mut coefficients = vec![0.0; 10];
        coefficients[5] = 1.0;
        let model = LogisticClassifier::new(coefficients, 0.0, 0.5).unwrap();
        assert!(matches!(
            model.predict(&vector(values)),
            Err(InferenceError::InferenceFailed(_))
        ));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert!(LogisticClassifier::new(vec![1.0; 10], 0.0, 1.0).is_err());
        assert!(LogisticClassifier::new(vec![], 0.0, 0.5).is_err());
    }

    #[test]
    fn test_label_class_index() {
        assert_eq!(Label::Exoplanet.class_index(), 1);
        assert_eq!(Label::from_class_index(0).unwrap(), Label::NonExoplanet);
        assert!(Label::from_class_index(2).is_err());
    }

    proptest! {
        #[test]
        fn prop_probability_in_unit_interval(values in prop::collection::vec(-50.0f64..50.0, 10)) {
            let p = model(0.5).predict_probability(&vector(values)).unwrap();
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
