//! Fitted Feature Normalization
//!
//! Applies the per-feature `(x - center) / scale` rescaling produced at training
//! time. The scaler is fitted elsewhere; here it is loaded once and shared read-only.

use crate::error::ValidationError;
use feature_engine::{FeatureLayout, FeatureVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fitted, immutable feature transform
pub trait Scaler: Send + Sync {
    /// Layout the scaler was fitted on
    fn layout(&self) -> FeatureLayout;

    /// Rescale a feature vector; shape mismatches are contract violations
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, ValidationError>;
}

/// Serialized scaler parameters as written by the training side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScalerParams {
    #[serde(default = "default_layout")]
    layout: FeatureLayout,
    center: Vec<f64>,
    scale: Vec<f64>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

fn default_layout() -> FeatureLayout {
    FeatureLayout::LightCurve
}

/// Standard (z-score) scaler with fitted per-feature center and scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StandardScalerParams", into = "StandardScalerParams")]
pub struct StandardScaler {
    layout: FeatureLayout,
    center: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Create a scaler, validating it against the layout it claims to fit
    pub fn new(layout: FeatureLayout, center: Vec<f64>, scale: Vec<f64>) -> Result<Self, ValidationError> {
        let expected = layout.dimension();
        if center.len() != expected || scale.len() != expected {
            return Err(ValidationError::ShapeMismatch {
                expected: format!("{:?} layout with {} features", layout, expected),
                actual: format!("center {} / scale {}", center.len(), scale.len()),
            });
        }
        if let Some((index, &value)) = center.iter().enumerate().find(|(_, c)| !c.is_finite()) {
            return Err(ValidationError::InvalidCenter { index, value });
        }
        if let Some((index, &value)) = scale
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s == 0.0)
        {
            return Err(ValidationError::InvalidScale { index, value });
        }

        debug!("Created standard scaler for {:?} layout", layout);
        Ok(Self { layout, center, scale })
    }

    pub fn center(&self) -> &[f64] {
        &self.center
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

impl TryFrom<StandardScalerParams> for StandardScaler {
    type Error = ValidationError;

    fn try_from(params: StandardScalerParams) -> Result<Self, Self::Error> {
        if let Some(names) = &params.feature_names {
            let expected = params.layout.names();
            if names.len() != expected.len() || names.iter().zip(expected).any(|(a, b)| a != b) {
                return Err(ValidationError::ShapeMismatch {
                    expected: expected.join(","),
                    actual: names.join(","),
                });
            }
        }
        Self::new(params.layout, params.center, params.scale)
    }
}

impl From<StandardScaler> for StandardScalerParams {
    fn from(scaler: StandardScaler) -> Self {
        Self {
            feature_names: Some(scaler.layout.names().iter().map(|n| n.to_string()).collect()),
            layout: scaler.layout,
            center: scaler.center,
            scale: scaler.scale,
        }
    }
}

impl Scaler for StandardScaler {
    fn layout(&self) -> FeatureLayout {
        self.layout
    }

    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, ValidationError> {
        if features.layout() != self.layout || features.len() != self.center.len() {
            return Err(ValidationError::ShapeMismatch {
                expected: format!("{:?} layout with {} features", self.layout, self.center.len()),
                actual: format!("{:?} layout with {} features", features.layout(), features.len()),
            });
        }

        let values = features
            .values()
            .iter()
            .zip(self.center.iter().zip(&self.scale))
            .map(|(x, (center, scale))| (x - center) / scale)
            .collect();

        FeatureVector::new(self.layout, values).map_err(|e| ValidationError::ShapeMismatch {
            expected: format!("{:?} layout", self.layout),
            actual: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fitted() -> StandardScaler {
        StandardScaler::new(
            FeatureLayout::LightCurve,
            vec![1.0, 0.01, 1.0, 0.95, 1.05, -0.1, 2.0, 0.05, 0.0, 0.01],
            vec![0.01, 0.005, 0.01, 0.02, 0.02, 1.5, 4.0, 0.03, 1e-6, 0.005],
        )
        .unwrap()
    }

    #[test]
    fn test_zero_vector_maps_to_negated_scaled_center() {
        let scaler = fitted();
        let zero = FeatureVector::new(FeatureLayout::LightCurve, vec![0.0; 10]).unwrap();
        let scaled = scaler.transform(&zero).unwrap();
        for i in 0..10 {
            assert_eq!(scaled.values()[i], -scaler.center()[i] / scaler.scale()[i]);
        }
    }

    #[test]
    fn test_layout_mismatch_is_rejected() {
        let scaler = fitted();
        let catalog = FeatureVector::new(FeatureLayout::Catalog, vec![1.0; 5]).unwrap();
        assert!(matches!(
            scaler.transform(&catalog),
            Err(ValidationError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_fitted_length_must_match_layout() {
        let result = StandardScaler::new(FeatureLayout::LightCurve, vec![0.0; 9], vec![1.0; 9]);
        assert!(matches!(result, Err(ValidationError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let mut scale = vec![1.0; 10];
        scale[3] = 0.0;
        let result = StandardScaler::new(FeatureLayout::LightCurve, vec![0.0; 10], scale);
        assert_eq!(result, Err(ValidationError::InvalidScale { index: 3, value: 0.0 }));
    }

    #[test]
    fn test_deserialize_validates_feature_names() {
        let json = r#"{
            "center": [0,0,0,0,0,0,0,0,0,0],
            "scale": [1,1,1,1,1,1,1,1,1,1],
            "feature_names": ["flux_std","flux_mean","flux_median","flux_min","flux_max",
                              "flux_skew","flux_kurt","dip_max","dip_mean","dip_std"]
        }"#;
        assert!(serde_json::from_str::<StandardScaler>(json).is_err());
    }

    #[test]
    fn test_deserialize_defaults_to_light_curve_layout() {
        let json = r#"{"center": [0,0,0,0,0,0,0,0,0,0], "scale": [2,2,2,2,2,2,2,2,2,2]}"#;
        let scaler: StandardScaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.layout(), FeatureLayout::LightCurve);
    }

    proptest! {
        #[test]
        fn prop_transform_is_per_feature_linear(
            x in prop::collection::vec(-1e3f64..1e3, 10),
            center in prop::collection::vec(-1e3f64..1e3, 10),
            scale in prop::collection::vec(1e-3f64..1e3, 10),
        ) {
            let scaler = StandardScaler::new(FeatureLayout::LightCurve, center.clone(), scale.clone()).unwrap();
            let input = FeatureVector::new(FeatureLayout::LightCurve, x.clone()).unwrap();
            let output = scaler.transform(&input).unwrap();
            for i in 0..10 {
                prop_assert_eq!(output.values()[i], (x[i] - center[i]) / scale[i]);
            }
        }
    }
}
