//! Feature Vector Assembly
//!
//! Field order is the contract with the fitted scaler and classifier: both consume
//! vectors positionally. Reordering or adding a field invalidates every fitted artifact.

use crate::statistics::{DipFeatures, StatisticalFeatures};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Catalog feature names in vector order
pub const CATALOG_FEATURE_NAMES: [&str; 5] = ["pl_orbsmax", "pl_rade", "pl_masse", "pl_dens", "pl_eqt"];

/// Light-curve feature names in vector order
pub const LIGHT_CURVE_FEATURE_NAMES: [&str; 10] = [
    "flux_mean",
    "flux_std",
    "flux_median",
    "flux_min",
    "flux_max",
    "flux_skew",
    "flux_kurt",
    "dip_max",
    "dip_mean",
    "dip_std",
];

/// Which fixed shape a feature vector has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    Catalog,
    LightCurve,
}

impl FeatureLayout {
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            FeatureLayout::Catalog => &CATALOG_FEATURE_NAMES,
            FeatureLayout::LightCurve => &LIGHT_CURVE_FEATURE_NAMES,
        }
    }

    pub fn dimension(&self) -> usize {
        self.names().len()
    }
}

/// Fixed-length, fixed-order feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    layout: FeatureLayout,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Build a vector, checking the length against the layout
    pub fn new(layout: FeatureLayout, values: Vec<f64>) -> Result<Self, FeatureError> {
        if values.len() != layout.dimension() {
            return Err(FeatureError::InvalidLength {
                layout,
                expected: layout.dimension(),
                actual: values.len(),
            });
        }
        Ok(Self { layout, values })
    }

    /// Internal constructor for builders that always emit the layout's length
    pub(crate) fn from_parts(layout: FeatureLayout, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), layout.dimension());
        Self { layout, values }
    }

    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (name, value) pairs in layout order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.layout.names().iter().copied().zip(self.values.iter().copied())
    }
}

/// A raw flux series with optional per-sample uncertainty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurveSample {
    flux: Vec<f64>,
    /// Accepted and kept for weighted variants; no current statistic reads it
    flux_err: Option<Vec<f64>>,
}

impl LightCurveSample {
    /// Create a sample; empty flux series are rejected
    pub fn new(flux: Vec<f64>, flux_err: Option<Vec<f64>>) -> Result<Self, FeatureError> {
        if flux.is_empty() {
            return Err(FeatureError::EmptySample);
        }
        if let Some(err) = &flux_err {
            if err.len() != flux.len() {
                return Err(FeatureError::UncertaintyLengthMismatch {
                    flux: flux.len(),
                    uncertainty: err.len(),
                });
            }
        }
        Ok(Self { flux, flux_err })
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn flux_err(&self) -> Option<&[f64]> {
        self.flux_err.as_deref()
    }

    pub fn len(&self) -> usize {
        self.flux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }
}

/// The ten light-curve descriptors fed to the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurveFeatures {
    pub flux: StatisticalFeatures,
    pub dip: DipFeatures,
}

impl LightCurveFeatures {
    /// Extract features from a sample
    pub fn extract(sample: &LightCurveSample) -> Result<Self, FeatureError> {
        let flux = StatisticalFeatures::compute(sample.flux())?;
        let dip = DipFeatures::compute(sample.flux(), flux.mean)?;

        debug!(
            samples = sample.len(),
            mean = flux.mean,
            dip_max = dip.max,
            "Extracted light curve features"
        );

        Ok(Self { flux, dip })
    }

    /// Positional vector in light-curve layout order
    pub fn to_vector(&self) -> FeatureVector {
        let values = vec![
            self.flux.mean,
            self.flux.std_dev,
            self.flux.median,
            self.flux.min,
            self.flux.max,
            self.flux.skewness,
            self.flux.kurtosis,
            self.dip.max,
            self.dip.mean,
            self.dip.std_dev,
        ];
        FeatureVector::from_parts(FeatureLayout::LightCurve, values)
    }
}
