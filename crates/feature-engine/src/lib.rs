//! Feature Engineering Engine
//!
//! Derives the fixed feature vectors describing a candidate exoplanet, either from a
//! catalog row (orbital and stellar parameters) or from a raw flux time-series.

mod catalog;
mod estimator;
mod features;
mod statistics;

pub use catalog::{
    CatalogField, CatalogFeatures, CatalogRecord, Disposition, EQUILIBRIUM_TEMPERATURE_SOURCES,
    PLANET_RADIUS_SOURCES, SEMI_MAJOR_AXIS_SOURCES,
};
pub use estimator::{estimate_density, estimate_mass, EARTH_DENSITY_G_CM3, MASS_RADIUS_EXPONENT};
pub use features::{
    FeatureLayout, FeatureVector, LightCurveFeatures, LightCurveSample, CATALOG_FEATURE_NAMES,
    LIGHT_CURVE_FEATURE_NAMES,
};
pub use statistics::{DipFeatures, StatisticalFeatures};

use thiserror::Error;

/// Errors during feature extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Light curve sample is empty")]
    EmptySample,
    #[error("Flux uncertainty length {uncertainty} does not match flux length {flux}")]
    UncertaintyLengthMismatch { flux: usize, uncertainty: usize },
    #[error("Feature vector for {layout:?} layout needs {expected} values, got {actual}")]
    InvalidLength {
        layout: FeatureLayout,
        expected: usize,
        actual: usize,
    },
}
