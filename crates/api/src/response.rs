//! Result Schemas
//!
//! The two output shapes are part of the external contract, including their
//! inconsistent naming (`prob_existence` vs `probability_of_existence`). They are
//! kept separate on purpose: the catalog "probability" is a ground-truth label
//! indicator, the light-curve one is a model output.

use feature_engine::{CatalogFeatures, CatalogRecord, LightCurveFeatures};
use inference_engine::{Label, Prediction};
use serde::Serialize;

/// Missing source fields render as 0.0; undefined (`NaN`) values are kept and
/// serialize as JSON `null`.
fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// The five catalog features as emitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogFeatureSummary {
    pub pl_orbsmax: f64,
    pub pl_rade: f64,
    pub pl_masse: f64,
    pub pl_dens: f64,
    pub pl_eqt: f64,
}

impl From<&CatalogFeatures> for CatalogFeatureSummary {
    fn from(features: &CatalogFeatures) -> Self {
        Self {
            pl_orbsmax: or_zero(features.semi_major_axis),
            pl_rade: or_zero(features.radius),
            pl_masse: features.mass,
            pl_dens: features.density,
            pl_eqt: or_zero(features.equilibrium_temperature),
        }
    }
}

/// Catalog-query result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogQueryResult {
    #[serde(rename = "Kepid")]
    pub kepid: u64,
    /// 1.0 when the disposition is CANDIDATE, else 0.0; not a model output
    pub prob_existence: f64,
    pub features: CatalogFeatureSummary,
}

impl CatalogQueryResult {
    pub fn assemble(record: &CatalogRecord, features: &CatalogFeatures) -> Self {
        let prob_existence = if record.disposition.is_candidate() { 1.0 } else { 0.0 };
        Self {
            kepid: record.kepid,
            prob_existence,
            features: CatalogFeatureSummary::from(features),
        }
    }
}

/// Light-curve prediction result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightCurvePrediction {
    #[serde(rename = "Kepid", skip_serializing_if = "Option::is_none")]
    pub kepid: Option<u64>,
    pub probability_of_existence: f64,
    pub exoplanet: bool,
    pub non_exoplanet: bool,
}

impl LightCurvePrediction {
    /// Both flags come from the classifier's label, never from the probability
    pub fn assemble(kepid: Option<u64>, prediction: &Prediction) -> Self {
        let exoplanet = prediction.label == Label::Exoplanet;
        Self {
            kepid,
            probability_of_existence: prediction.probability,
            exoplanet,
            non_exoplanet: !exoplanet,
        }
    }
}

/// Named light-curve features, in the order the classifier consumes them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightCurveFeatureReport {
    pub flux_mean: f64,
    pub flux_std: f64,
    pub flux_median: f64,
    pub flux_min: f64,
    pub flux_max: f64,
    pub flux_skew: f64,
    pub flux_kurt: f64,
    pub dip_max: f64,
    pub dip_mean: f64,
    pub dip_std: f64,
}

impl From<&LightCurveFeatures> for LightCurveFeatureReport {
    fn from(features: &LightCurveFeatures) -> Self {
        Self {
            flux_mean: features.flux.mean,
            flux_std: features.flux.std_dev,
            flux_median: features.flux.median,
            flux_min: features.flux.min,
            flux_max: features.flux.max,
            flux_skew: features.flux.skewness,
            flux_kurt: features.flux.kurtosis,
            dip_max: features.dip.max,
            dip_mean: features.dip.mean,
            dip_std: features.dip.std_dev,
        }
    }
}
