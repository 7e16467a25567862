//! Catalog Feature Builder
//!
//! Turns one KOI catalog row into the five planetary features
//! {semi-major axis, radius, mass, density, equilibrium temperature}.

use crate::estimator::{estimate_density, estimate_mass};
use crate::features::{FeatureLayout, FeatureVector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog disposition label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Disposition {
    Confirmed,
    Candidate,
    FalsePositive,
    /// Any label outside the known set, kept verbatim
    Other(String),
}

impl Disposition {
    /// Whether the label is `CANDIDATE` (case-insensitive)
    pub fn is_candidate(&self) -> bool {
        matches!(self, Disposition::Candidate)
    }

    /// Binary training target: CONFIRMED and CANDIDATE are positives
    pub fn training_target(&self) -> u8 {
        match self {
            Disposition::Confirmed | Disposition::Candidate => 1,
            Disposition::FalsePositive | Disposition::Other(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Disposition::Confirmed => "CONFIRMED",
            Disposition::Candidate => "CANDIDATE",
            Disposition::FalsePositive => "FALSE POSITIVE",
            Disposition::Other(label) => label,
        }
    }
}

// Looser than the archive's exact upper-case labels: surrounding whitespace and case are ignored.
impl From<&str> for Disposition {
    fn from(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "CONFIRMED" => Disposition::Confirmed,
            "CANDIDATE" => Disposition::Candidate,
            "FALSE POSITIVE" => Disposition::FalsePositive,
            _ => Disposition::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for Disposition {
    fn from(label: String) -> Self {
        Disposition::from(label.as_str())
    }
}

impl From<Disposition> for String {
    fn from(disposition: Disposition) -> Self {
        disposition.as_str().to_string()
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the KOI cumulative catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub kepid: u64,
    #[serde(rename = "koi_disposition")]
    pub disposition: Disposition,
    /// Orbital semi-major axis (AU)
    #[serde(rename = "koi_sma", default)]
    pub semi_major_axis: Option<f64>,
    /// Stellar radius (solar radii)
    #[serde(rename = "koi_srad", default)]
    pub stellar_radius: Option<f64>,
    /// Planetary radius (Earth radii)
    #[serde(rename = "koi_prad", default)]
    pub planet_radius: Option<f64>,
    /// Equilibrium temperature (K)
    #[serde(rename = "koi_teq", default)]
    pub equilibrium_temperature: Option<f64>,
}

/// Numeric catalog columns a derived feature can be sourced from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogField {
    SemiMajorAxis,
    StellarRadius,
    PlanetRadius,
    EquilibriumTemperature,
}

/// Semi-major axis sources, in priority order.
///
/// The stellar radius stands in when the orbital distance is absent. It is a known
/// proxy, not a physical equivalence, and downstream consumers must treat it as such.
pub const SEMI_MAJOR_AXIS_SOURCES: &[CatalogField] =
    &[CatalogField::SemiMajorAxis, CatalogField::StellarRadius];

/// Planetary radius sources, in priority order
pub const PLANET_RADIUS_SOURCES: &[CatalogField] = &[CatalogField::PlanetRadius];

/// Equilibrium temperature sources, in priority order
pub const EQUILIBRIUM_TEMPERATURE_SOURCES: &[CatalogField] =
    &[CatalogField::EquilibriumTemperature];

impl CatalogRecord {
    /// Value of a numeric column; `NaN` cells count as missing
    pub fn field(&self, field: CatalogField) -> Option<f64> {
        let value = match field {
            CatalogField::SemiMajorAxis => self.semi_major_axis,
            CatalogField::StellarRadius => self.stellar_radius,
            CatalogField::PlanetRadius => self.planet_radius,
            CatalogField::EquilibriumTemperature => self.equilibrium_temperature,
        };
        value.filter(|v| !v.is_nan())
    }

    /// First present value along a fallback chain
    pub fn resolve(&self, sources: &[CatalogField]) -> Option<f64> {
        sources.iter().find_map(|&field| self.field(field))
    }
}

/// Features derived from one catalog row.
///
/// `None` marks a source column that was absent. `NaN` in `mass` / `density` marks a
/// quantity that is undefined for the given radius. The two states are never merged here;
/// the result schema decides how each is rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogFeatures {
    pub semi_major_axis: Option<f64>,
    pub radius: Option<f64>,
    pub mass: f64,
    pub density: f64,
    pub equilibrium_temperature: Option<f64>,
}

impl CatalogFeatures {
    /// Derive the features of one record
    pub fn derive(record: &CatalogRecord) -> Self {
        let semi_major_axis = record.resolve(SEMI_MAJOR_AXIS_SOURCES);
        let radius = record.resolve(PLANET_RADIUS_SOURCES);
        let mass = estimate_mass(radius.unwrap_or(f64::NAN));
        let density = estimate_density(mass, radius.unwrap_or(f64::NAN));
        let equilibrium_temperature = record.resolve(EQUILIBRIUM_TEMPERATURE_SOURCES);

        Self {
            semi_major_axis,
            radius,
            mass,
            density,
            equilibrium_temperature,
        }
    }

    /// Positional vector in catalog layout order; missing values become `NaN`
    pub fn to_vector(&self) -> FeatureVector {
        let values = vec![
            self.semi_major_axis.unwrap_or(f64::NAN),
            self.radius.unwrap_or(f64::NAN),
            self.mass,
            self.density,
            self.equilibrium_temperature.unwrap_or(f64::NAN),
        ];
        FeatureVector::from_parts(FeatureLayout::Catalog, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(disposition: &str) -> CatalogRecord {
        CatalogRecord {
            kepid: 10797460,
            disposition: Disposition::from(disposition),
            semi_major_axis: None,
            stellar_radius: Some(0.9),
            planet_radius: Some(2.0),
            equilibrium_temperature: Some(793.0),
        }
    }

    #[test]
    fn test_stellar_radius_fallback() {
        let features = CatalogFeatures::derive(&record("CANDIDATE"));
        assert_eq!(features.semi_major_axis, Some(0.9));
        assert_eq!(features.radius, Some(2.0));
        assert_eq!(features.mass, 2.0f64.powf(3.7));
        assert_eq!(features.equilibrium_temperature, Some(793.0));
    }

    #[test]
    fn test_semi_major_axis_preferred_when_present() {
        let mut row = record("CONFIRMED");
        row.semi_major_axis = Some(0.0853);
        let features = CatalogFeatures::derive(&row);
        assert_eq!(features.semi_major_axis, Some(0.0853));
    }

    #[test]
    fn test_nan_cell_falls_through_chain() {
        let mut row = record("CONFIRMED");
        row.semi_major_axis = Some(f64::NAN);
        assert_eq!(row.resolve(SEMI_MAJOR_AXIS_SOURCES), Some(0.9));
    }

    #[test]
    fn test_missing_radius_leaves_mass_unknown() {
        let mut row = record("CANDIDATE");
        row.planet_radius = None;
        let features = CatalogFeatures::derive(&row);
        assert_eq!(features.radius, None);
        assert!(features.mass.is_nan());
        assert!(features.density.is_nan());
    }

    #[test]
    fn test_zero_radius_leaves_mass_unknown() {
        let mut row = record("CANDIDATE");
        row.planet_radius = Some(0.0);
        let features = CatalogFeatures::derive(&row);
        assert_eq!(features.radius, Some(0.0));
        assert!(features.mass.is_nan());
        assert!(features.density.is_nan());
    }

    #[test]
    fn test_vector_layout_order() {
        let features = CatalogFeatures::derive(&record("CANDIDATE"));
        let vector = features.to_vector();
        assert_eq!(vector.layout(), FeatureLayout::Catalog);
        assert_eq!(vector.values()[0], 0.9);
        assert_eq!(vector.values()[1], 2.0);
        assert_eq!(vector.values()[4], 793.0);
    }

    #[test]
    fn test_disposition_parsing() {
        assert!(Disposition::from("candidate").is_candidate());
        assert!(Disposition::from(" CANDIDATE ").is_candidate());
        assert_eq!(Disposition::from("False Positive"), Disposition::FalsePositive);
        assert_eq!(
            Disposition::from("NOT DISPOSITIONED"),
            Disposition::Other("NOT DISPOSITIONED".to_string())
        );
    }

    #[test]
    fn test_training_target() {
        assert_eq!(Disposition::Confirmed.training_target(), 1);
        assert_eq!(Disposition::Candidate.training_target(), 1);
        assert_eq!(Disposition::FalsePositive.training_target(), 0);
        assert_eq!(Disposition::Other("?".into()).training_target(), 0);
    }
}
