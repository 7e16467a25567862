//! Physical-Quantity Estimation
//!
//! Empirical scaling laws for planets where only the radius is measured. All
//! quantities are Earth-relative except the density, which is reported in g/cm³.
//! Invalid domains map to `NaN` ("unknown"), never to zero.

use std::f64::consts::PI;

/// Exponent of the empirical mass-radius power law (M ∝ R^3.7)
pub const MASS_RADIUS_EXPONENT: f64 = 3.7;

/// Mean density of the Earth (g/cm³)
pub const EARTH_DENSITY_G_CM3: f64 = 5.51;

/// Volume of a sphere of one Earth radius, in Earth-radii³
const EARTH_VOLUME: f64 = 4.0 / 3.0 * PI;

/// Estimate the planet mass (Earth masses) from its radius (Earth radii).
///
/// Returns `NaN` for non-positive or missing (`NaN`) radii.
pub fn estimate_mass(radius: f64) -> f64 {
    if radius > 0.0 {
        radius.powf(MASS_RADIUS_EXPONENT)
    } else {
        f64::NAN
    }
}

/// Estimate the bulk density (g/cm³) from mass (Earth masses) and radius (Earth radii).
///
/// The sphere volume is expressed relative to the Earth's, so an Earth analogue
/// (`mass = 1`, `radius = 1`) yields [`EARTH_DENSITY_G_CM3`]. Returns `NaN` unless
/// both inputs are positive.
pub fn estimate_density(mass: f64, radius: f64) -> f64 {
    if mass > 0.0 && radius > 0.0 {
        let volume = 4.0 / 3.0 * PI * radius.powi(3);
        mass / (volume / EARTH_VOLUME) * EARTH_DENSITY_G_CM3
    } else {
        f64::NAN
    }
}
