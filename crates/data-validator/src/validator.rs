//! Light-Curve Input Validator

use crate::error::ValidationError;
use feature_engine::LightCurveSample;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Let NaN / infinite flux values through to the statistics
    pub allow_non_finite: bool,
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of samples checked
    pub samples_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(samples_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            samples_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, samples_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            samples_checked,
        }
    }

    /// First error, if any
    pub fn into_result(self) -> Result<usize, ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.samples_checked),
        }
    }
}

/// Validator for light-curve samples
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a light-curve sample, collecting the first problem of each kind.
    ///
    /// Uncertainties are not consumed by any feature; suspicious values are only logged.
    pub fn validate_light_curve(&self, sample: &LightCurveSample) -> ValidationResult {
        if sample.is_empty() {
            return ValidationResult::invalid(vec![ValidationError::EmptyInput], 0);
        }

        let mut errors = Vec::new();

        if !self.config.allow_non_finite {
            if let Some((index, &value)) = sample.flux().iter().enumerate().find(|(_, f)| !f.is_finite()) {
                errors.push(ValidationError::NonFiniteFlux { index, value });
            }
        }

        if let Some(flux_err) = sample.flux_err() {
            let suspicious = flux_err.iter().filter(|e| e.is_nan() || **e < 0.0).count();
            if suspicious > 0 {
                warn!("{} flux uncertainties are NaN or negative; they are ignored", suspicious);
            }
        }

        if errors.is_empty() {
            ValidationResult::valid(sample.len())
        } else {
            warn!("Light curve failed validation: {} problem(s)", errors.len());
            ValidationResult::invalid(errors, sample.len())
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_light_curve() {
        let validator = Validator::default();
        let sample = LightCurveSample::new(vec![1.0, 0.99, 1.01], Some(vec![0.001; 3])).unwrap();
        let result = validator.validate_light_curve(&sample);
        assert!(result.valid);
        assert_eq!(result.samples_checked, 3);
    }

    #[test]
    fn test_non_finite_flux_rejected() {
        let validator = Validator::default();
        let sample = LightCurveSample::new(vec![1.0, f64::NAN, 1.0], None).unwrap();
        let result = validator.validate_light_curve(&sample);
        assert!(!result.valid);
        assert!(matches!(
            result.into_result(),
            Err(ValidationError::NonFiniteFlux { index: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_flux_allowed_by_config() {
        let validator = Validator::new(ValidationConfig {
            allow_non_finite: true,
        });
        let sample = LightCurveSample::new(vec![1.0, f64::INFINITY], None).unwrap();
        assert!(validator.validate_light_curve(&sample).valid);
    }

    #[test]
    fn test_bad_uncertainties_do_not_fail_validation() {
        let validator = Validator::default();
        let sample = LightCurveSample::new(
            vec![1.0, 0.99, 1.0, 1.01],
            Some(vec![0.001, f64::NAN, -0.001, 0.001]),
        )
        .unwrap();
        assert_eq!(validator.validate_light_curve(&sample).into_result(), Ok(4));
    }
}
