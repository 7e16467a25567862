//! Validation Error Types

use thiserror::Error;

/// Errors during data validation and normalization
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Feature vector does not match the shape the scaler was fitted on
    #[error("Feature shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Fitted scale unusable for division
    #[error("Invalid scale {value} for feature {index}")]
    InvalidScale { index: usize, value: f64 },

    /// Fitted center is not a finite number
    #[error("Invalid center {value} for feature {index}")]
    InvalidCenter { index: usize, value: f64 },

    /// Light curve has no samples
    #[error("Light curve sample is empty")]
    EmptyInput,

    /// Flux value is NaN or infinite
    #[error("Non-finite flux {value} at index {index}")]
    NonFiniteFlux { index: usize, value: f64 },
}
