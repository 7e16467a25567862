//! Data Validation and Normalization
//!
//! Provides light-curve input validation and the fitted linear rescaling applied to
//! feature vectors before classification.

mod error;
mod normalizer;
mod validator;

pub use error::ValidationError;
pub use normalizer::{Scaler, StandardScaler};
pub use validator::{ValidationConfig, ValidationResult, Validator};
