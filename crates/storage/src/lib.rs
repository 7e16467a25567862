//! Storage Layer
//!
//! Read-only access to the KOI catalog and to per-star light-curve tables.

mod light_curve;
mod repository;

pub use light_curve::{light_curve_path, read_light_curve, read_light_curve_file};
pub use repository::CatalogRepository;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Required column missing: {0}")]
    MissingColumn(&'static str),
    #[error("Invalid value {value:?} in column {column} at line {line}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("Invalid light curve: {0}")]
    InvalidLightCurve(#[from] feature_engine::FeatureError),
}
