//! Exoplanet Pipeline Facade
//!
//! Ties the catalog repository, light-curve reader, validator, feature extraction and
//! inference engine together, and defines the two result schemas handed to callers.

mod config;
mod pipeline;
mod response;

pub use config::PipelineConfig;
pub use pipeline::ExoplanetPipeline;
pub use response::{CatalogFeatureSummary, CatalogQueryResult, LightCurveFeatureReport, LightCurvePrediction};

use data_validator::ValidationError;
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use storage::StorageError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No planet found with Kepid {0}")]
    NotFound(u64),
    #[error("{0} is not configured")]
    MissingConfig(&'static str),
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Invalid light curve: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Initialize logging to stderr; unknown level names fall back to `info`
pub fn init_logging(level: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
