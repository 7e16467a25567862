//! Pipeline Configuration

use crate::PipelineError;
use ::config::{Config, Environment, File};
use data_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory when no explicit path is given
const DEFAULT_CONFIG_NAME: &str = "exoplanet";
/// Environment prefix, e.g. `EXOPLANET_MODEL_PATH`
const ENV_PREFIX: &str = "EXOPLANET";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// NASA cumulative KOI table
    pub catalog_path: Option<PathBuf>,
    /// Fitted scaler artifact
    pub scaler_path: Option<PathBuf>,
    /// Fitted classifier artifact
    pub model_path: Option<PathBuf>,
    /// Directory holding `kepler_<kepid>_lightcurve.csv` files
    pub light_curve_dir: Option<PathBuf>,
    pub log_level: String,
    pub validation: ValidationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            scaler_path: None,
            model_path: None,
            light_curve_dir: None,
            log_level: "info".to_string(),
            validation: ValidationConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from an explicit file (required) or `./exoplanet.{toml,json,...}` (optional),
    /// then overlay `EXOPLANET_*` environment variables. Nested keys use `__`,
    /// e.g. `EXOPLANET_VALIDATION__ALLOW_NON_FINITE=true`.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config: PipelineConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}
