//! Pipeline Orchestration

use crate::config::PipelineConfig;
use crate::response::{CatalogQueryResult, LightCurvePrediction};
use crate::PipelineError;
use data_validator::Validator;
use feature_engine::{CatalogFeatures, LightCurveFeatures, LightCurveSample};
use inference_engine::InferenceEngine;
use std::path::PathBuf;
use storage::{light_curve_path, read_light_curve_file, CatalogRepository};
use tracing::{debug, info, warn};

/// Catalog lookup plus light-curve classification.
///
/// Every collaborator is optional so a deployment can serve only the catalog path or
/// only the light-curve path. All state is read-only after construction.
pub struct ExoplanetPipeline {
    catalog: Option<CatalogRepository>,
    engine: Option<InferenceEngine>,
    validator: Validator,
    light_curve_dir: Option<PathBuf>,
}

impl Default for ExoplanetPipeline {
    fn default() -> Self {
        Self {
            catalog: None,
            engine: None,
            validator: Validator::default(),
            light_curve_dir: None,
        }
    }
}

impl ExoplanetPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: CatalogRepository) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_engine(mut self, engine: InferenceEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_light_curve_dir(mut self, dir: PathBuf) -> Self {
        self.light_curve_dir = Some(dir);
        self
    }

    /// Load whatever the configuration points at. Artifact problems are fatal here,
    /// before any request is served.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let mut pipeline = Self::new().with_validator(Validator::new(config.validation.clone()));

        if let Some(path) = &config.catalog_path {
            pipeline = pipeline.with_catalog(CatalogRepository::from_path(path)?);
        }

        match (&config.scaler_path, &config.model_path) {
            (Some(scaler), Some(model)) => {
                pipeline = pipeline.with_engine(InferenceEngine::from_artifacts(scaler, model)?);
            }
            (None, None) => {}
            _ => warn!("Both scaler_path and model_path are needed for light-curve prediction"),
        }

        if let Some(dir) = &config.light_curve_dir {
            pipeline = pipeline.with_light_curve_dir(dir.clone());
        }

        info!(
            "Pipeline ready (catalog: {}, model: {})",
            pipeline.catalog.is_some(),
            pipeline.engine.is_some()
        );
        Ok(pipeline)
    }

    fn catalog(&self) -> Result<&CatalogRepository, PipelineError> {
        self.catalog.as_ref().ok_or(PipelineError::MissingConfig("catalog_path"))
    }

    /// Catalog features and existence indicator for one star
    pub fn query_catalog(&self, kepid: u64) -> Result<CatalogQueryResult, PipelineError> {
        let record = match self.catalog()?.get(kepid) {
            Some(record) => record,
            None => {
                metrics::counter!("exoplanet_catalog_queries_total", "outcome" => "not_found").increment(1);
                debug!("Kepid {} not in catalog", kepid);
                return Err(PipelineError::NotFound(kepid));
            }
        };

        metrics::counter!("exoplanet_catalog_queries_total", "outcome" => "found").increment(1);
        let features = CatalogFeatures::derive(record);
        Ok(CatalogQueryResult::assemble(record, &features))
    }

    /// Validate a sample and extract its ten statistical features
    pub fn light_curve_features(&self, sample: &LightCurveSample) -> Result<LightCurveFeatures, PipelineError> {
        self.validator.validate_light_curve(sample).into_result()?;
        Ok(LightCurveFeatures::extract(sample)?)
    }

    /// Classify a light curve; `kepid` is echoed in the result when given
    pub fn predict_light_curve(
        &self,
        sample: &LightCurveSample,
        kepid: Option<u64>,
    ) -> Result<LightCurvePrediction, PipelineError> {
        let engine = self.engine.as_ref().ok_or(PipelineError::MissingConfig("model_path"))?;
        let features = self.light_curve_features(sample)?;
        let result = engine.predict(&features)?;
        debug!("Light curve classified in {}us", result.latency_us);
        Ok(LightCurvePrediction::assemble(kepid, &result.prediction))
    }

    /// Classify the light curve stored for `kepid` under the configured directory
    pub fn predict_kepid(&self, kepid: u64) -> Result<LightCurvePrediction, PipelineError> {
        let dir = self
            .light_curve_dir
            .as_ref()
            .ok_or(PipelineError::MissingConfig("light_curve_dir"))?;
        let sample = read_light_curve_file(&light_curve_path(dir, kepid))?;
        self.predict_light_curve(&sample, Some(kepid))
    }

    /// `(kepid, target)` pairs in catalog order, using the training label convention
    pub fn training_labels(&self) -> Result<Vec<(u64, u8)>, PipelineError> {
        Ok(self
            .catalog()?
            .records()
            .map(|record| (record.kepid, record.disposition.training_target()))
            .collect())
    }
}
