use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use crate::config::ArtifactSettings;
use crate::core::{
    InferencePipeline, LinearRegression, PolynomialConfig, PolynomialFeatures, PredictionError,
    ScalingParams,
};
use crate::models::EngineeredFeatures;

/// The three trained artifacts, loaded once at startup
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub model: LinearRegression,
    pub transformer: PolynomialFeatures,
    pub scaling: ScalingParams,
}

impl ModelArtifacts {
    /// Load model, transformer and scaling parameters, in that order
    ///
    /// Any missing, unreadable or inconsistent artifact is reported as
    /// `ModelUnavailable`; the service must not start without all three.
    pub fn load(settings: &ArtifactSettings) -> Result<Self, PredictionError> {
        let model: LinearRegression = read_json(&settings.model_path)?;
        model.check()?;

        let config: PolynomialConfig = read_json(&settings.transformer_path)?;
        let transformer = PolynomialFeatures::new(config).map_err(unavailable)?;
        transformer
            .check_feature_names(&EngineeredFeatures::NAMES)
            .map_err(unavailable)?;

        let scaling: ScalingParams = read_json(&settings.scaling_path)?;
        scaling.check()?;

        tracing::info!(
            "Loaded artifacts: model ({} coefficients) from {}, transformer (degree {}) from {}, {} scaling entries from {}",
            model.coefficients.len(),
            settings.model_path,
            transformer.config().degree,
            settings.transformer_path,
            scaling.len(),
            settings.scaling_path
        );

        Ok(Self {
            model,
            transformer,
            scaling,
        })
    }

    /// Build the shared inference pipeline from the loaded artifacts
    pub fn into_pipeline(self) -> Result<InferencePipeline, PredictionError> {
        InferencePipeline::new(
            Arc::new(self.transformer),
            Arc::new(self.model),
            Arc::new(self.scaling),
        )
        .map_err(unavailable)
    }
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, PredictionError> {
    let bytes = std::fs::read(Path::new(path)).map_err(|e| {
        PredictionError::ModelUnavailable(format!("cannot read {}: {}", path, e))
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        PredictionError::ModelUnavailable(format!("cannot parse {}: {}", path, e))
    })
}

/// Shape problems found while loading mean the artifacts cannot be served
fn unavailable(err: PredictionError) -> PredictionError {
    match err {
        PredictionError::ModelUnavailable(_) => err,
        other => PredictionError::ModelUnavailable(other.to_string()),
    }
}
