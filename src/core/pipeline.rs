use std::sync::Arc;
use serde_json::Value;
use crate::core::{
    encoding::encode,
    features::engineer,
    polynomial::{expand, FeatureTransform},
    regression::{score, Regressor},
    scaling::{denormalize, ScalingParams},
    PredictionError,
};
use crate::models::{parse_prediction_request, EngineeredFeatures, PredictionResult, RawRecord};

/// Inference orchestrator
///
/// # Pipeline Stages
/// 1. Encode categorical answers
/// 2. Engineer and scale the three model features
/// 3. Polynomial expansion
/// 4. Regression scoring
/// 5. Inverse scaling to exam-score units
///
/// Holds the loaded artifacts behind `Arc`s; they are never mutated after
/// construction, so clones can be shared across worker threads freely.
#[derive(Clone)]
pub struct InferencePipeline {
    transform: Arc<dyn FeatureTransform>,
    model: Arc<dyn Regressor>,
    scaling: Arc<ScalingParams>,
}

impl std::fmt::Debug for InferencePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferencePipeline")
            .field("features_in", &self.transform.n_features_in())
            .field("features_out", &self.transform.n_features_out())
            .field("scaling", &self.scaling)
            .finish()
    }
}

impl InferencePipeline {
    /// Assemble a pipeline, checking that the artifact shapes line up
    pub fn new(
        transform: Arc<dyn FeatureTransform>,
        model: Arc<dyn Regressor>,
        scaling: Arc<ScalingParams>,
    ) -> Result<Self, PredictionError> {
        let expected_in = EngineeredFeatures::NAMES.len();
        if transform.n_features_in() != expected_in {
            return Err(PredictionError::Schema(format!(
                "transform expects {} input features, pipeline produces {}",
                transform.n_features_in(),
                expected_in
            )));
        }
        if model.n_features() != transform.n_features_out() {
            return Err(PredictionError::Schema(format!(
                "model expects {} features, transform produces {}",
                model.n_features(),
                transform.n_features_out()
            )));
        }

        Ok(Self {
            transform,
            model,
            scaling,
        })
    }

    pub fn n_features_in(&self) -> usize {
        self.transform.n_features_in()
    }

    pub fn n_features_out(&self) -> usize {
        self.transform.n_features_out()
    }

    pub fn scaling(&self) -> &ScalingParams {
        &self.scaling
    }

    /// Predict an exam score for one validated record
    pub fn predict(&self, raw: &RawRecord) -> Result<PredictionResult, PredictionError> {
        let encoded = encode(raw)?;
        let features = engineer(&encoded, &self.scaling)?;
        let expanded = expand(&features, self.transform.as_ref())?;
        let scaled = score(&expanded, self.model.as_ref())?;
        let exam_score = denormalize(scaled, &self.scaling);

        if !exam_score.is_finite() {
            return Err(PredictionError::computation(
                "Exam_Score",
                format!("non-finite score {}", exam_score),
            ));
        }

        tracing::debug!("Scaled prediction {:.6} -> exam score {:.2}", scaled, exam_score);

        Ok(PredictionResult::rounded(exam_score))
    }

    /// Validate a JSON request body and predict from it
    pub fn predict_json(&self, body: &Value) -> Result<PredictionResult, PredictionError> {
        let raw = parse_prediction_request(body)?;
        self.predict(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::polynomial::{PolynomialConfig, PolynomialFeatures};
    use crate::core::regression::LinearRegression;
    use crate::core::scaling::Bounds;
    use crate::models::EXAM_SCORE;

    /// Degree-1 transform with a model that returns Attendance/100 directly
    fn attendance_pipeline() -> InferencePipeline {
        let transform = PolynomialFeatures::new(PolynomialConfig {
            degree: 1,
            include_bias: true,
            interaction_only: false,
            n_features_in: 3,
            feature_names_in: None,
        })
        .unwrap();
        let model = LinearRegression::new(vec![0.0, 0.0, 0.0, 1.0], 0.0).unwrap();
        let scaling = ScalingParams::new([(EXAM_SCORE, Bounds::from((0.0, 100.0)))]).unwrap();

        InferencePipeline::new(Arc::new(transform), Arc::new(model), Arc::new(scaling)).unwrap()
    }

    fn sample_record() -> RawRecord {
        RawRecord {
            hours_studied: 10.0,
            attendance: 80,
            parental_involvement: "High".to_string(),
            access_to_resources: "Medium".to_string(),
            extracurricular_activities: true,
            sleep_hours: 7.0,
            previous_scores: 70,
            motivation_level: "Medium".to_string(),
            internet_access: true,
            tutoring_sessions: 2,
            family_income: "Low".to_string(),
            teacher_quality: "High".to_string(),
            school_type: "Public".to_string(),
            peer_influence: "Positive".to_string(),
            physical_activity: 3,
            learning_disabilities: false,
            parental_education_level: "College".to_string(),
            distance_from_home: "Near".to_string(),
            gender: "Female".to_string(),
        }
    }

    #[test]
    fn test_predict_passes_through_all_stages() {
        let pipeline = attendance_pipeline();
        let result = pipeline.predict(&sample_record()).unwrap();
        assert_eq!(result.value(), 80.0);
    }

    #[test]
    fn test_unknown_category_aborts() {
        let pipeline = attendance_pipeline();
        let mut record = sample_record();
        record.peer_influence = "Hostile".to_string();
        assert!(matches!(pipeline.predict(&record), Err(PredictionError::Validation { .. })));
    }

    #[test]
    fn test_zero_hours_aborts() {
        let pipeline = attendance_pipeline();
        let mut record = sample_record();
        record.hours_studied = 0.0;
        assert!(matches!(pipeline.predict(&record), Err(PredictionError::Computation { .. })));
    }

    #[test]
    fn test_shape_mismatch_rejected_at_construction() {
        let transform = PolynomialFeatures::new(PolynomialConfig {
            degree: 2,
            include_bias: true,
            interaction_only: false,
            n_features_in: 3,
            feature_names_in: None,
        })
        .unwrap();
        let model = LinearRegression::new(vec![1.0; 4], 0.0).unwrap();

        let result = InferencePipeline::new(
            Arc::new(transform),
            Arc::new(model),
            Arc::new(ScalingParams::default()),
        );
        assert!(matches!(result, Err(PredictionError::Schema(_))));
    }
}
