use serde::{Deserialize, Serialize};
use crate::core::PredictionError;

/// A pre-trained regression model producing one scalar per feature vector
pub trait Regressor: Send + Sync {
    /// Width of the feature vector the model was trained on
    fn n_features(&self) -> usize;

    fn predict(&self, x: &[f64]) -> Result<f64, PredictionError>;
}

/// Ordinary linear regression: `intercept + coefficients · x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, PredictionError> {
        let model = Self { coefficients, intercept };
        model.check()?;
        Ok(model)
    }

    /// Reject empty or non-finite parameter sets
    pub fn check(&self) -> Result<(), PredictionError> {
        if self.coefficients.is_empty() {
            return Err(PredictionError::ModelUnavailable(
                "regression model has no coefficients".to_string(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PredictionError::ModelUnavailable(
                "regression model has non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }
}

impl Regressor for LinearRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, x: &[f64]) -> Result<f64, PredictionError> {
        if x.len() != self.coefficients.len() {
            return Err(PredictionError::Schema(format!(
                "model expects {} features, got {}",
                self.coefficients.len(),
                x.len()
            )));
        }

        let dot: f64 = self.coefficients.iter().zip(x).map(|(c, v)| c * v).sum();
        Ok(self.intercept + dot)
    }
}

/// Score an expanded feature vector
pub fn score(vector: &[f64], model: &dyn Regressor) -> Result<f64, PredictionError> {
    let scaled = model.predict(vector)?;
    if !scaled.is_finite() {
        return Err(PredictionError::computation(
            "prediction",
            format!("model produced non-finite value {}", scaled),
        ));
    }
    Ok(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegression::new(vec![0.0, 2.0, -1.0], 0.5).unwrap();
        assert_eq!(score(&[1.0, 3.0, 4.0], &model).unwrap(), 2.5);
    }

    #[test]
    fn test_width_mismatch_is_schema_error() {
        let model = LinearRegression::new(vec![1.0, 1.0], 0.0).unwrap();
        assert!(matches!(model.predict(&[1.0]), Err(PredictionError::Schema(_))));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(LinearRegression::new(vec![], 0.0).is_err());
        assert!(LinearRegression::new(vec![f64::INFINITY], 0.0).is_err());
    }

    #[test]
    fn test_non_finite_output_rejected() {
        let model = LinearRegression::new(vec![1e308], 0.0).unwrap();
        let result = score(&[1e308], &model);
        assert!(matches!(result, Err(PredictionError::Computation { .. })));
    }

    #[test]
    fn test_deserialize_without_intercept() {
        let model: LinearRegression = serde_json::from_str(r#"{"coefficients": [1.5, 2.0]}"#).unwrap();
        assert_eq!(model.intercept, 0.0);
        assert_eq!(model.n_features(), 2);
    }
}
