use serde::{Deserialize, Serialize};
use crate::core::PredictionError;
use crate::models::EngineeredFeatures;

/// A fitted, stateless feature transform
pub trait FeatureTransform: Send + Sync {
    /// Number of input features the transform was fitted on
    fn n_features_in(&self) -> usize;

    /// Number of features produced
    fn n_features_out(&self) -> usize;

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, PredictionError>;
}

/// Stored parameters of a fitted polynomial feature transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialConfig {
    pub degree: u32,
    #[serde(default = "default_true")]
    pub include_bias: bool,
    #[serde(default)]
    pub interaction_only: bool,
    pub n_features_in: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
}

fn default_true() -> bool { true }

/// Polynomial basis expansion
///
/// Terms are ordered as: bias (if enabled), then for each degree from 1 up,
/// the index combinations (with replacement unless `interaction_only`) in
/// lexicographic order. For inputs `[a, b]` at degree 2 this gives
/// `[1, a, b, a^2, ab, b^2]`.
#[derive(Debug, Clone)]
pub struct PolynomialFeatures {
    config: PolynomialConfig,
    powers: Vec<Vec<u32>>,
}

impl PolynomialFeatures {
    pub fn new(config: PolynomialConfig) -> Result<Self, PredictionError> {
        if config.degree == 0 {
            return Err(PredictionError::ModelUnavailable(
                "polynomial degree must be at least 1".to_string(),
            ));
        }
        if config.n_features_in == 0 {
            return Err(PredictionError::ModelUnavailable(
                "polynomial transform has no input features".to_string(),
            ));
        }
        if let Some(names) = &config.feature_names_in {
            if names.len() != config.n_features_in {
                return Err(PredictionError::Schema(format!(
                    "transform lists {} feature names for {} inputs",
                    names.len(),
                    config.n_features_in
                )));
            }
        }

        let powers = generate_powers(
            config.n_features_in,
            config.degree as usize,
            config.include_bias,
            config.interaction_only,
        );

        Ok(Self { config, powers })
    }

    /// Exponent vector of every output term
    pub fn powers(&self) -> &[Vec<u32>] {
        &self.powers
    }

    pub fn config(&self) -> &PolynomialConfig {
        &self.config
    }

    /// Check that the transform was fitted on exactly these features, in this order
    pub fn check_feature_names(&self, expected: &[&str]) -> Result<(), PredictionError> {
        if self.config.n_features_in != expected.len() {
            return Err(PredictionError::Schema(format!(
                "transform expects {} input features, pipeline produces {}",
                self.config.n_features_in,
                expected.len()
            )));
        }
        if let Some(names) = &self.config.feature_names_in {
            if names.iter().map(String::as_str).ne(expected.iter().copied()) {
                return Err(PredictionError::Schema(format!(
                    "transform fitted on {:?}, pipeline produces {:?}",
                    names, expected
                )));
            }
        }
        Ok(())
    }
}

impl FeatureTransform for PolynomialFeatures {
    fn n_features_in(&self) -> usize {
        self.config.n_features_in
    }

    fn n_features_out(&self) -> usize {
        self.powers.len()
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if input.len() != self.config.n_features_in {
            return Err(PredictionError::Schema(format!(
                "polynomial transform expects {} features, got {}",
                self.config.n_features_in,
                input.len()
            )));
        }

        Ok(self
            .powers
            .iter()
            .map(|term| {
                term.iter()
                    .zip(input)
                    .map(|(&power, &x)| x.powi(power as i32))
                    .product::<f64>()
            })
            .collect())
    }
}

fn generate_powers(
    n_features: usize,
    degree: usize,
    include_bias: bool,
    interaction_only: bool,
) -> Vec<Vec<u32>> {
    let mut powers = Vec::new();
    if include_bias {
        powers.push(vec![0; n_features]);
    }

    let mut current = Vec::with_capacity(degree);
    for d in 1..=degree {
        push_combinations(n_features, d, 0, !interaction_only, &mut current, &mut powers);
    }

    powers
}

fn push_combinations(
    n_features: usize,
    length: usize,
    start: usize,
    with_replacement: bool,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<u32>>,
) {
    if current.len() == length {
        let mut term = vec![0; n_features];
        for &i in current.iter() {
            term[i] += 1;
        }
        out.push(term);
        return;
    }

    for i in start..n_features {
        current.push(i);
        let next = if with_replacement { i } else { i + 1 };
        push_combinations(n_features, length, next, with_replacement, current, out);
        current.pop();
    }
}

/// Expand the engineered features through a fitted transform
pub fn expand(
    features: &EngineeredFeatures,
    transform: &dyn FeatureTransform,
) -> Result<Vec<f64>, PredictionError> {
    transform.transform(&features.to_vector())
}
