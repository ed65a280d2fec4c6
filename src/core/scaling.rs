use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::core::PredictionError;
use crate::models::EXAM_SCORE;

/// Min/max bounds of one feature as seen during training
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<Bounds> for (f64, f64) {
    fn from(bounds: Bounds) -> Self {
        (bounds.min, bounds.max)
    }
}

impl Bounds {
    /// Min-max normalization into the training range
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    /// Inverse of `normalize`
    #[inline]
    pub fn denormalize(&self, scaled: f64) -> f64 {
        scaled * (self.max - self.min) + self.min
    }
}

/// Per-feature scaling bounds, including the `Exam_Score` target
///
/// Serialized as a JSON object mapping names to `[min, max]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScalingParams {
    bounds: BTreeMap<String, Bounds>,
}

impl ScalingParams {
    /// Build scaling params, rejecting degenerate or non-finite bounds
    pub fn new<I, K>(entries: I) -> Result<Self, PredictionError>
    where
        I: IntoIterator<Item = (K, Bounds)>,
        K: Into<String>,
    {
        let params = Self {
            bounds: entries.into_iter().map(|(k, b)| (k.into(), b)).collect(),
        };
        params.check()?;
        Ok(params)
    }

    /// Verify every bound is finite with `max > min`
    pub fn check(&self) -> Result<(), PredictionError> {
        for (name, bounds) in &self.bounds {
            if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.max <= bounds.min {
                return Err(PredictionError::ModelUnavailable(format!(
                    "invalid scaling bounds for {}: [{}, {}]",
                    name, bounds.min, bounds.max
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Bounds> {
        self.bounds.get(name)
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Normalize `value` if `name` has bounds, otherwise pass it through
    pub fn normalize(&self, name: &str, value: f64) -> f64 {
        match self.bounds.get(name) {
            Some(bounds) => bounds.normalize(value),
            None => value,
        }
    }
}

/// Map a scaled model output back to exam-score units, rounded to two decimals
pub fn denormalize(scaled: f64, scaling: &ScalingParams) -> f64 {
    let score = match scaling.get(EXAM_SCORE) {
        Some(bounds) => bounds.denormalize(scaled),
        None => scaled,
    };
    (score * 100.0).round() / 100.0
}
