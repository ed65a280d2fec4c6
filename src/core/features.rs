use crate::core::{scaling::ScalingParams, PredictionError};
use crate::models::{EncodedRecord, EngineeredFeatures};

/// Divisor shared by the Knowledge and Engagement formulas
const FEATURE_DIVISOR: f64 = 27.0;

/// Derive the engineered features from an encoded record and scale them
///
/// Steps, in order:
/// 1. `Knowledge = Hours_Studied / Previous_Scores / 27`
/// 2. `Engagement = Attendance / Hours_Studied / 27`
/// 3. `Attendance = Attendance / 100`
/// 4. min-max normalize each of the three when `scaling` has bounds for it
///
/// Both formulas read the raw attendance and study hours; only the three
/// final features are scaled.
pub fn engineer(
    encoded: &EncodedRecord,
    scaling: &ScalingParams,
) -> Result<EngineeredFeatures, PredictionError> {
    if encoded.previous_scores == 0.0 {
        return Err(PredictionError::computation(
            "Knowledge",
            "Previous_Scores must be non-zero",
        ));
    }
    if encoded.hours_studied == 0.0 {
        return Err(PredictionError::computation(
            "Engagement",
            "Hours_Studied must be non-zero",
        ));
    }

    let knowledge = encoded.hours_studied / encoded.previous_scores / FEATURE_DIVISOR;
    let engagement = encoded.attendance / encoded.hours_studied / FEATURE_DIVISOR;
    let attendance = encoded.attendance / 100.0;

    let features = EngineeredFeatures {
        engagement: finite("Engagement", scaling.normalize("Engagement", engagement))?,
        knowledge: finite("Knowledge", scaling.normalize("Knowledge", knowledge))?,
        attendance: finite("Attendance", scaling.normalize("Attendance", attendance))?,
    };

    tracing::trace!(
        "Engineered features: engagement={:.6}, knowledge={:.6}, attendance={:.6}",
        features.engagement,
        features.knowledge,
        features.attendance
    );

    Ok(features)
}

#[inline]
fn finite(field: &str, value: f64) -> Result<f64, PredictionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PredictionError::computation(field, format!("non-finite value {}", value)))
    }
}
