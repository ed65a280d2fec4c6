use crate::core::PredictionError;
use crate::models::{EncodedRecord, RawRecord};

/// Low/Medium/High answers
const LEVELS: &[(&str, f64)] = &[("Low", 1.0), ("Medium", 2.0), ("High", 3.0)];

const EDUCATION_LEVELS: &[(&str, f64)] = &[
    ("High School", 1.0),
    ("College", 2.0),
    ("Postgraduate", 3.0),
];

const DISTANCES: &[(&str, f64)] = &[("Near", 1.0), ("Moderate", 2.0), ("Far", 3.0)];

const PEER_INFLUENCE: &[(&str, f64)] = &[("Negative", -1.0), ("Neutral", 0.0), ("Positive", 1.0)];

const SCHOOL_TYPES: &[(&str, f64)] = &[("Public", -1.0), ("Private", 1.0)];

const GENDERS: &[(&str, f64)] = &[("Male", -1.0), ("Female", 1.0)];

/// Look up a categorical answer in its encoding table
///
/// Values outside the table are rejected; there is no fallback code.
pub fn encode_category(
    field: &str,
    table: &[(&str, f64)],
    value: &str,
) -> Result<f64, PredictionError> {
    table
        .iter()
        .find(|(key, _)| *key == value)
        .map(|(_, code)| *code)
        .ok_or_else(|| {
            let allowed: Vec<&str> = table.iter().map(|(key, _)| *key).collect();
            PredictionError::validation(
                field,
                format!("unknown value '{}', expected one of: {}", value, allowed.join(", ")),
            )
        })
}

/// Encode a yes/no answer as -1/+1
#[inline]
pub fn encode_flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        -1.0
    }
}

/// Replace every categorical and boolean answer with its numeric code
///
/// Numeric answers pass through unchanged.
pub fn encode(raw: &RawRecord) -> Result<EncodedRecord, PredictionError> {
    Ok(EncodedRecord {
        hours_studied: raw.hours_studied,
        attendance: raw.attendance as f64,
        parental_involvement: encode_category("Parental_Involvement", LEVELS, &raw.parental_involvement)?,
        access_to_resources: encode_category("Access_to_Resources", LEVELS, &raw.access_to_resources)?,
        extracurricular_activities: encode_flag(raw.extracurricular_activities),
        sleep_hours: raw.sleep_hours,
        previous_scores: raw.previous_scores as f64,
        motivation_level: encode_category("Motivation_Level", LEVELS, &raw.motivation_level)?,
        internet_access: encode_flag(raw.internet_access),
        tutoring_sessions: raw.tutoring_sessions as f64,
        family_income: encode_category("Family_Income", LEVELS, &raw.family_income)?,
        teacher_quality: encode_category("Teacher_Quality", LEVELS, &raw.teacher_quality)?,
        school_type: encode_category("School_Type", SCHOOL_TYPES, &raw.school_type)?,
        peer_influence: encode_category("Peer_Influence", PEER_INFLUENCE, &raw.peer_influence)?,
        physical_activity: raw.physical_activity as f64,
        learning_disabilities: encode_flag(raw.learning_disabilities),
        parental_education_level: encode_category(
            "Parental_Education_Level",
            EDUCATION_LEVELS,
            &raw.parental_education_level,
        )?,
        distance_from_home: encode_category("Distance_from_Home", DISTANCES, &raw.distance_from_home)?,
        gender: encode_category("Gender", GENDERS, &raw.gender)?,
    })
}
