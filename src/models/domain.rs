use serde::{Deserialize, Serialize};
use validator::Validate;

/// Wire names of the 19 submitted fields, in declared order
pub const FIELD_NAMES: [&str; 19] = [
    "Hours_Studied",
    "Attendance",
    "Parental_Involvement",
    "Access_to_Resources",
    "Extracurricular_Activities",
    "Sleep_Hours",
    "Previous_Scores",
    "Motivation_Level",
    "Internet_Access",
    "Tutoring_Sessions",
    "Family_Income",
    "Teacher_Quality",
    "School_Type",
    "Peer_Influence",
    "Physical_Activity",
    "Learning_Disabilities",
    "Parental_Education_Level",
    "Distance_from_Home",
    "Gender",
];

/// Name of the scaling entry used to map predictions back to exam-score units
pub const EXAM_SCORE: &str = "Exam_Score";

/// Student survey answers as submitted to the prediction endpoint
///
/// Numeric fields are range-checked with `validator`; categorical fields are
/// kept as submitted and checked against the encoding table by the encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RawRecord {
    #[serde(rename = "Hours_Studied")]
    #[validate(range(min = 0.0, message = "Must be a positive number"))]
    pub hours_studied: f64,
    #[serde(rename = "Attendance")]
    #[validate(range(min = 0, max = 100, message = "Must be between 0 and 100"))]
    pub attendance: i64,
    #[serde(rename = "Parental_Involvement")]
    pub parental_involvement: String,
    #[serde(rename = "Access_to_Resources")]
    pub access_to_resources: String,
    #[serde(rename = "Extracurricular_Activities")]
    pub extracurricular_activities: bool,
    #[serde(rename = "Sleep_Hours")]
    #[validate(range(min = 0.0, message = "Must be a positive number"))]
    pub sleep_hours: f64,
    #[serde(rename = "Previous_Scores")]
    #[validate(range(min = 0, max = 100, message = "Must be between 0 and 100"))]
    pub previous_scores: i64,
    #[serde(rename = "Motivation_Level")]
    pub motivation_level: String,
    #[serde(rename = "Internet_Access")]
    pub internet_access: bool,
    #[serde(rename = "Tutoring_Sessions")]
    #[validate(range(min = 0, message = "Must be a positive number"))]
    pub tutoring_sessions: i64,
    #[serde(rename = "Family_Income")]
    pub family_income: String,
    #[serde(rename = "Teacher_Quality")]
    pub teacher_quality: String,
    #[serde(rename = "School_Type")]
    pub school_type: String,
    #[serde(rename = "Peer_Influence")]
    pub peer_influence: String,
    #[serde(rename = "Physical_Activity")]
    #[validate(range(min = 0, message = "Must be a positive number"))]
    pub physical_activity: i64,
    #[serde(rename = "Learning_Disabilities")]
    pub learning_disabilities: bool,
    #[serde(rename = "Parental_Education_Level")]
    pub parental_education_level: String,
    #[serde(rename = "Distance_from_Home")]
    pub distance_from_home: String,
    #[serde(rename = "Gender")]
    pub gender: String,
}

/// A `RawRecord` with every categorical and boolean answer replaced by its numeric code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedRecord {
    pub hours_studied: f64,
    pub attendance: f64,
    pub parental_involvement: f64,
    pub access_to_resources: f64,
    pub extracurricular_activities: f64,
    pub sleep_hours: f64,
    pub previous_scores: f64,
    pub motivation_level: f64,
    pub internet_access: f64,
    pub tutoring_sessions: f64,
    pub family_income: f64,
    pub teacher_quality: f64,
    pub school_type: f64,
    pub peer_influence: f64,
    pub physical_activity: f64,
    pub learning_disabilities: f64,
    pub parental_education_level: f64,
    pub distance_from_home: f64,
    pub gender: f64,
}

/// The three features the polynomial transform was fitted on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineeredFeatures {
    pub engagement: f64,
    pub knowledge: f64,
    pub attendance: f64,
}

impl EngineeredFeatures {
    /// Feature names in the order the transformer expects them
    pub const NAMES: [&'static str; 3] = ["Engagement", "Knowledge", "Attendance"];

    /// Features as a vector ordered like `NAMES`
    pub fn to_vector(&self) -> [f64; 3] {
        [self.engagement, self.knowledge, self.attendance]
    }
}

/// A predicted exam score, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult(f64);

impl PredictionResult {
    /// Round `score` to two decimal places
    pub fn rounded(score: f64) -> Self {
        Self((score * 100.0).round() / 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// A submitted record as persisted for retraining
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedInputRecord {
    pub id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    pub record: RawRecord,
}
