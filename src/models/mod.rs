// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{RawRecord, EncodedRecord, EngineeredFeatures, PredictionResult, SavedInputRecord, FIELD_NAMES, EXAM_SCORE};
pub use requests::parse_prediction_request;
pub use responses::{PredictionResponse, HealthResponse, ModelInfo, ErrorResponse};
