//! Exam score prediction service
//!
//! This library maps raw student survey answers to the feature vector a
//! pre-trained polynomial regression model expects, scores it, and maps the
//! result back to exam-score units.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{InferencePipeline, PredictionError, ScalingParams};
pub use models::{RawRecord, PredictionResult, PredictionResponse, parse_prediction_request};
pub use services::ModelArtifacts;
