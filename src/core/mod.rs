// Inference core exports
pub mod encoding;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod polynomial;
pub mod regression;
pub mod scaling;

pub use encoding::encode;
pub use error::PredictionError;
pub use features::engineer;
pub use pipeline::InferencePipeline;
pub use polynomial::{expand, FeatureTransform, PolynomialConfig, PolynomialFeatures};
pub use regression::{score, LinearRegression, Regressor};
pub use scaling::{denormalize, Bounds, ScalingParams};
