// Service exports
pub mod artifacts;
pub mod rate_limit;
pub mod sqlite;

pub use artifacts::ModelArtifacts;
pub use rate_limit::{RateLimiter, RateDecision};
pub use sqlite::{SqliteStore, StoreError};
