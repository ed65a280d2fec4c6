use thiserror::Error;

/// Errors raised by the inference pipeline
///
/// Every stage returns one of these; the HTTP layer maps each variant to
/// exactly one status code and never forwards internal detail for the
/// server-side kinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Invalid input for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Cannot compute {field}: {reason}")]
    Computation { field: String, reason: String },

    #[error("Feature schema mismatch: {0}")]
    Schema(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
}

impl PredictionError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn computation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Computation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Computation { .. } => "computation_error",
            Self::Schema(_) => "schema_error",
            Self::ModelUnavailable(_) => "model_unavailable",
        }
    }

    /// HTTP status code the error is reported with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::Computation { .. } => 400,
            Self::Schema(_) | Self::ModelUnavailable(_) => 500,
        }
    }

    /// Whether the caller caused the failure and may see the full message
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PredictionError::validation("Gender", "missing").status_code(), 400);
        assert_eq!(PredictionError::computation("Knowledge", "division by zero").status_code(), 400);
        assert_eq!(PredictionError::Schema("width".to_string()).status_code(), 500);
        assert_eq!(PredictionError::ModelUnavailable("gone".to_string()).status_code(), 500);
    }

    #[test]
    fn test_message_names_field() {
        let err = PredictionError::validation("School_Type", "unknown value 'Charter'");
        assert_eq!(err.to_string(), "Invalid input for School_Type: unknown value 'Charter'");
        assert!(err.is_client_error());
    }
}
