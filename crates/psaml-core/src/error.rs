//! Error types for sensitivity analysis.

use thiserror::Error;

/// Errors that can occur while building metadata, generating the sweep grid,
/// or running an analysis.
#[derive(Debug, Error)]
pub enum PsamlError {
    /// Malformed or out-of-range arguments. Raised before any table is built.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Structurally wrong collaborator objects.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// The model failed or returned malformed output. The model's own error is
    /// carried unchanged.
    #[error("prediction failed: {0:#}")]
    PredictionFailure(anyhow::Error),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl PsamlError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for PsamlError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, PsamlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PsamlError::invalid_input("sensitivity must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid input: sensitivity must be non-negative"
        );
    }

    #[test]
    fn test_prediction_failure_keeps_model_error() {
        let err = PsamlError::PredictionFailure(anyhow::anyhow!("model exploded"));
        assert_eq!(err.to_string(), "prediction failed: model exploded");
        match err {
            PsamlError::PredictionFailure(inner) => assert_eq!(inner.to_string(), "model exploded"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let err: PsamlError = polars_err.into();
        assert!(matches!(err, PsamlError::DataFrame { .. }));
    }
}
