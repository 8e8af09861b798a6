//! Execution context for an analysis run.

use psaml_model::PREDICTION;

use crate::error::{PsamlError, Result};

/// Session handle passed explicitly into every analysis.
///
/// Holds the label used to tag log spans and the name of the column the model
/// writes its predictions to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisContext {
    /// Label for this session (e.g., a study or model identifier).
    pub session: String,

    /// Column the model's output is read from.
    pub prediction_column: String,
}

impl AnalysisContext {
    /// Create a context reading predictions from `prediction`.
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            prediction_column: PREDICTION.to_string(),
        }
    }

    /// Set the column the model writes its output to.
    pub fn with_prediction_column(mut self, column: impl Into<String>) -> Self {
        self.prediction_column = column.into();
        self
    }

    /// Fails with `InvalidConfiguration` when a name is blank.
    pub fn validate(&self) -> Result<()> {
        if self.session.trim().is_empty() {
            return Err(PsamlError::invalid_configuration(
                "analysis context has an empty session label",
            ));
        }
        if self.prediction_column.trim().is_empty() {
            return Err(PsamlError::invalid_configuration(
                "analysis context has an empty prediction column name",
            ));
        }
        Ok(())
    }
}
