//! Configuration options for a sensitivity analysis run.

use serde::{Deserialize, Serialize};

/// Default number of steps across an experiment variable's range.
pub const DEFAULT_EXP_SENSITIVITY: i64 = 10;
/// Default number of steps across the control variables' ranges.
pub const DEFAULT_CTRL_SENSITIVITY: i64 = 4;

/// Options controlling a full analysis run.
///
/// Sensitivities are signed so that out-of-range values coming from
/// configuration files reach validation instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Steps used to sweep an experiment variable (inclusive of both ends).
    pub exp_sensitivity: i64,

    /// Steps used for the shared control fraction (inclusive of both ends).
    pub ctrl_sensitivity: i64,

    /// Columns to sweep.
    pub experiment_columns: Vec<String>,

    /// Label column of the sample data, excluded from the analysis.
    pub class_column: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            exp_sensitivity: DEFAULT_EXP_SENSITIVITY,
            ctrl_sensitivity: DEFAULT_CTRL_SENSITIVITY,
            experiment_columns: Vec::new(),
            class_column: None,
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_sensitivity(mut self, exp_sensitivity: i64, ctrl_sensitivity: i64) -> Self {
        self.exp_sensitivity = exp_sensitivity;
        self.ctrl_sensitivity = ctrl_sensitivity;
        self
    }

    pub fn with_experiment_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.experiment_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_class_column(mut self, column: impl Into<String>) -> Self {
        self.class_column = Some(column.into());
        self
    }
}
