//! Column metadata and variance report records.
//!
//! The tabular forms of these records use the camel-case column names below;
//! the constants are shared by the table builders and the schema checks so the
//! two never drift apart.

use serde::{Deserialize, Serialize};

/// Column holding the analyzed column's name in a data-info table.
pub const COL_NAME: &str = "colName";
/// Column holding the lower bound in a data-info table.
pub const MIN_VALUE: &str = "minValue";
/// Column holding the upper bound in a data-info table.
pub const MAX_VALUE: &str = "maxValue";
/// Column flagging experiment variables in a data-info table.
pub const SHOULD_ANALYZE: &str = "shouldAnalyze";

/// The exact column set of a data-info table, in canonical order.
pub const DATA_INFO_COLUMNS: [&str; 4] = [COL_NAME, MIN_VALUE, MAX_VALUE, SHOULD_ANALYZE];

/// Report column carrying the model output.
pub const PREDICTION: &str = "prediction";
/// Report column naming the swept experiment variable.
pub const VAR_COL_NAME: &str = "varColName";
/// Report column with the experiment variable's fraction of range.
pub const EXP_VARIANCE: &str = "expVariance";
/// Report column with the control variables' fraction of range.
pub const CTRL_VARIANCE: &str = "ctrlVariance";

/// The report columns, in output order.
pub const REPORT_COLUMNS: [&str; 4] = [PREDICTION, VAR_COL_NAME, EXP_VARIANCE, CTRL_VARIANCE];

/// Metadata for one analyzed column of the modeled dataset.
///
/// Built once per analysis run from a representative sample and never
/// mutated afterwards. `min_value <= max_value` is expected; a reversed pair
/// would make the interpolation run backwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name; must match a column the model consumes.
    #[serde(rename = "colName")]
    pub col_name: String,
    /// Smallest value observed in the sample.
    #[serde(rename = "minValue")]
    pub min_value: f64,
    /// Largest value observed in the sample.
    #[serde(rename = "maxValue")]
    pub max_value: f64,
    /// True iff this column is an experiment variable.
    #[serde(rename = "shouldAnalyze")]
    pub should_analyze: bool,
}

impl ColumnInfo {
    pub fn new(col_name: impl Into<String>, min_value: f64, max_value: f64) -> Self {
        Self {
            col_name: col_name.into(),
            min_value,
            max_value,
            should_analyze: false,
        }
    }

    /// Mark (or unmark) this column as an experiment variable.
    #[must_use]
    pub fn analyzed(mut self, should_analyze: bool) -> Self {
        self.should_analyze = should_analyze;
        self
    }

    /// Width of the observed range.
    pub fn range(&self) -> f64 {
        self.max_value - self.min_value
    }

    /// Value at `fraction` of the way from the minimum to the maximum.
    pub fn interpolate(&self, fraction: f64) -> f64 {
        self.min_value + self.range() * fraction
    }
}

/// One row of a variance report.
///
/// The prediction type depends on the model, so it is generic here; reports
/// read back from tables use `f64` predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceRecord<P = f64> {
    /// Model output for the synthetic row.
    pub prediction: P,
    /// The experiment variable swept in this row.
    #[serde(rename = "varColName")]
    pub var_col_name: String,
    /// Fraction of `var_col_name`'s range used in this row.
    #[serde(rename = "expVariance")]
    pub exp_variance: f64,
    /// Fraction of range used for every other column in this row.
    #[serde(rename = "ctrlVariance")]
    pub ctrl_variance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_spans_range() {
        let info = ColumnInfo::new("petalW", 0.5, 2.5);
        assert_eq!(info.interpolate(0.0), 0.5);
        assert_eq!(info.interpolate(1.0), 2.5);
        assert_eq!(info.interpolate(0.5), 1.5);
    }

    #[test]
    fn flat_range_pins_value() {
        let info = ColumnInfo::new("const", 3.0, 3.0);
        assert_eq!(info.interpolate(0.75), 3.0);
    }

    #[test]
    fn analyzed_defaults_to_false() {
        let info = ColumnInfo::new("petalL", 1.0, 6.9);
        assert!(!info.should_analyze);
        assert!(info.analyzed(true).should_analyze);
    }
}
