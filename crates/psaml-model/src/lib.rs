//! Data model for sensitivity analysis of trained regression models.
//!
//! - **columns**: column metadata and variance report records, plus the
//!   canonical column names of their tabular forms
//! - **options**: run configuration

pub mod columns;
pub mod options;

pub use columns::{
    COL_NAME, CTRL_VARIANCE, ColumnInfo, DATA_INFO_COLUMNS, EXP_VARIANCE, MAX_VALUE, MIN_VALUE,
    PREDICTION, REPORT_COLUMNS, SHOULD_ANALYZE, VAR_COL_NAME, VarianceRecord,
};
pub use options::{AnalysisOptions, DEFAULT_CTRL_SENSITIVITY, DEFAULT_EXP_SENSITIVITY};
