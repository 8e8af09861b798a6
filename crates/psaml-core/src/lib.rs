//! Sensitivity analysis for trained regression models.
//!
//! This crate sweeps a model's inputs and reports how its prediction responds
//! to each variable in isolation:
//!
//! - **data_info**: derive and validate per-column bounds from sample data
//! - **grid**: generate the synthetic sweep grid
//! - **model**: the predict-over-table collaborator and simple adapters
//! - **analysis**: run generate, predict, reshape end to end
//! - **report**: build, read back, and summarize variance reports
//!
//! # Example
//!
//! ```ignore
//! use psaml_core::{AnalysisContext, LinearModel, analyze, make_data_info};
//!
//! let data_info = make_data_info(&sample, ["petalW"], "species")?;
//! let model = LinearModel::new(0.0).with_weight("petalW", 1.5);
//! let report = analyze(&AnalysisContext::new("iris"), &model, 10, 4, &data_info)?;
//! ```

mod analysis;
mod context;
mod error;

pub mod data_info;
pub mod grid;
pub mod model;
pub mod report;

pub use analysis::{analyze, run_analysis};
pub use context::AnalysisContext;
pub use data_info::{DataInfo, make_data_info, validate_schema};
pub use error::{PsamlError, Result};
pub use grid::{Sensitivity, SweepPoint, generate_analysis_data, generate_grid, sweep_points};
pub use model::{FnModel, LinearModel, Model};
pub use report::{build_report, report_records, summarize_report};
