//! Continuous-input sensitivity analysis.
//!
//! The run has three strictly sequential stages:
//! 1. **Generate**: build the sweep grid from the data info
//! 2. **Predict**: score the grid with the model
//! 3. **Reshape**: pair each prediction with its sweep coordinate
//!
//! All argument checks happen before the grid is built; a run either returns
//! the full report or a single error.

use std::time::Instant;

use polars::prelude::DataFrame;
use psaml_model::AnalysisOptions;
use tracing::{debug, info, info_span};

use crate::context::AnalysisContext;
use crate::data_info::DataInfo;
use crate::error::{PsamlError, Result};
use crate::grid::{Sensitivity, generate_grid};
use crate::model::Model;
use crate::report::build_report;

/// Sweep every experiment variable through the model and report how the
/// prediction responds.
///
/// Checks run in this order: sensitivities (`InvalidInput`), the context
/// (`InvalidConfiguration`), then the data-info table (`InvalidInput`). Model
/// errors and malformed model output surface as `PredictionFailure`.
pub fn analyze<M: Model + ?Sized>(
    context: &AnalysisContext,
    model: &M,
    exp_sensitivity: i64,
    ctrl_sensitivity: i64,
    data_info: &DataFrame,
) -> Result<DataFrame> {
    let sensitivity = Sensitivity::new(exp_sensitivity, ctrl_sensitivity)?;
    context.validate()?;
    let info = DataInfo::from_frame(data_info)?;
    analyze_info(context, model, sensitivity, &info)
}

/// Derive the data info from `sample` using `options`, then [`analyze`].
pub fn run_analysis<M: Model + ?Sized>(
    context: &AnalysisContext,
    model: &M,
    options: &AnalysisOptions,
    sample: &DataFrame,
) -> Result<DataFrame> {
    let sensitivity = Sensitivity::new(options.exp_sensitivity, options.ctrl_sensitivity)?;
    context.validate()?;
    let info = DataInfo::from_sample(
        sample,
        &options.experiment_columns,
        options.class_column.as_deref(),
    )?;
    analyze_info(context, model, sensitivity, &info)
}

fn analyze_info<M: Model + ?Sized>(
    context: &AnalysisContext,
    model: &M,
    sensitivity: Sensitivity,
    info: &DataInfo,
) -> Result<DataFrame> {
    if info.contains(&context.prediction_column) {
        return Err(PsamlError::invalid_configuration(format!(
            "prediction column '{}' collides with a data column",
            context.prediction_column
        )));
    }

    let span = info_span!(
        "continuous_input_analysis",
        session = %context.session,
        model = model.name(),
        exp_sensitivity = sensitivity.exp(),
        ctrl_sensitivity = sensitivity.ctrl(),
    );
    let _guard = span.enter();
    let start = Instant::now();

    let grid = generate_grid(sensitivity, info)?;
    debug!(rows = grid.height(), "predicting over sweep grid");

    let predictions = model.predict(&grid).map_err(PsamlError::PredictionFailure)?;
    let report = build_report(sensitivity, info, &predictions, &context.prediction_column)?;

    info!(
        rows = report.height(),
        experiment_columns = info.experiment_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "variance report built"
    );
    Ok(report)
}
