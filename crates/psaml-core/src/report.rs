//! Variance report construction and summaries.
//!
//! A report has one row per grid row, in grid order:
//!
//! | column         | type          | meaning                                   |
//! |----------------|---------------|-------------------------------------------|
//! | `prediction`   | model-defined | model output for the synthetic row        |
//! | `varColName`   | string        | experiment variable swept in this row     |
//! | `expVariance`  | float 0..1    | fraction of `varColName`'s range          |
//! | `ctrlVariance` | float 0..1    | fraction of range for all other columns   |

use anyhow::anyhow;
use polars::prelude::{DataFrame, DataType, IntoLazy, NamedFrom, Series, col};
use psaml_model::{CTRL_VARIANCE, EXP_VARIANCE, PREDICTION, VAR_COL_NAME, VarianceRecord};

use crate::data_info::DataInfo;
use crate::error::{PsamlError, Result};
use crate::grid::{Sensitivity, sweep_points};

/// Summary column: smallest prediction within a sweep.
pub const MIN_PREDICTION: &str = "minPrediction";
/// Summary column: largest prediction within a sweep.
pub const MAX_PREDICTION: &str = "maxPrediction";
/// Summary column: `maxPrediction - minPrediction`.
pub const PREDICTION_SPREAD: &str = "predictionSpread";

/// Pair each prediction with the sweep coordinate that produced its row.
///
/// `predictions` must be the model output for the grid generated from the
/// same `sensitivity` and `info`; rows are matched by position.
pub fn build_report(
    sensitivity: Sensitivity,
    info: &DataInfo,
    predictions: &DataFrame,
    prediction_column: &str,
) -> Result<DataFrame> {
    let height = predictions.height();
    let mut var_names: Vec<&str> = Vec::with_capacity(height);
    let mut exp_variance: Vec<f64> = Vec::with_capacity(height);
    let mut ctrl_variance: Vec<f64> = Vec::with_capacity(height);
    for point in sweep_points(sensitivity, info) {
        var_names.push(info.columns()[point.exp_column].col_name.as_str());
        exp_variance.push(sensitivity.exp_fraction(point.exp_step));
        ctrl_variance.push(sensitivity.ctrl_fraction(point.ctrl_step));
    }
    if var_names.len() != height {
        return Err(PsamlError::PredictionFailure(anyhow!(
            "model returned {height} rows for {} grid rows",
            var_names.len()
        )));
    }

    let prediction = predictions
        .column(prediction_column)
        .map_err(|_| {
            PsamlError::PredictionFailure(anyhow!(
                "model output has no '{prediction_column}' column"
            ))
        })?
        .clone()
        .with_name(PREDICTION.into());
    let report = DataFrame::new(vec![
        prediction,
        Series::new(VAR_COL_NAME.into(), var_names).into(),
        Series::new(EXP_VARIANCE.into(), exp_variance).into(),
        Series::new(CTRL_VARIANCE.into(), ctrl_variance).into(),
    ])?;
    Ok(report)
}

/// Prediction range per sweep (`varColName`, `ctrlVariance`), in report order.
///
/// Requires a numeric prediction column.
pub fn summarize_report(report: &DataFrame) -> Result<DataFrame> {
    let prediction = report.column(PREDICTION).map_err(|_| {
        PsamlError::invalid_input(format!("report has no '{PREDICTION}' column"))
    })?;
    if !prediction.dtype().is_primitive_numeric() {
        return Err(PsamlError::invalid_input(format!(
            "cannot summarize non-numeric predictions ({})",
            prediction.dtype()
        )));
    }
    let summary = report
        .clone()
        .lazy()
        .group_by_stable([col(VAR_COL_NAME), col(CTRL_VARIANCE)])
        .agg([
            col(PREDICTION)
                .cast(DataType::Float64)
                .min()
                .alias(MIN_PREDICTION),
            col(PREDICTION)
                .cast(DataType::Float64)
                .max()
                .alias(MAX_PREDICTION),
        ])
        .with_column((col(MAX_PREDICTION) - col(MIN_PREDICTION)).alias(PREDICTION_SPREAD))
        .collect()?;
    Ok(summary)
}

/// Read a report with numeric predictions back into records.
pub fn report_records(report: &DataFrame) -> Result<Vec<VarianceRecord>> {
    let missing =
        |name: &str| PsamlError::invalid_input(format!("report has no '{name}' column"));
    let predictions = report
        .column(PREDICTION)
        .map_err(|_| missing(PREDICTION))?
        .cast(&DataType::Float64)?;
    let predictions = predictions.f64()?;
    let names = report
        .column(VAR_COL_NAME)
        .map_err(|_| missing(VAR_COL_NAME))?
        .str()?;
    let exp = report
        .column(EXP_VARIANCE)
        .map_err(|_| missing(EXP_VARIANCE))?
        .f64()?;
    let ctrl = report
        .column(CTRL_VARIANCE)
        .map_err(|_| missing(CTRL_VARIANCE))?
        .f64()?;

    let mut records = Vec::with_capacity(report.height());
    for idx in 0..report.height() {
        let (Some(prediction), Some(name), Some(exp_variance), Some(ctrl_variance)) =
            (predictions.get(idx), names.get(idx), exp.get(idx), ctrl.get(idx))
        else {
            return Err(PsamlError::invalid_input(format!(
                "report row {idx} contains a null value"
            )));
        };
        records.push(VarianceRecord {
            prediction,
            var_col_name: name.to_string(),
            exp_variance,
            ctrl_variance,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use psaml_model::ColumnInfo;

    use super::*;

    fn info() -> DataInfo {
        DataInfo::new(vec![
            ColumnInfo::new("a", 0.0, 1.0).analyzed(true),
            ColumnInfo::new("b", 0.0, 1.0),
        ])
        .unwrap()
    }

    fn predictions(values: Vec<f64>) -> DataFrame {
        DataFrame::new(vec![Series::new("score".into(), values).into()]).unwrap()
    }

    #[test]
    fn report_matches_sweep_coordinates() {
        let sensitivity = Sensitivity::new(1, 0).unwrap();
        let report =
            build_report(sensitivity, &info(), &predictions(vec![5.0, 7.0]), "score").unwrap();
        let records = report_records(&report).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].prediction, 5.0);
        assert_eq!(records[0].var_col_name, "a");
        assert_eq!(records[0].exp_variance, 0.0);
        assert_eq!(records[1].exp_variance, 1.0);
        assert_eq!(records[1].ctrl_variance, 0.0);
    }

    #[test]
    fn report_rejects_row_count_mismatch() {
        let sensitivity = Sensitivity::new(1, 0).unwrap();
        let err =
            build_report(sensitivity, &info(), &predictions(vec![5.0]), "score").unwrap_err();
        assert!(matches!(err, PsamlError::PredictionFailure(_)));
    }

    #[test]
    fn report_requires_prediction_column() {
        let sensitivity = Sensitivity::new(1, 0).unwrap();
        let err = build_report(sensitivity, &info(), &predictions(vec![5.0, 7.0]), "other")
            .unwrap_err();
        assert!(matches!(err, PsamlError::PredictionFailure(_)));
    }

    #[test]
    fn summary_rejects_text_predictions() {
        let sensitivity = Sensitivity::new(1, 0).unwrap();
        let labels =
            DataFrame::new(vec![Series::new("score".into(), vec!["x", "y"]).into()]).unwrap();
        let report = build_report(sensitivity, &info(), &labels, "score").unwrap();
        assert!(matches!(
            summarize_report(&report),
            Err(PsamlError::InvalidInput { .. })
        ));
    }
}
