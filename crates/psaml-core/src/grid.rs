//! Sweep grid generation.
//!
//! The grid is a triple nested sweep:
//!
//! ```text
//! for c in 0..=ctrl_sensitivity
//!     for each experiment variable (table order)
//!         for e in 0..=exp_sensitivity
//!             one synthetic row
//! ```
//!
//! In each row the experiment variable sits at `e / exp_sensitivity` of its
//! range and every other column at `c / ctrl_sensitivity` of its own. A
//! sensitivity of zero pins the fraction at zero (the column's minimum).
//!
//! The order is part of the contract: the report step relies on positional
//! correspondence between grid rows and predictions, and consumers read
//! consecutive runs of `exp_sensitivity + 1` rows as one sweep.

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::data_info::DataInfo;
use crate::error::{PsamlError, Result};

/// Validated step counts for the experiment and control sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sensitivity {
    exp: u64,
    ctrl: u64,
}

impl Sensitivity {
    /// Fails with `InvalidInput` if either value is negative.
    pub fn new(exp_sensitivity: i64, ctrl_sensitivity: i64) -> Result<Self> {
        match (
            u64::try_from(exp_sensitivity),
            u64::try_from(ctrl_sensitivity),
        ) {
            (Ok(exp), Ok(ctrl)) => Ok(Self { exp, ctrl }),
            _ => Err(PsamlError::invalid_input(format!(
                "sensitivity must be non-negative (exp_sensitivity={exp_sensitivity}, ctrl_sensitivity={ctrl_sensitivity})"
            ))),
        }
    }

    pub fn exp(self) -> u64 {
        self.exp
    }

    pub fn ctrl(self) -> u64 {
        self.ctrl
    }

    /// Fraction of range for experiment step `step`.
    pub fn exp_fraction(self, step: u64) -> f64 {
        fraction(step, self.exp)
    }

    /// Fraction of range for control step `step`.
    pub fn ctrl_fraction(self, step: u64) -> f64 {
        fraction(step, self.ctrl)
    }

    /// `(ctrl + 1) * experiment_count * (exp + 1)`, or `InvalidInput` if that
    /// does not fit in memory addressing.
    pub fn row_count(self, experiment_count: usize) -> Result<usize> {
        let steps = |n: u64| usize::try_from(n).ok().and_then(|n| n.checked_add(1));
        steps(self.ctrl)
            .zip(steps(self.exp))
            .and_then(|(ctrl, exp)| ctrl.checked_mul(experiment_count)?.checked_mul(exp))
            .ok_or_else(|| {
                PsamlError::invalid_input(format!(
                    "sweep grid too large (exp_sensitivity={}, ctrl_sensitivity={}, experiment variables={experiment_count})",
                    self.exp, self.ctrl
                ))
            })
    }
}

fn fraction(step: u64, steps: u64) -> f64 {
    // zero steps: only the minimum is sampled
    let steps = if steps == 0 { 1 } else { steps };
    step as f64 / steps as f64
}

/// The sweep coordinate that produced one grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPoint {
    /// Control step, `0..=ctrl_sensitivity`.
    pub ctrl_step: u64,
    /// Index of the experiment variable within [`DataInfo::columns`].
    pub exp_column: usize,
    /// Experiment step, `0..=exp_sensitivity`.
    pub exp_step: u64,
}

/// Sweep coordinates in grid order.
pub fn sweep_points(sensitivity: Sensitivity, info: &DataInfo) -> impl Iterator<Item = SweepPoint> {
    let experiment = info.experiment_indices();
    let exp = sensitivity.exp();
    (0..=sensitivity.ctrl()).flat_map(move |ctrl_step| {
        experiment.clone().into_iter().flat_map(move |exp_column| {
            (0..=exp).map(move |exp_step| SweepPoint {
                ctrl_step,
                exp_column,
                exp_step,
            })
        })
    })
}

/// Build the synthetic input table from a data-info table.
///
/// Output columns are the `colName`s in table order.
pub fn generate_analysis_data(
    exp_sensitivity: i64,
    ctrl_sensitivity: i64,
    data_info: &DataFrame,
) -> Result<DataFrame> {
    let sensitivity = Sensitivity::new(exp_sensitivity, ctrl_sensitivity)?;
    let info = DataInfo::from_frame(data_info)?;
    generate_grid(sensitivity, &info)
}

/// Build the synthetic input table from validated metadata.
pub fn generate_grid(sensitivity: Sensitivity, info: &DataInfo) -> Result<DataFrame> {
    let experiment_count = info.experiment_count();
    if experiment_count == 0 {
        return Err(PsamlError::invalid_input(
            "no column is flagged shouldAnalyze",
        ));
    }
    let row_count = sensitivity.row_count(experiment_count)?;

    let columns = info.columns();
    let mut values: Vec<Vec<f64>> = Vec::with_capacity(columns.len());
    for column in columns {
        let mut data = Vec::<f64>::new();
        data.try_reserve_exact(row_count).map_err(|_| {
            PsamlError::invalid_input(format!(
                "sweep grid too large; cannot allocate {row_count} rows for '{}'",
                column.col_name
            ))
        })?;
        values.push(data);
    }
    for point in sweep_points(sensitivity, info) {
        let ctrl_fraction = sensitivity.ctrl_fraction(point.ctrl_step);
        let exp_fraction = sensitivity.exp_fraction(point.exp_step);
        for (idx, (column, out)) in columns.iter().zip(values.iter_mut()).enumerate() {
            let fraction = if idx == point.exp_column {
                exp_fraction
            } else {
                ctrl_fraction
            };
            out.push(column.interpolate(fraction));
        }
    }

    let series: Vec<Column> = columns
        .iter()
        .zip(values)
        .map(|(column, data)| Series::new(column.col_name.as_str().into(), data).into())
        .collect();
    let grid = DataFrame::new(series)?;
    debug!(
        rows = grid.height(),
        columns = grid.width(),
        exp_sensitivity = sensitivity.exp(),
        ctrl_sensitivity = sensitivity.ctrl(),
        "generated sweep grid"
    );
    Ok(grid)
}
