//! Column metadata ("data info") for a sensitivity analysis.
//!
//! A data-info table has exactly four columns:
//!
//! | column          | type    | meaning                               |
//! |-----------------|---------|---------------------------------------|
//! | `colName`       | string  | name of a model input column          |
//! | `minValue`      | numeric | smallest value seen in the sample     |
//! | `maxValue`      | numeric | largest value seen in the sample      |
//! | `shouldAnalyze` | boolean | true for experiment variables         |
//!
//! [`DataInfo`] is the decoded, validated form used by the grid generator.

use std::collections::BTreeSet;

use polars::prelude::{ChunkAgg, Column, DataFrame, DataType, NamedFrom, Series};
use psaml_model::{COL_NAME, ColumnInfo, DATA_INFO_COLUMNS, MAX_VALUE, MIN_VALUE, SHOULD_ANALYZE};
use tracing::{debug, warn};

use crate::error::{PsamlError, Result};

/// Validated column metadata, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct DataInfo {
    columns: Vec<ColumnInfo>,
}

impl DataInfo {
    /// Build from records, enforcing the same rules as [`DataInfo::from_frame`].
    pub fn new(columns: Vec<ColumnInfo>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.col_name.as_str()) {
                return Err(PsamlError::invalid_input(format!(
                    "data_info is invalid; duplicate colName '{}'",
                    column.col_name
                )));
            }
            check_bounds(column)?;
        }
        Ok(Self { columns })
    }

    /// Derive metadata from a representative sample.
    ///
    /// The class column (when given) is dropped first; every remaining column
    /// must be numeric. Experiment names that match no sample column are
    /// ignored with a warning.
    pub fn from_sample<I>(
        sample: &DataFrame,
        experiment_columns: I,
        class_column: Option<&str>,
    ) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let vars_only = match class_column {
            Some(class) => {
                if sample.column(class).is_err() {
                    return Err(PsamlError::invalid_input(format!(
                        "class column '{class}' not found in sample data"
                    )));
                }
                sample.drop(class)?
            }
            None => sample.clone(),
        };
        if vars_only.width() == 0 {
            return Err(PsamlError::invalid_input(
                "sample data has no columns left to analyze",
            ));
        }

        let experiment: BTreeSet<String> = experiment_columns
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        for name in &experiment {
            if vars_only.column(name).is_err() {
                warn!(column = %name, "experiment column not present in sample data");
            }
        }

        let mut columns = Vec::with_capacity(vars_only.width());
        for column in vars_only.get_columns() {
            let name = column.name().as_str();
            let (min_value, max_value) = column_bounds(column)?;
            columns.push(
                ColumnInfo::new(name, min_value, max_value).analyzed(experiment.contains(name)),
            );
        }
        debug!(
            columns = columns.len(),
            experiment = columns.iter().filter(|c| c.should_analyze).count(),
            "derived data info from sample"
        );
        Self::new(columns)
    }

    /// Decode and validate a data-info table.
    pub fn from_frame(frame: &DataFrame) -> Result<Self> {
        validate_schema(frame)?;

        let names = frame.column(COL_NAME)?.str()?;
        let mins = frame.column(MIN_VALUE)?.cast(&DataType::Float64)?;
        let mins = mins.f64()?;
        let maxs = frame.column(MAX_VALUE)?.cast(&DataType::Float64)?;
        let maxs = maxs.f64()?;
        let flags = frame.column(SHOULD_ANALYZE)?.bool()?;

        let mut columns = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            let (Some(name), Some(min_value), Some(max_value), Some(flag)) =
                (names.get(idx), mins.get(idx), maxs.get(idx), flags.get(idx))
            else {
                return Err(PsamlError::invalid_input(format!(
                    "data_info is invalid; row {idx} contains a null value"
                )));
            };
            columns.push(ColumnInfo::new(name, min_value, max_value).analyzed(flag));
        }
        Self::new(columns)
    }

    /// Encode as a data-info table in canonical column order.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.columns.iter().map(|c| c.col_name.as_str()).collect();
        let mins: Vec<f64> = self.columns.iter().map(|c| c.min_value).collect();
        let maxs: Vec<f64> = self.columns.iter().map(|c| c.max_value).collect();
        let flags: Vec<bool> = self.columns.iter().map(|c| c.should_analyze).collect();
        let data = DataFrame::new(vec![
            Series::new(COL_NAME.into(), names).into(),
            Series::new(MIN_VALUE.into(), mins).into(),
            Series::new(MAX_VALUE.into(), maxs).into(),
            Series::new(SHOULD_ANALYZE.into(), flags).into(),
        ])?;
        Ok(data)
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.col_name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// `(min, max)` for a column.
    pub fn bounds(&self, name: &str) -> Option<(f64, f64)> {
        self.get(name).map(|c| (c.min_value, c.max_value))
    }

    /// Experiment variables, in table order.
    pub fn experiment_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| c.should_analyze)
    }

    pub fn experiment_count(&self) -> usize {
        self.experiment_columns().count()
    }

    /// Positions of the experiment variables within [`DataInfo::columns`].
    pub(crate) fn experiment_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.should_analyze)
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Build the data-info table from a representative sample.
///
/// Fails with `InvalidInput` when `class_column` is absent or when no columns
/// remain once it is dropped.
pub fn make_data_info<I>(
    sample: &DataFrame,
    experiment_columns: I,
    class_column: &str,
) -> Result<DataFrame>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    DataInfo::from_sample(sample, experiment_columns, Some(class_column))?.to_frame()
}

/// Check that a table has exactly the data-info columns with usable types.
pub fn validate_schema(frame: &DataFrame) -> Result<()> {
    if frame.width() != DATA_INFO_COLUMNS.len() {
        return Err(PsamlError::invalid_input(format!(
            "data_info is invalid; expected {} columns, found {}",
            DATA_INFO_COLUMNS.len(),
            frame.width()
        )));
    }
    for name in DATA_INFO_COLUMNS {
        let column = frame.column(name).map_err(|_| {
            PsamlError::invalid_input(format!("data_info is invalid; missing column '{name}'"))
        })?;
        let dtype = column.dtype();
        let type_ok = match name {
            COL_NAME => *dtype == DataType::String,
            SHOULD_ANALYZE => *dtype == DataType::Boolean,
            _ => dtype.is_primitive_numeric(),
        };
        if !type_ok {
            return Err(PsamlError::invalid_input(format!(
                "data_info is invalid; column '{name}' has unexpected type {dtype}"
            )));
        }
    }
    Ok(())
}

fn column_bounds(column: &Column) -> Result<(f64, f64)> {
    let name = column.name();
    if !column.dtype().is_primitive_numeric() {
        return Err(PsamlError::invalid_input(format!(
            "sample column '{name}' is not numeric ({})",
            column.dtype()
        )));
    }
    let values = column.cast(&DataType::Float64)?;
    let values = values.f64()?;
    match (values.min(), values.max()) {
        (Some(min), Some(max)) => Ok((min, max)),
        _ => Err(PsamlError::invalid_input(format!(
            "sample column '{name}' has no values"
        ))),
    }
}

fn check_bounds(column: &ColumnInfo) -> Result<()> {
    if !column.min_value.is_finite() || !column.max_value.is_finite() {
        return Err(PsamlError::invalid_input(format!(
            "data_info is invalid; bounds of '{}' are not finite",
            column.col_name
        )));
    }
    if column.min_value > column.max_value {
        return Err(PsamlError::invalid_input(format!(
            "data_info is invalid; minValue {} exceeds maxValue {} for '{}'",
            column.min_value, column.max_value, column.col_name
        )));
    }
    if !column.range().is_finite() {
        return Err(PsamlError::invalid_input(format!(
            "data_info is invalid; range of '{}' overflows",
            column.col_name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iris_sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("petalW".into(), vec![0.2, 2.5, 0.1, 1.3]).into(),
            Series::new("petalL".into(), vec![1.4, 6.9, 1.0, 4.2]).into(),
            Series::new("species".into(), vec!["setosa", "virginica", "setosa", "versicolor"])
                .into(),
        ])
        .unwrap()
    }

    #[test]
    fn from_sample_drops_class_and_flags_experiments() {
        let info = DataInfo::from_sample(&iris_sample(), ["petalW"], Some("species")).unwrap();
        assert_eq!(info.columns().len(), 2);
        assert_eq!(info.bounds("petalW"), Some((0.1, 2.5)));
        assert_eq!(info.bounds("petalL"), Some((1.0, 6.9)));
        assert!(info.get("petalW").unwrap().should_analyze);
        assert!(!info.get("petalL").unwrap().should_analyze);
        assert!(!info.contains("species"));
    }

    #[test]
    fn from_sample_rejects_text_columns() {
        let err = DataInfo::from_sample(&iris_sample(), ["petalW"], None).unwrap_err();
        assert!(matches!(err, PsamlError::InvalidInput { .. }));
    }

    #[test]
    fn from_sample_accepts_integer_columns() {
        let sample = DataFrame::new(vec![
            Series::new("count".into(), vec![3i64, 9, 5]).into(),
            Series::new("label".into(), vec![0i64, 1, 0]).into(),
        ])
        .unwrap();
        let info = DataInfo::from_sample(&sample, ["count"], Some("label")).unwrap();
        assert_eq!(info.bounds("count"), Some((3.0, 9.0)));
    }

    #[test]
    fn new_rejects_duplicates_and_reversed_bounds() {
        let dup = DataInfo::new(vec![
            ColumnInfo::new("a", 0.0, 1.0),
            ColumnInfo::new("a", 0.0, 2.0),
        ]);
        assert!(matches!(dup, Err(PsamlError::InvalidInput { .. })));

        let reversed = DataInfo::new(vec![ColumnInfo::new("a", 2.0, 1.0)]);
        assert!(matches!(reversed, Err(PsamlError::InvalidInput { .. })));

        let nan = DataInfo::new(vec![ColumnInfo::new("a", f64::NAN, 1.0)]);
        assert!(matches!(nan, Err(PsamlError::InvalidInput { .. })));
    }

    #[test]
    fn new_rejects_unbounded_ranges() {
        let infinite = DataInfo::new(vec![ColumnInfo::new("a", 0.0, f64::INFINITY).analyzed(true)]);
        assert!(matches!(infinite, Err(PsamlError::InvalidInput { .. })));

        let negative = DataInfo::new(vec![ColumnInfo::new("a", f64::NEG_INFINITY, 0.0)]);
        assert!(matches!(negative, Err(PsamlError::InvalidInput { .. })));

        let overflowing = DataInfo::new(vec![ColumnInfo::new("b", -1e308, 1e308)]);
        assert!(matches!(overflowing, Err(PsamlError::InvalidInput { .. })));
    }

    #[test]
    fn from_sample_rejects_infinite_values() {
        let sample = DataFrame::new(vec![
            Series::new("x".into(), vec![1.0, f64::INFINITY]).into(),
            Series::new("label".into(), vec![0i64, 1]).into(),
        ])
        .unwrap();
        let err = DataInfo::from_sample(&sample, ["x"], Some("label")).unwrap_err();
        assert!(matches!(err, PsamlError::InvalidInput { .. }));
    }

    #[test]
    fn frame_round_trip_preserves_order() {
        let info = DataInfo::new(vec![
            ColumnInfo::new("z", 0.0, 1.0).analyzed(true),
            ColumnInfo::new("a", -1.0, 1.0),
        ])
        .unwrap();
        let frame = info.to_frame().unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(DataInfo::from_frame(&frame).unwrap(), info);
    }

    #[test]
    fn experiment_indices_follow_table_order() {
        let info = DataInfo::new(vec![
            ColumnInfo::new("a", 0.0, 1.0),
            ColumnInfo::new("b", 0.0, 1.0).analyzed(true),
            ColumnInfo::new("c", 0.0, 1.0).analyzed(true),
        ])
        .unwrap();
        assert_eq!(info.experiment_indices(), vec![1, 2]);
        assert_eq!(info.experiment_count(), 2);
    }
}
