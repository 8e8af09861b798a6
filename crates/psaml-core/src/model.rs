//! The prediction collaborator.
//!
//! Any model that can score a table of rows can be analyzed. The analysis
//! checks that the output has one row per input row, in order, and carries
//! the prediction column named by the [`crate::AnalysisContext`].

use anyhow::{Context, anyhow};
use polars::prelude::{DataFrame, DataType, NamedFrom, Series};
use psaml_model::PREDICTION;

/// A trained model exposing predict-over-table.
pub trait Model {
    /// Name used in log output.
    fn name(&self) -> &str {
        "model"
    }

    /// Score every row of `input`, preserving row count and order.
    fn predict(&self, input: &DataFrame) -> anyhow::Result<DataFrame>;
}

impl<M: Model + ?Sized> Model for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn predict(&self, input: &DataFrame) -> anyhow::Result<DataFrame> {
        (**self).predict(input)
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn predict(&self, input: &DataFrame) -> anyhow::Result<DataFrame> {
        (**self).predict(input)
    }
}

/// Adapts a closure into a [`Model`].
pub struct FnModel<F> {
    name: String,
    predict: F,
}

impl<F> FnModel<F>
where
    F: Fn(&DataFrame) -> anyhow::Result<DataFrame>,
{
    pub fn new(name: impl Into<String>, predict: F) -> Self {
        Self {
            name: name.into(),
            predict,
        }
    }
}

impl<F> Model for FnModel<F>
where
    F: Fn(&DataFrame) -> anyhow::Result<DataFrame>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &DataFrame) -> anyhow::Result<DataFrame> {
        (self.predict)(input)
    }
}

/// A fixed linear model: `intercept + sum(weight * column)`.
///
/// Writes a Float64 prediction column next to the input columns. Columns
/// without a weight do not contribute.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    intercept: f64,
    weights: Vec<(String, f64)>,
    output_column: String,
}

impl LinearModel {
    pub fn new(intercept: f64) -> Self {
        Self {
            intercept,
            weights: Vec::new(),
            output_column: PREDICTION.to_string(),
        }
    }

    #[must_use]
    pub fn with_weight(mut self, column: impl Into<String>, weight: f64) -> Self {
        self.weights.push((column.into(), weight));
        self
    }

    #[must_use]
    pub fn with_output_column(mut self, column: impl Into<String>) -> Self {
        self.output_column = column.into();
        self
    }
}

impl Model for LinearModel {
    fn name(&self) -> &str {
        "linear"
    }

    fn predict(&self, input: &DataFrame) -> anyhow::Result<DataFrame> {
        let mut scores = vec![self.intercept; input.height()];
        for (name, weight) in &self.weights {
            let values = input
                .column(name)
                .with_context(|| format!("missing feature column '{name}'"))?
                .cast(&DataType::Float64)?;
            for (idx, (score, value)) in scores.iter_mut().zip(values.f64()?).enumerate() {
                let value = value.ok_or_else(|| anyhow!("null value in '{name}' at row {idx}"))?;
                *score += weight * value;
            }
        }
        let mut output = input.clone();
        output.with_column(Series::new(self.output_column.as_str().into(), scores))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> DataFrame {
        DataFrame::new(vec![
            Series::new("x".into(), vec![0.0, 1.0, 2.0]).into(),
            Series::new("y".into(), vec![10.0, 20.0, 30.0]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn linear_model_appends_prediction() {
        let model = LinearModel::new(1.0).with_weight("x", 2.0).with_weight("y", 0.5);
        let output = model.predict(&input()).unwrap();
        assert_eq!(output.width(), 3);
        let scores = output.column(PREDICTION).unwrap().f64().unwrap();
        assert_eq!(scores.get(0), Some(6.0));
        assert_eq!(scores.get(1), Some(13.0));
        assert_eq!(scores.get(2), Some(20.0));
    }

    #[test]
    fn linear_model_requires_weighted_columns() {
        let model = LinearModel::new(0.0).with_weight("missing", 1.0);
        let err = model.predict(&input()).unwrap_err();
        assert!(err.to_string().contains("missing feature column"));
    }

    #[test]
    fn fn_model_delegates_to_closure() {
        let model = FnModel::new("echo", |df: &DataFrame| Ok(df.clone()));
        assert_eq!(model.name(), "echo");
        assert_eq!(model.predict(&input()).unwrap().height(), 3);
    }

    #[test]
    fn boxed_model_forwards() {
        let model: Box<dyn Model> = Box::new(LinearModel::new(0.0));
        assert_eq!(model.name(), "linear");
        assert_eq!(model.predict(&input()).unwrap().width(), 3);
    }
}
