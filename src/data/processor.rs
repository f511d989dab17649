//! Data Processor Module
//! Derives the series to plot from the loaded table (group + aggregate).

use super::loader::{cell_text, is_numeric_dtype};
use super::model::{Aggregation, ChartConfig, GroupedRow, SeriesData};
use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Column '{0}' does not exist")]
    MissingColumn(String),
    #[error("Column '{0}' must be numeric for histogram")]
    NonNumericHistogram(String),
    #[error("Cannot compute {aggregation} of '{column}': column is not numeric")]
    NonNumericAggregation {
        column: String,
        aggregation: Aggregation,
    },
    #[error("Cannot compute {aggregation} of '{column}' for group '{group}': no numeric values")]
    EmptyGroup {
        column: String,
        group: String,
        aggregation: Aggregation,
    },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

impl ProcessorError {
    /// Column selection failed (missing or wrongly typed column).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn(_) | Self::NonNumericHistogram(_)
        )
    }

    /// The aggregation could not be applied to the Y values.
    pub fn is_aggregation(&self) -> bool {
        matches!(
            self,
            Self::NonNumericAggregation { .. } | Self::EmptyGroup { .. }
        )
    }
}

/// Running reduction for one group.
#[derive(Debug, Clone)]
struct GroupAccumulator {
    key: String,
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl GroupAccumulator {
    fn new(key: String) -> Self {
        Self {
            key,
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn finish(self, aggregation: Aggregation, column: &str) -> Result<GroupedRow, ProcessorError> {
        if aggregation != Aggregation::Count && self.count == 0 {
            return Err(ProcessorError::EmptyGroup {
                column: column.to_string(),
                group: self.key,
                aggregation,
            });
        }

        let value = match aggregation {
            Aggregation::Sum => self.sum,
            Aggregation::Mean => self.sum / self.count as f64,
            Aggregation::Count => self.count as f64,
            Aggregation::Min => self.min,
            Aggregation::Max => self.max,
        };
        Ok(GroupedRow::new(self.key, value))
    }
}

/// Handles chart data derivation. Never mutates the table.
pub struct DataProcessor;

impl DataProcessor {
    /// Apply a chart configuration to the table.
    pub fn build_series(df: &DataFrame, config: &ChartConfig) -> Result<SeriesData, ProcessorError> {
        if config.chart_kind.is_histogram() {
            Self::histogram_values(df, &config.y_column).map(SeriesData::Raw)
        } else {
            Self::group_and_aggregate(df, &config.x_column, &config.y_column, config.aggregation)
                .map(SeriesData::Grouped)
        }
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))
    }

    /// Non-missing numeric values of a column, in table order.
    pub fn histogram_values(df: &DataFrame, y_col: &str) -> Result<Vec<f64>, ProcessorError> {
        let column = Self::column(df, y_col)?;
        if !is_numeric_dtype(column.dtype()) {
            return Err(ProcessorError::NonNumericHistogram(y_col.to_string()));
        }

        let value_f64 = column.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;

        Ok(value_ca
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect())
    }

    /// Group rows by `x_col` and reduce `y_col` within each group.
    ///
    /// Groups keep the order in which their key first appears.
    pub fn group_and_aggregate(
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
        aggregation: Aggregation,
    ) -> Result<Vec<GroupedRow>, ProcessorError> {
        let group_series = Self::column(df, x_col)?;
        let value_series = Self::column(df, y_col)?;

        let numeric = is_numeric_dtype(value_series.dtype());
        if aggregation.requires_numeric() && !numeric {
            return Err(ProcessorError::NonNumericAggregation {
                column: y_col.to_string(),
                aggregation,
            });
        }

        let values: Vec<Option<f64>> = if numeric {
            let value_f64 = value_series.cast(&DataType::Float64)?;
            value_f64
                .f64()?
                .into_iter()
                .map(|v| v.filter(|v| !v.is_nan()))
                .collect()
        } else {
            // Only reachable for count: every present cell counts as 1.
            (0..df.height())
                .map(|i| {
                    value_series
                        .get(i)
                        .ok()
                        .filter(|v| !v.is_null())
                        .map(|_| 1.0)
                })
                .collect()
        };

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<GroupAccumulator> = Vec::new();

        for (i, value) in values.into_iter().enumerate() {
            let Some(key) = group_series.get(i).ok().and_then(|g| cell_text(&g)) else {
                continue;
            };

            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(GroupAccumulator::new(key));
                groups.len() - 1
            });

            if let Some(v) = value {
                groups[slot].push(v);
            }
        }

        groups
            .into_iter()
            .map(|g| g.finish(aggregation, y_col))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ChartKind;

    fn sales_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("region".into(), &["North", "South", "North", "East", "South"]),
            Column::new("sales".into(), &[10.0, 20.0, 30.0, 5.0, 40.0]),
            Column::new("rep".into(), &["ann", "bob", "cid", "dee", "eve"]),
        ])
        .unwrap()
    }

    fn grouped(series: SeriesData) -> Vec<(String, f64)> {
        match series {
            SeriesData::Grouped(rows) => rows.into_iter().map(|r| (r.key, r.value)).collect(),
            SeriesData::Raw(_) => panic!("expected grouped series"),
        }
    }

    #[test]
    fn groups_follow_first_appearance() {
        let config = ChartConfig::new("region", "sales", Aggregation::Sum, ChartKind::Bar);
        let rows = grouped(DataProcessor::build_series(&sales_df(), &config).unwrap());
        assert_eq!(
            rows,
            vec![
                ("North".to_string(), 40.0),
                ("South".to_string(), 60.0),
                ("East".to_string(), 5.0),
            ]
        );
    }

    #[test]
    fn aggregations_match_arithmetic() {
        let df = sales_df();
        let run = |agg| grouped(
            DataProcessor::build_series(&df, &ChartConfig::new("region", "sales", agg, ChartKind::Line))
                .unwrap(),
        );

        let mean: Vec<f64> = run(Aggregation::Mean).into_iter().map(|r| r.1).collect();
        assert_eq!(mean, vec![20.0, 30.0, 5.0]);
        let min: Vec<f64> = run(Aggregation::Min).into_iter().map(|r| r.1).collect();
        assert_eq!(min, vec![10.0, 20.0, 5.0]);
        let max: Vec<f64> = run(Aggregation::Max).into_iter().map(|r| r.1).collect();
        assert_eq!(max, vec![30.0, 40.0, 5.0]);
        let count: Vec<f64> = run(Aggregation::Count).into_iter().map(|r| r.1).collect();
        assert_eq!(count, vec![2.0, 2.0, 1.0]);
    }

    #[test]
    fn count_accepts_text_and_skips_missing() {
        let df = DataFrame::new(vec![
            Column::new("team".into(), &["a", "b", "a", "a"]),
            Column::new("owner".into(), &[Some("x"), Some("y"), None, Some("z")]),
        ])
        .unwrap();

        let rows = DataProcessor::group_and_aggregate(&df, "team", "owner", Aggregation::Count)
            .unwrap();
        assert_eq!(rows, vec![GroupedRow::new("a", 2.0), GroupedRow::new("b", 1.0)]);
    }

    #[test]
    fn sum_of_text_column_is_aggregation_error() {
        let config = ChartConfig::new("region", "rep", Aggregation::Sum, ChartKind::Pie);
        let err = DataProcessor::build_series(&sales_df(), &config).unwrap_err();
        assert!(err.is_aggregation());
        assert!(err.to_string().contains("'rep'"));
    }

    #[test]
    fn all_missing_group_is_aggregation_error() {
        let df = DataFrame::new(vec![
            Column::new("k".into(), &["a", "b"]),
            Column::new("v".into(), &[Some(1.0), None]),
        ])
        .unwrap();

        let err = DataProcessor::group_and_aggregate(&df, "k", "v", Aggregation::Mean).unwrap_err();
        assert!(matches!(err, ProcessorError::EmptyGroup { ref group, .. } if group == "b"));

        let counts = DataProcessor::group_and_aggregate(&df, "k", "v", Aggregation::Count).unwrap();
        assert_eq!(counts, vec![GroupedRow::new("a", 1.0), GroupedRow::new("b", 0.0)]);
    }

    #[test]
    fn missing_column_is_validation_error() {
        let config = ChartConfig::new("nope", "sales", Aggregation::Sum, ChartKind::Bar);
        let err = DataProcessor::build_series(&sales_df(), &config).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Column 'nope' does not exist");
    }

    #[test]
    fn histogram_ignores_x_and_drops_missing() {
        let df = DataFrame::new(vec![Column::new(
            "score".into(),
            &[Some(1.5), None, Some(f64::NAN), Some(4.0)],
        )])
        .unwrap();

        let config = ChartConfig::new("", "score", Aggregation::Sum, ChartKind::Histogram);
        let series = DataProcessor::build_series(&df, &config).unwrap();
        assert_eq!(series, SeriesData::Raw(vec![1.5, 4.0]));
    }

    #[test]
    fn histogram_rejects_text_column() {
        let config = ChartConfig::new("region", "rep", Aggregation::Sum, ChartKind::Histogram);
        let err = DataProcessor::build_series(&sales_df(), &config).unwrap_err();
        assert!(matches!(err, ProcessorError::NonNumericHistogram(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn numeric_keys_are_grouped_by_text() {
        let df = DataFrame::new(vec![
            Column::new("year".into(), &[2021i64, 2022, 2021]),
            Column::new("units".into(), &[1i64, 2, 3]),
        ])
        .unwrap();

        let rows = DataProcessor::group_and_aggregate(&df, "year", "units", Aggregation::Sum).unwrap();
        assert_eq!(rows, vec![GroupedRow::new("2021", 4.0), GroupedRow::new("2022", 2.0)]);
    }

    #[test]
    fn boolean_values_sum_as_ones() {
        let df = DataFrame::new(vec![
            Column::new("team".into(), &["a", "b", "a"]),
            Column::new("won".into(), &[true, false, true]),
        ])
        .unwrap();

        let rows = DataProcessor::group_and_aggregate(&df, "team", "won", Aggregation::Sum).unwrap();
        assert_eq!(rows, vec![GroupedRow::new("a", 2.0), GroupedRow::new("b", 0.0)]);
    }
}
