//! Chart Model Module
//! Chart configuration and the series derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reduction applied to the Y values of each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    Mean,
    Count,
    Min,
    Max,
}

impl Aggregation {
    pub const ALL: [Self; 5] = [Self::Sum, Self::Mean, Self::Count, Self::Min, Self::Max];

    /// Lowercase label used in insights and axis labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Count => "count",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Capitalised label used in chart titles.
    pub fn title(self) -> &'static str {
        match self {
            Self::Sum => "Sum",
            Self::Mean => "Mean",
            Self::Count => "Count",
            Self::Min => "Min",
            Self::Max => "Max",
        }
    }

    /// Whether the reduction needs numeric Y values.
    pub fn requires_numeric(self) -> bool {
        !matches!(self, Self::Count)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Scatter,
    Histogram,
}

impl ChartKind {
    pub const ALL: [Self; 5] = [
        Self::Bar,
        Self::Line,
        Self::Pie,
        Self::Scatter,
        Self::Histogram,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "Bar",
            Self::Line => "Line",
            Self::Pie => "Pie",
            Self::Scatter => "Scatter",
            Self::Histogram => "Histogram",
        }
    }

    pub fn is_histogram(self) -> bool {
        matches!(self, Self::Histogram)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User selection driving chart generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartConfig {
    pub x_column: String,
    pub y_column: String,
    pub aggregation: Aggregation,
    pub chart_kind: ChartKind,
}

impl ChartConfig {
    pub fn new(
        x_column: impl Into<String>,
        y_column: impl Into<String>,
        aggregation: Aggregation,
        chart_kind: ChartKind,
    ) -> Self {
        Self {
            x_column: x_column.into(),
            y_column: y_column.into(),
            aggregation,
            chart_kind,
        }
    }

    /// Chart title, e.g. "Sum of sales by category" or "Histogram of sales".
    pub fn title(&self) -> String {
        if self.chart_kind.is_histogram() {
            format!("Histogram of {}", self.y_column)
        } else {
            format!(
                "{} of {} by {}",
                self.aggregation.title(),
                self.y_column,
                self.x_column
            )
        }
    }

    /// Y axis label, e.g. "sum(sales)" or "Frequency" for histograms.
    pub fn y_axis_label(&self) -> String {
        if self.chart_kind.is_histogram() {
            "Frequency".to_string()
        } else {
            format!("{}({})", self.aggregation, self.y_column)
        }
    }

    /// X axis label
    pub fn x_axis_label(&self) -> &str {
        if self.chart_kind.is_histogram() {
            &self.y_column
        } else {
            &self.x_column
        }
    }
}

/// One aggregated group: distinct X value and its reduced Y value.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedRow {
    pub key: String,
    pub value: f64,
}

impl GroupedRow {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Data carried from chart generation to report generation.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    /// One row per distinct X value, in first-appearance order.
    Grouped(Vec<GroupedRow>),
    /// Raw non-missing numeric Y values (histogram).
    Raw(Vec<f64>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            Self::Grouped(rows) => rows.len(),
            Self::Raw(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_follow_chart_kind() {
        let bar = ChartConfig::new("category", "sales", Aggregation::Mean, ChartKind::Bar);
        assert_eq!(bar.title(), "Mean of sales by category");
        assert_eq!(bar.y_axis_label(), "mean(sales)");
        assert_eq!(bar.x_axis_label(), "category");

        let hist = ChartConfig::new("category", "sales", Aggregation::Sum, ChartKind::Histogram);
        assert_eq!(hist.title(), "Histogram of sales");
        assert_eq!(hist.y_axis_label(), "Frequency");
        assert_eq!(hist.x_axis_label(), "sales");
    }

    #[test]
    fn aggregation_serializes_lowercase() {
        let json = serde_json::to_string(&Aggregation::Count).unwrap();
        assert_eq!(json, "\"count\"");
        let parsed: ChartKind = serde_json::from_str("\"Scatter\"").unwrap();
        assert_eq!(parsed, ChartKind::Scatter);
    }

    #[test]
    fn only_count_accepts_text() {
        assert!(!Aggregation::Count.requires_numeric());
        assert!(Aggregation::ALL
            .iter()
            .filter(|a| a.requires_numeric())
            .all(|a| *a != Aggregation::Count));
    }
}
