//! Insight Generator Module
//! Turns a derived series into report sentences and a metric/value table.

use super::calculator::{Skew, StatsCalculator};
use crate::data::{ChartConfig, GroupedRow, SeriesData};
use std::cmp::Ordering;
use thiserror::Error;

/// Placeholder insight used when analysis is not possible.
pub const UNAVAILABLE_INSIGHT: &str = "Analysis data unavailable for current configuration";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Nothing to analyze; the report degrades to placeholder rows.
    #[error("series is empty")]
    EmptySeries,
    /// Series shape does not match the chart kind it was built for.
    #[error("{kind} chart cannot be analyzed from a {shape} series")]
    SeriesMismatch { kind: String, shape: &'static str },
}

/// Two-decimal fixed notation; non-finite values print as `nan`, `inf`, `-inf`.
fn fixed2(value: f64) -> String {
    match value {
        v if v.is_nan() => "nan".to_string(),
        v if v == f64::INFINITY => "inf".to_string(),
        v if v == f64::NEG_INFINITY => "-inf".to_string(),
        v => format!("{:.2}", v),
    }
}

/// Metric/value row of the statistical summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub metric: String,
    pub value: String,
}

impl StatRow {
    pub fn new(metric: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: value.into(),
        }
    }
}

/// Insights and statistics for one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub insights: Vec<String>,
    pub stats: Vec<StatRow>,
}

impl Analysis {
    /// Single placeholder insight and stat row.
    pub fn unavailable() -> Self {
        Self {
            insights: vec![UNAVAILABLE_INSIGHT.to_string()],
            stats: vec![StatRow::new("Error", "Statistics unavailable")],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.insights.len() == 1 && self.insights[0] == UNAVAILABLE_INSIGHT
    }
}

/// Generates report insights from chart data.
pub struct InsightGenerator;

impl InsightGenerator {
    /// Analyze a series built from `config`.
    pub fn analyze(series: &SeriesData, config: &ChartConfig) -> Result<Analysis, AnalysisError> {
        match (config.chart_kind.is_histogram(), series) {
            (true, SeriesData::Raw(values)) => Self::analyze_distribution(values, &config.y_column),
            (false, SeriesData::Grouped(rows)) => Self::analyze_groups(rows, config),
            (_, other) => Err(AnalysisError::SeriesMismatch {
                kind: config.chart_kind.to_string(),
                shape: match other {
                    SeriesData::Grouped(_) => "grouped",
                    SeriesData::Raw(_) => "raw",
                },
            }),
        }
    }

    /// Like [`InsightGenerator::analyze`], but degrades any error to placeholder rows.
    pub fn analyze_or_placeholder(series: &SeriesData, config: &ChartConfig) -> Analysis {
        match Self::analyze(series, config) {
            Ok(analysis) => analysis,
            Err(AnalysisError::EmptySeries) => {
                log::warn!("No data to analyze for {}", config.title());
                Analysis::unavailable()
            }
            Err(e) => {
                log::error!("Analysis failed for {}: {}", config.title(), e);
                Analysis::unavailable()
            }
        }
    }

    fn analyze_distribution(values: &[f64], y_col: &str) -> Result<Analysis, AnalysisError> {
        if values.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }

        let stats = StatsCalculator::compute_descriptive_stats(values);

        let skew_sentence = match Skew::classify(stats.mean, stats.median) {
            Skew::Right => {
                "The distribution is right-skewed, with higher values pulling the average up"
            }
            Skew::Left => {
                "The distribution is left-skewed, with lower values pulling the average down"
            }
            Skew::Symmetric => "The distribution appears relatively symmetric",
        };

        let insights = vec![
            format!(
                "The average {} is {} with a standard deviation of {}",
                y_col,
                fixed2(stats.mean),
                fixed2(stats.std)
            ),
            format!(
                "The median {} is {}, indicating the central tendency of the distribution",
                y_col,
                fixed2(stats.median)
            ),
            skew_sentence.to_string(),
        ];

        let rows = vec![
            StatRow::new("Mean", fixed2(stats.mean)),
            StatRow::new("Median", fixed2(stats.median)),
            StatRow::new("Std Dev", fixed2(stats.std)),
            StatRow::new("Min", fixed2(stats.min)),
            StatRow::new("Max", fixed2(stats.max)),
            StatRow::new("Count", stats.count.to_string()),
        ];

        Ok(Analysis {
            insights,
            stats: rows,
        })
    }

    fn analyze_groups(rows: &[GroupedRow], config: &ChartConfig) -> Result<Analysis, AnalysisError> {
        let mut sorted: Vec<&GroupedRow> = rows.iter().collect();
        // Stable: ties keep first-appearance order.
        sorted.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));

        let (Some(top), Some(bottom)) = (sorted.first(), sorted.last()) else {
            return Err(AnalysisError::EmptySeries);
        };

        let agg = config.aggregation.as_str();
        let y_col = &config.y_column;

        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        let stats = StatsCalculator::compute_descriptive_stats(&values);

        let mut insights = vec![
            format!(
                "'{}' has the highest {} {} of {}",
                top.key,
                agg,
                y_col,
                fixed2(top.value)
            ),
            format!(
                "'{}' has the lowest {} {} of {}",
                bottom.key,
                agg,
                y_col,
                fixed2(bottom.value)
            ),
            format!("Total {} across all categories: {}", agg, fixed2(stats.sum)),
            format!("Average {} per category: {}", agg, fixed2(stats.mean)),
        ];

        if stats.sum > 0.0 {
            let share = top.value / stats.sum * 100.0;
            insights.push(format!("'{}' contributes {}% of the total", top.key, fixed2(share)));
        }

        if rows.len() >= 2 {
            insights.push(format!(
                "There is a difference of {} between the highest and lowest values",
                fixed2(top.value - bottom.value)
            ));
        }

        let stat_rows = vec![
            StatRow::new("Total Sum", fixed2(stats.sum)),
            StatRow::new("Average", fixed2(stats.mean)),
            StatRow::new("Median", fixed2(stats.median)),
            StatRow::new("Min Value", fixed2(stats.min)),
            StatRow::new("Max Value", fixed2(stats.max)),
            StatRow::new("Number of Categories", rows.len().to_string()),
        ];

        Ok(Analysis {
            insights,
            stats: stat_rows,
        })
    }
}
