//! Report module - analysis report assembly and PDF export

mod pdf;

pub use pdf::PdfGenerator;

use crate::data::ChartConfig;
use crate::stats::{Analysis, StatRow};
use chrono::{Local, NaiveDateTime};
use thiserror::Error;

/// Default report title
pub const DEFAULT_REPORT_TITLE: &str = "Data Analysis Report";

/// Timestamp format used in the report metadata.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write report to '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Please load a CSV file first")]
    NoData,
    #[error("Please generate a chart first to create an analysis report")]
    NoChart,
}

/// Everything that goes into one exported report.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub source_name: String,
    pub generated_at: NaiveDateTime,
    pub row_count: usize,
    pub config: ChartConfig,
    pub analysis: Analysis,
}

impl Report {
    /// Assemble a report stamped with the current local time.
    pub fn new(
        title: impl Into<String>,
        source_name: impl Into<String>,
        row_count: usize,
        config: ChartConfig,
        analysis: Analysis,
    ) -> Self {
        Self {
            title: title.into(),
            source_name: source_name.into(),
            generated_at: Local::now().naive_local(),
            row_count,
            config,
            analysis,
        }
    }

    pub fn with_timestamp(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// (label, value) pairs of the metadata block.
    pub fn metadata(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Dataset:", self.source_name.clone()),
            (
                "Generated:",
                self.generated_at.format(TIMESTAMP_FORMAT).to_string(),
            ),
            ("Total Records:", self.row_count.to_string()),
        ]
    }

    /// (label, value) pairs of the chart configuration block.
    pub fn configuration(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Chart Type:", self.config.chart_kind.to_string()),
            ("X-Axis:", self.config.x_column.clone()),
            ("Y-Axis:", self.config.y_column.clone()),
            ("Aggregation:", self.config.aggregation.to_string()),
        ]
    }

    /// Statistics table including the header row.
    pub fn stats_table(&self) -> Vec<StatRow> {
        let mut rows = vec![StatRow::new("Metric", "Value")];
        rows.extend(self.analysis.stats.iter().cloned());
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Aggregation, ChartKind};
    use chrono::NaiveDate;

    fn report() -> Report {
        let config = ChartConfig::new("category", "sales", Aggregation::Sum, ChartKind::Bar);
        let analysis = Analysis {
            insights: vec!["one".to_string()],
            stats: vec![StatRow::new("Total Sum", "400.00")],
        };
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(9, 7, 1))
            .unwrap();
        Report::new(DEFAULT_REPORT_TITLE, "sales.csv", 2, config, analysis).with_timestamp(at)
    }

    #[test]
    fn metadata_formats_timestamp() {
        let meta = report().metadata();
        assert_eq!(meta[0], ("Dataset:", "sales.csv".to_string()));
        assert_eq!(meta[1], ("Generated:", "2024-03-05 09:07:01".to_string()));
        assert_eq!(meta[2], ("Total Records:", "2".to_string()));
    }

    #[test]
    fn configuration_lists_selection() {
        let config = report().configuration();
        assert_eq!(config[0].1, "Bar");
        assert_eq!(config[1].1, "category");
        assert_eq!(config[2].1, "sales");
        assert_eq!(config[3].1, "sum");
    }

    #[test]
    fn stats_table_has_header() {
        let table = report().stats_table();
        assert_eq!(table[0], StatRow::new("Metric", "Value"));
        assert_eq!(table[1], StatRow::new("Total Sum", "400.00"));
    }
}
