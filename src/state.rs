//! Application State
//! Owns the loaded table, the current chart and the status line. Every user
//! action goes through here so the GUI only renders and forwards clicks.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::config::AppConfig;
use crate::data::{ChartConfig, DataLoader, DataProcessor, LoaderError, ProcessorError, SeriesData};
use crate::report::{ExportError, PdfGenerator, Report};
use crate::stats::InsightGenerator;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Please load a CSV file first")]
    NoData,
    #[error("Please select both X and Y columns")]
    ColumnsNotSelected,
    #[error("Please generate a chart first")]
    NoChart,
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ActionError {
    /// Guard failures are user mistakes, shown as warnings rather than errors.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::NoData
                | Self::ColumnsNotSelected
                | Self::NoChart
                | Self::Export(ExportError::NoData | ExportError::NoChart)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Status bar line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new(StatusKind::Info, "Ready")
    }
}

/// Chart currently on screen and the series it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentChart {
    pub config: ChartConfig,
    pub series: SeriesData,
}

pub struct AppState {
    pub config: AppConfig,
    loader: DataLoader,
    /// Column selection in the control panel.
    pub selection: ChartConfig,
    /// Last generated chart; kept after Clear so the report can still use it.
    chart: Option<CurrentChart>,
    chart_visible: bool,
    columns: Vec<String>,
    numeric_columns: Vec<String>,
    preview: Vec<Vec<String>>,
    status: Status,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let selection = ChartConfig::new(
            "",
            "",
            config.defaults.aggregation,
            config.defaults.chart_kind,
        );
        Self {
            loader: DataLoader::with_infer_schema_length(config.loading.infer_schema_length),
            config,
            selection,
            chart: None,
            chart_visible: false,
            columns: Vec::new(),
            numeric_columns: Vec::new(),
            preview: Vec::new(),
            status: Status::default(),
        }
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    /// Chart shown in the chart area, `None` after Clear.
    pub fn chart(&self) -> Option<&CurrentChart> {
        self.chart.as_ref().filter(|_| self.chart_visible)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_numeric_column(&self, name: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == name)
    }

    /// Cached preview rows of the loaded table.
    pub fn preview(&self) -> &[Vec<String>] {
        &self.preview
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn has_data(&self) -> bool {
        self.loader.get_dataframe().is_some()
    }

    /// Load a CSV file, replacing the table and dropping the current chart.
    ///
    /// On failure the previous table and chart are kept.
    pub fn load_csv(&mut self, path: &Path) -> Result<(), ActionError> {
        if let Err(e) = self.loader.load_csv(path) {
            log::error!("{}", e);
            self.status = Status::new(StatusKind::Error, "Error loading file");
            return Err(e.into());
        }

        self.chart = None;
        self.chart_visible = false;
        self.columns = self.loader.get_columns();
        self.numeric_columns = self.loader.get_numeric_columns();
        self.preview = self.loader.preview_rows(self.config.loading.preview_rows);
        self.select_default_columns();
        self.status = Status::new(
            StatusKind::Success,
            format!(
                "Loaded: {} ({} rows, {} columns)",
                self.loader.file_name(),
                self.loader.get_row_count(),
                self.loader.get_column_count()
            ),
        );
        Ok(())
    }

    /// X defaults to the first column, Y to the second (or the first when alone).
    fn select_default_columns(&mut self) {
        let columns = &self.columns;
        self.selection.x_column = columns.first().cloned().unwrap_or_default();
        self.selection.y_column = columns
            .get(1)
            .or_else(|| columns.first())
            .cloned()
            .unwrap_or_default();
    }

    /// Build the series for the current selection and make it the current chart.
    pub fn generate_chart(&mut self) -> Result<&CurrentChart, ActionError> {
        let config = self.selection.clone();
        match self.build_chart(config) {
            Ok(chart) => {
                log::info!("Chart generated: {}", chart.config.title());
                self.status = Status::new(
                    StatusKind::Success,
                    format!(
                        "Chart generated: {} ({})",
                        chart.config.chart_kind, chart.config.aggregation
                    ),
                );
                self.chart_visible = true;
                let chart = self.chart.insert(chart);
                Ok(&*chart)
            }
            Err(e) if e.is_warning() => {
                log::warn!("{}", e);
                self.status = Status::new(StatusKind::Warning, e.to_string());
                Err(e)
            }
            Err(e) => {
                log::error!("Chart generation failed: {}", e);
                self.status = Status::new(StatusKind::Error, format!("Chart generation failed: {}", e));
                Err(e)
            }
        }
    }

    fn build_chart(&self, config: ChartConfig) -> Result<CurrentChart, ActionError> {
        let df = self.loader.get_dataframe().ok_or(ActionError::NoData)?;
        if config.x_column.is_empty() || config.y_column.is_empty() {
            return Err(ActionError::ColumnsNotSelected);
        }
        let series = DataProcessor::build_series(df, &config)?;
        Ok(CurrentChart { config, series })
    }

    /// Hide the displayed chart. The last generated series stays available
    /// for the report until the next generation or load.
    pub fn clear_chart(&mut self) {
        self.chart_visible = false;
        log::info!("Chart cleared");
        self.status = Status::new(StatusKind::Info, "Chart cleared");
    }

    /// Report export needs a loaded table and a generated chart.
    pub fn report_ready(&self) -> Result<&CurrentChart, ExportError> {
        if !self.has_data() {
            return Err(ExportError::NoData);
        }
        self.chart.as_ref().ok_or(ExportError::NoChart)
    }

    /// Assemble the report for the current chart.
    pub fn build_report(&self) -> Result<Report, ExportError> {
        let chart = self.report_ready()?;
        let analysis = InsightGenerator::analyze_or_placeholder(&chart.series, &chart.config);

        Ok(Report::new(
            self.config.report.title.clone(),
            self.loader.file_name(),
            self.loader.get_row_count(),
            chart.config.clone(),
            analysis,
        ))
    }

    /// Write the analysis report as PDF to `path`.
    pub fn export_report(&mut self, path: &Path) -> Result<(), ActionError> {
        let result = self
            .build_report()
            .and_then(|report| PdfGenerator::write_report(&report, path))
            .map_err(ActionError::from);

        match result {
            Ok(()) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.status = Status::new(StatusKind::Success, format!("Analysis report saved: {}", name));
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Report generation failed")),
        }
    }

    /// Save the current chart as SVG to `path`.
    pub fn export_chart_svg(&mut self, path: &Path) -> Result<(), ActionError> {
        let result = match self.chart() {
            None => Err(ActionError::NoChart),
            Some(chart) => StaticChartRenderer::save_svg(
                path,
                &chart.series,
                &chart.config,
                self.config.charts.histogram_bins,
                (self.config.charts.export_width, self.config.charts.export_height),
            )
            .map_err(ActionError::from),
        };

        match result {
            Ok(()) => {
                self.status = Status::new(StatusKind::Success, format!("Chart saved: {}", path.display()));
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Chart export failed")),
        }
    }

    /// Suggested report path next to the loaded CSV.
    pub fn default_report_path(&self) -> PathBuf {
        let name = &self.config.report.default_file_name;
        self.loader
            .get_file_path()
            .and_then(|p| p.parent())
            .map(|dir| dir.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }

    fn fail(&mut self, e: ActionError, context: &str) -> ActionError {
        if e.is_warning() {
            log::warn!("{}", e);
            self.status = Status::new(StatusKind::Warning, e.to_string());
        } else {
            log::error!("{}: {}", context, e);
            self.status = Status::new(StatusKind::Error, format!("{}: {}", context, e));
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Aggregation, ChartKind};
    use std::io::Write;

    fn csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn loaded(content: &str) -> (AppState, tempfile::NamedTempFile) {
        let file = csv(content);
        let mut state = AppState::new(AppConfig::default());
        state.load_csv(file.path()).unwrap();
        (state, file)
    }

    #[test]
    fn load_selects_default_columns() {
        let (state, file) = loaded("category,sales,units\nA,100,1\nB,300,2\n");
        assert_eq!(state.selection.x_column, "category");
        assert_eq!(state.selection.y_column, "sales");

        let name = file.path().file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(state.status().kind, StatusKind::Success);
        assert_eq!(
            state.status().message,
            format!("Loaded: {} (2 rows, 3 columns)", name)
        );
    }

    #[test]
    fn single_column_uses_it_for_both_axes() {
        let (state, _file) = loaded("sales\n1\n2\n");
        assert_eq!(state.selection.x_column, "sales");
        assert_eq!(state.selection.y_column, "sales");
    }

    #[test]
    fn failed_load_keeps_previous_state() {
        let (mut state, _file) = loaded("category,sales\nA,100\nB,300\n");
        state.generate_chart().unwrap();

        let missing = std::env::temp_dir().join("chartify_report_missing_input.csv");
        let err = state.load_csv(&missing).unwrap_err();
        assert!(matches!(err, ActionError::Load(_)));
        assert_eq!(state.status().message, "Error loading file");
        assert_eq!(state.loader().get_row_count(), 2);
        assert!(state.chart().is_some());
    }

    #[test]
    fn generate_requires_data_and_columns() {
        let mut state = AppState::new(AppConfig::default());
        let err = state.generate_chart().unwrap_err();
        assert!(matches!(err, ActionError::NoData));
        assert_eq!(state.status().kind, StatusKind::Warning);
        assert_eq!(state.status().message, "Please load a CSV file first");

        let (mut state, _file) = loaded("category,sales\nA,100\n");
        state.selection.y_column.clear();
        let err = state.generate_chart().unwrap_err();
        assert!(matches!(err, ActionError::ColumnsNotSelected));
    }

    #[test]
    fn generate_sets_chart_and_status() {
        let (mut state, _file) = loaded("category,sales\nA,100\nB,300\n");
        let chart = state.generate_chart().unwrap();
        assert_eq!(chart.series.len(), 2);
        assert_eq!(state.status().message, "Chart generated: Bar (sum)");
    }

    #[test]
    fn failed_generate_keeps_previous_chart() {
        let (mut state, _file) = loaded("category,sales\nA,100\nB,300\n");
        state.generate_chart().unwrap();

        state.selection.y_column = "category".to_string();
        state.selection.aggregation = Aggregation::Mean;
        let err = state.generate_chart().unwrap_err();
        assert!(matches!(err, ActionError::Processor(ref p) if p.is_aggregation()));
        assert_eq!(state.status().kind, StatusKind::Error);
        assert_eq!(state.chart().unwrap().config.y_column, "sales");
    }

    #[test]
    fn report_requires_data_then_chart() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(state.build_report(), Err(ExportError::NoData)));

        let (mut state, _file) = loaded("category,sales\nA,100\nB,300\n");
        assert!(matches!(state.build_report(), Err(ExportError::NoChart)));

        state.generate_chart().unwrap();
        assert!(state.build_report().is_ok());
    }

    #[test]
    fn clear_hides_chart_but_keeps_report_data() {
        let (mut state, _file) = loaded("category,sales\nA,100\nB,300\n");
        state.generate_chart().unwrap();
        state.clear_chart();

        assert_eq!(state.status().message, "Chart cleared");
        assert!(state.chart().is_none());
        let report = state.build_report().unwrap();
        assert!(report
            .analysis
            .insights
            .contains(&"'B' has the highest sum sales of 300.00".to_string()));

        let dir = tempfile::tempdir().unwrap();
        let err = state.export_chart_svg(&dir.path().join("chart.svg")).unwrap_err();
        assert!(matches!(err, ActionError::NoChart));

        state.generate_chart().unwrap();
        assert!(state.chart().is_some());
    }

    #[test]
    fn load_caches_columns_and_preview() {
        let (state, _file) = loaded("name,score\nann,1\nbob,\n");
        assert_eq!(state.columns(), ["name", "score"]);
        assert!(state.is_numeric_column("score"));
        assert!(!state.is_numeric_column("name"));
        assert_eq!(state.preview().len(), 2);
        assert_eq!(state.preview()[1], vec!["bob", ""]);
    }

    #[test]
    fn new_load_drops_previous_chart() {
        let (mut state, _file) = loaded("category,sales\nA,100\n");
        state.generate_chart().unwrap();

        let other = csv("x,y\n1,2\n");
        state.load_csv(other.path()).unwrap();
        assert!(state.chart().is_none());
        assert!(matches!(state.build_report(), Err(ExportError::NoChart)));
    }

    #[test]
    fn report_carries_analysis() {
        let (mut state, file) = loaded("category,sales\nA,100\nB,300\n");
        state.generate_chart().unwrap();
        let report = state.build_report().unwrap();

        assert_eq!(report.title, "Data Analysis Report");
        assert_eq!(
            report.source_name,
            file.path().file_name().unwrap().to_string_lossy()
        );
        assert_eq!(report.row_count, 2);
        assert!(report
            .analysis
            .insights
            .contains(&"'B' has the highest sum sales of 300.00".to_string()));
    }

    #[test]
    fn export_report_and_svg() {
        let (mut state, _file) = loaded("category,sales\nA,100\nB,300\n");
        let dir = tempfile::tempdir().unwrap();

        let err = state.export_chart_svg(&dir.path().join("chart.svg")).unwrap_err();
        assert!(matches!(err, ActionError::NoChart));

        state.selection.chart_kind = ChartKind::Pie;
        state.generate_chart().unwrap();

        let pdf = dir.path().join("report.pdf");
        state.export_report(&pdf).unwrap();
        assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF-1.4"));
        assert_eq!(state.status().message, "Analysis report saved: report.pdf");

        let svg = dir.path().join("chart.svg");
        state.export_chart_svg(&svg).unwrap();
        assert!(std::fs::read_to_string(&svg).unwrap().contains("</svg>"));
    }

    #[test]
    fn export_to_missing_directory_is_error() {
        let (mut state, _file) = loaded("category,sales\nA,100\n");
        state.generate_chart().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = state
            .export_report(&dir.path().join("missing").join("report.pdf"))
            .unwrap_err();
        assert!(matches!(err, ActionError::Export(ExportError::Io { .. })));
        assert_eq!(state.status().kind, StatusKind::Error);
        assert!(state.status().message.starts_with("Report generation failed"));
    }
}
