//! Chartify Report Main Application
//! Main window with control panel, chart view and data preview.

use crate::config::AppConfig;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::state::{ActionError, AppState};
use egui::{CentralPanel, SidePanel, TopBottomPanel};

/// Main application window.
pub struct ChartifyApp {
    state: AppState,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl ChartifyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Select CSV File")
            .add_filter("CSV Files", &["csv"])
            .add_filter("All Files", &["*"])
            .pick_file()
        else {
            return;
        };

        if let Err(e) = self.state.load_csv(&path) {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Error")
                .set_description(format!("Failed to load CSV:\n{}", e))
                .show();
        }
    }

    fn handle_generate(&mut self) {
        if let Err(e) = self.state.generate_chart() {
            Self::show_failure(&e, "Failed to generate chart");
        }
    }

    fn handle_export_chart(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save Chart")
            .add_filter("SVG Image", &["svg"])
            .set_file_name("chart.svg")
            .save_file()
        else {
            return;
        };

        if let Err(e) = self.state.export_chart_svg(&path) {
            Self::show_failure(&e, "Failed to export chart");
        }
    }

    /// Handle PDF export - ask for a path, write the report and open it
    fn handle_export_report(&mut self) {
        // Check guards before asking for a path.
        if let Err(e) = self.state.report_ready() {
            Self::show_failure(&ActionError::from(e), "Failed to generate report");
            return;
        }

        let default_path = self.state.default_report_path();
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save Analysis Report")
            .add_filter("PDF Files", &["pdf"]);
        if let Some(dir) = default_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = default_path.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }

        let Some(mut path) = dialog.save_file() else {
            return;
        };
        if path.extension().is_none() {
            path.set_extension("pdf");
        }

        match self.state.export_report(&path) {
            Ok(()) => {
                if self.state.config.report.open_after_export {
                    if let Err(e) = open::that(&path) {
                        log::warn!("Could not open {}: {}", path.display(), e);
                    }
                } else {
                    rfd::MessageDialog::new()
                        .set_level(rfd::MessageLevel::Info)
                        .set_title("Success")
                        .set_description(format!(
                            "Analysis report generated successfully:\n{}",
                            path.display()
                        ))
                        .show();
                }
            }
            Err(e) => Self::show_failure(&e, "Failed to generate report"),
        }
    }

    /// Warnings show the guard message, errors the failed action as well.
    fn show_failure(e: &ActionError, action: &str) {
        let (level, title, text) = if e.is_warning() {
            (rfd::MessageLevel::Warning, "Warning", e.to_string())
        } else {
            (rfd::MessageLevel::Error, "Error", format!("{}:\n{}", action, e))
        };
        rfd::MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(text)
            .show();
    }
}

impl eframe::App for ChartifyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &mut self.state);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Generate => self.handle_generate(),
                        ControlPanelAction::Clear => self.state.clear_chart(),
                        ControlPanelAction::ExportChart => self.handle_export_chart(),
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Bottom panel - Data Preview
        TopBottomPanel::bottom("data_preview")
            .resizable(true)
            .default_height(240.0)
            .min_height(120.0)
            .show(ctx, |ui| {
                self.chart_viewer.show_preview(ui, &self.state);
            });

        // Central panel - Chart Viewer
        CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.state);
        });
    }
}
