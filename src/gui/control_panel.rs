//! Control Panel Widget
//! Left side panel with file selection, chart options and export buttons.

use crate::data::{Aggregation, ChartKind};
use crate::state::{AppState, StatusKind};
use egui::{Color32, ComboBox, RichText};

const LABEL_WIDTH: f32 = 90.0;
const COMBO_WIDTH: f32 = 170.0;

/// Left side control panel. Edits the selection held by [`AppState`].
#[derive(Default)]
pub struct ControlPanel;

impl ControlPanel {
    pub fn new() -> Self {
        Self
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Chartify Report")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("CSV Charts & PDF Analysis")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let loaded = state.has_data();
                    let path_text = if loaded {
                        state.loader().file_name()
                    } else {
                        "No file selected".to_string()
                    };

                    ui.label(RichText::new(path_text).size(12.0).color(if loaded {
                        ui.visuals().strong_text_color()
                    } else {
                        Color32::GRAY
                    }));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Options Section =====
        ui.label(RichText::new("🔧 Chart Options").size(14.0).strong());
        ui.add_space(8.0);

        let columns = state.columns().to_vec();
        let numeric_only =
            state.selection.aggregation.requires_numeric() || state.selection.chart_kind.is_histogram();
        let numeric: Vec<bool> = columns
            .iter()
            .map(|col| !numeric_only || state.is_numeric_column(col))
            .collect();
        let selection = &mut state.selection;

        let any_column = vec![true; columns.len()];
        Self::column_combo(ui, "x_column", "X Column:", &mut selection.x_column, &columns, &any_column);
        ui.add_space(5.0);
        Self::column_combo(ui, "y_column", "Y Column:", &mut selection.y_column, &columns, &numeric);
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Aggregation:"));
            ComboBox::from_id_salt("aggregation")
                .width(COMBO_WIDTH)
                .selected_text(selection.aggregation.as_str())
                .show_ui(ui, |ui| {
                    for agg in Aggregation::ALL {
                        ui.selectable_value(&mut selection.aggregation, agg, agg.as_str());
                    }
                });
        });
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Chart Type:"));
            ComboBox::from_id_salt("chart_kind")
                .width(COMBO_WIDTH)
                .selected_text(selection.chart_kind.as_str())
                .show_ui(ui, |ui| {
                    for kind in ChartKind::ALL {
                        ui.selectable_value(&mut selection.chart_kind, kind, kind.as_str());
                    }
                });
        });

        if selection.chart_kind.is_histogram() {
            ui.label(
                RichText::new("Histogram uses the Y column only")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        let has_chart = state.chart().is_some();
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("▶ Generate Chart").size(16.0))
                .min_size(egui::vec2(200.0, 35.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Generate;
            }

            ui.add_space(6.0);

            ui.add_enabled_ui(has_chart, |ui| {
                let clear = egui::Button::new("✖ Clear Chart").min_size(egui::vec2(150.0, 28.0));
                if ui.add(clear).clicked() {
                    action = ControlPanelAction::Clear;
                }

                ui.add_space(6.0);

                let svg = egui::Button::new("🖼 Export Chart (SVG)").min_size(egui::vec2(150.0, 28.0));
                if ui.add(svg).clicked() {
                    action = ControlPanelAction::ExportChart;
                }
            });

            ui.add_space(6.0);

            let report = egui::Button::new(RichText::new("📄 Generate PDF Report").size(14.0))
                .min_size(egui::vec2(200.0, 30.0));
            if ui.add(report).clicked() {
                action = ControlPanelAction::ExportReport;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("ℹ Status").size(14.0).strong());
        ui.add_space(5.0);

        let status = state.status();
        let status_color = match status.kind {
            StatusKind::Error => Color32::from_rgb(220, 53, 69),
            StatusKind::Warning => Color32::from_rgb(255, 193, 7),
            StatusKind::Success => Color32::from_rgb(40, 167, 69),
            StatusKind::Info => Color32::GRAY,
        };
        ui.label(RichText::new(&status.message).size(11.0).color(status_color));

        action
    }

    /// Column picker; entries whose `enabled` flag is false are greyed out.
    fn column_combo(
        ui: &mut egui::Ui,
        id: &str,
        label: &str,
        selected: &mut String,
        columns: &[String],
        enabled: &[bool],
    ) {
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
            ComboBox::from_id_salt(id)
                .width(COMBO_WIDTH)
                .selected_text(selected.as_str())
                .show_ui(ui, |ui| {
                    for (col, &enabled) in columns.iter().zip(enabled) {
                        let response = ui
                            .add_enabled(enabled, egui::SelectableLabel::new(*selected == *col, col))
                            .on_disabled_hover_text("Not numeric");
                        if response.clicked() {
                            *selected = col.clone();
                        }
                    }
                });
        });
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Generate,
    Clear,
    ExportChart,
    ExportReport,
}
