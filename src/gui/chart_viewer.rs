//! Chart Viewer Widget
//! Central area: the current chart on top, the loaded table below.

use crate::charts::ChartPlotter;
use crate::state::AppState;
use egui::{Color32, RichText, ScrollArea};

const MIN_CHART_HEIGHT: f32 = 250.0;
const PREVIEW_COLUMN_WIDTH: f32 = 100.0;

#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the chart area
    pub fn show(&mut self, ui: &mut egui::Ui, state: &AppState) {
        let Some(chart) = state.chart() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Generate a chart to see it here")
                        .size(18.0)
                        .color(Color32::GRAY),
                );
            });
            return;
        };

        let height = (ui.available_height() - 40.0).max(MIN_CHART_HEIGHT);
        ChartPlotter::draw_chart(
            ui,
            &chart.series,
            &chart.config,
            state.config.charts.histogram_bins,
            height,
        );
    }

    /// Draw the first rows of the loaded table as a grid.
    pub fn show_preview(&mut self, ui: &mut egui::Ui, state: &AppState) {
        let columns = state.columns();
        if columns.is_empty() {
            ui.label(RichText::new("No data loaded").color(Color32::GRAY));
            return;
        }

        let rows = state.preview();
        let total = state.loader().get_row_count();

        ui.horizontal(|ui| {
            ui.label(RichText::new("Data Preview").size(14.0).strong());
            if total > rows.len() {
                ui.label(
                    RichText::new(format!("(first {} of {} rows)", rows.len(), total))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            }
        });
        ui.add_space(4.0);

        ScrollArea::both()
            .id_salt("data_preview")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("data_preview_grid")
                    .striped(true)
                    .min_col_width(PREVIEW_COLUMN_WIDTH)
                    .show(ui, |ui| {
                        for col in columns {
                            ui.label(RichText::new(col).strong());
                        }
                        ui.end_row();

                        for row in rows {
                            for cell in row {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
