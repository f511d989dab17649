//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use super::geometry::{self, pie_slices};
use crate::data::{ChartConfig, ChartKind, GroupedRow, SeriesData};
use crate::stats::StatsCalculator;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

fn rgb((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Creates charts for the current series using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the chart matching `config.chart_kind`.
    pub fn draw_chart(
        ui: &mut egui::Ui,
        series: &SeriesData,
        config: &ChartConfig,
        histogram_bins: usize,
        height: f32,
    ) {
        ui.label(RichText::new(config.title()).size(16.0).strong());
        ui.add_space(6.0);

        match (config.chart_kind, series) {
            (ChartKind::Histogram, SeriesData::Raw(values)) => {
                Self::draw_histogram(ui, values, config, histogram_bins, height)
            }
            (ChartKind::Pie, SeriesData::Grouped(rows)) => Self::draw_pie(ui, rows, height),
            (kind, SeriesData::Grouped(rows)) => {
                Self::draw_categorical(ui, rows, config, kind, height)
            }
            _ => {
                ui.label(RichText::new("Chart data does not match chart type").color(Color32::GRAY));
            }
        }
    }

    /// Bar, line and scatter charts over categorical X positions 0..n.
    fn draw_categorical(
        ui: &mut egui::Ui,
        rows: &[GroupedRow],
        config: &ChartConfig,
        kind: ChartKind,
        height: f32,
    ) {
        let labels: Vec<String> = rows.iter().map(|r| r.key.clone()).collect();
        let series_name = config.y_axis_label();

        Plot::new(format!("chart_{}", kind))
            .height(height)
            .x_axis_label(config.x_axis_label().to_string())
            .y_axis_label(config.y_axis_label())
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if v < 0.0 || (v - v.round()).abs() > 1e-6 {
                    return String::new();
                }
                labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                let points: Vec<[f64; 2]> = rows
                    .iter()
                    .enumerate()
                    .map(|(i, r)| [i as f64, r.value])
                    .collect();

                match kind {
                    ChartKind::Bar => {
                        let bars: Vec<Bar> = rows
                            .iter()
                            .enumerate()
                            .map(|(i, r)| Bar::new(i as f64, r.value).width(0.8).name(&r.key))
                            .collect();
                        plot_ui.bar_chart(
                            BarChart::new(bars)
                                .color(rgb(geometry::BAR_RGB))
                                .name(&series_name),
                        );
                    }
                    ChartKind::Line => {
                        plot_ui.line(
                            Line::new(PlotPoints::from(points.clone()))
                                .color(rgb(geometry::LINE_RGB))
                                .width(2.0)
                                .name(&series_name),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from(points))
                                .radius(4.0)
                                .color(rgb(geometry::LINE_RGB)),
                        );
                    }
                    _ => {
                        plot_ui.points(
                            Points::new(PlotPoints::from(points))
                                .radius(6.0)
                                .color(rgb(geometry::SCATTER_RGB).gamma_multiply(0.7))
                                .name(&series_name),
                        );
                    }
                }
            });
    }

    fn draw_pie(ui: &mut egui::Ui, rows: &[GroupedRow], height: f32) {
        let Some(slices) = pie_slices(rows.iter().map(|r| (r.key.as_str(), r.value))) else {
            ui.label(
                RichText::new("Pie charts need non-negative values with a positive total")
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            return;
        };

        Plot::new("chart_pie")
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, slice) in slices.iter().enumerate() {
                    let color = rgb(geometry::palette_color(i));
                    let outline: Vec<[f64; 2]> = slice
                        .outline((0.0, 0.0), 1.0)
                        .into_iter()
                        .map(|(x, y)| [x, y])
                        .collect();

                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(outline))
                            .fill_color(color)
                            .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                            .name(&slice.label),
                    );

                    let mid = slice.mid_angle();
                    plot_ui.text(Text::new(
                        PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                        RichText::new(format!("{:.1}%", slice.fraction * 100.0))
                            .color(Color32::WHITE)
                            .strong(),
                    ));
                    plot_ui.text(Text::new(
                        PlotPoint::new(1.15 * mid.cos(), 1.15 * mid.sin()),
                        slice.label.clone(),
                    ));
                }
            });
    }

    fn draw_histogram(
        ui: &mut egui::Ui,
        values: &[f64],
        config: &ChartConfig,
        bins: usize,
        height: f32,
    ) {
        let bars: Vec<Bar> = StatsCalculator::histogram_bins(values, bins)
            .iter()
            .map(|b| {
                Bar::new(b.center(), b.count as f64)
                    .width(b.width())
                    .stroke(egui::Stroke::new(1.0, Color32::BLACK))
                    .fill(rgb(geometry::HISTOGRAM_RGB).gamma_multiply(0.7))
            })
            .collect();

        Plot::new("chart_histogram")
            .height(height)
            .x_axis_label(config.x_axis_label().to_string())
            .y_axis_label(config.y_axis_label())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(&config.y_column));
            });
    }
}
