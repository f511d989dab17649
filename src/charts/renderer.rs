//! Static Chart Renderer
//! Renders the current chart to SVG with plotters, mirroring the interactive view.

use super::geometry::{self, pie_slices};
use crate::data::{ChartConfig, ChartKind, GroupedRow, SeriesData};
use crate::stats::StatsCalculator;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No data to render")]
    NoData,
    #[error("Pie charts need non-negative values with a positive total")]
    InvalidPie,
    #[error("Chart data does not match chart type {0}")]
    Mismatch(ChartKind),
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart as an SVG document.
    pub fn render_svg(
        series: &SeriesData,
        config: &ChartConfig,
        histogram_bins: usize,
        size: (u32, u32),
    ) -> Result<String, RenderError> {
        if series.is_empty() {
            return Err(RenderError::NoData);
        }

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            match (config.chart_kind, series) {
                (ChartKind::Histogram, SeriesData::Raw(values)) => {
                    Self::draw_histogram(&root, values, config, histogram_bins)?
                }
                (ChartKind::Pie, SeriesData::Grouped(rows)) => Self::draw_pie(&root, rows, config)?,
                (ChartKind::Histogram, _) | (_, SeriesData::Raw(_)) => {
                    return Err(RenderError::Mismatch(config.chart_kind))
                }
                (kind, SeriesData::Grouped(rows)) => {
                    Self::draw_categorical(&root, rows, config, kind)?
                }
            }

            root.present().map_err(draw_err)?;
        }
        Ok(svg)
    }

    /// Render and write the chart to `path`.
    pub fn save_svg(
        path: &Path,
        series: &SeriesData,
        config: &ChartConfig,
        histogram_bins: usize,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let svg = Self::render_svg(series, config, histogram_bins, size)?;
        std::fs::write(path, svg)?;
        log::info!("Chart saved: {}", path.display());
        Ok(())
    }

    fn draw_categorical<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        rows: &[GroupedRow],
        config: &ChartConfig,
        kind: ChartKind,
    ) -> Result<(), RenderError> {
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        let (y_min, y_max) = geometry::value_range(&values);
        let labels: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();

        let mut chart = ChartBuilder::on(root)
            .caption(config.title(), ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d((0..rows.len()).into_segmented(), y_min..y_max)
            .map_err(draw_err)?;

        let x_desc = config.x_axis_label().to_string();
        let y_desc = config.y_axis_label();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(rows.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    labels.get(*i).map(|s| s.to_string()).unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .x_desc(x_desc.as_str())
            .y_desc(y_desc.as_str())
            .draw()
            .map_err(draw_err)?;

        match kind {
            ChartKind::Bar => {
                let color = rgb(geometry::BAR_RGB);
                chart
                    .draw_series(rows.iter().enumerate().map(|(i, r)| {
                        let mut bar = Rectangle::new(
                            [
                                (SegmentValue::Exact(i), 0.0),
                                (SegmentValue::Exact(i + 1), r.value),
                            ],
                            color.mix(0.8).filled(),
                        );
                        bar.set_margin(0, 0, 6, 6);
                        bar
                    }))
                    .map_err(draw_err)?;
            }
            ChartKind::Line => {
                let color = rgb(geometry::LINE_RGB);
                let points = rows
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (SegmentValue::CenterOf(i), r.value));
                chart
                    .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                    .map_err(draw_err)?;
                chart
                    .draw_series(points.map(|p| Circle::new(p, 4, color.filled())))
                    .map_err(draw_err)?;
            }
            _ => {
                let color = rgb(geometry::SCATTER_RGB);
                chart
                    .draw_series(rows.iter().enumerate().map(|(i, r)| {
                        Circle::new((SegmentValue::CenterOf(i), r.value), 6, color.mix(0.7).filled())
                    }))
                    .map_err(draw_err)?;
            }
        }

        Ok(())
    }

    fn draw_histogram<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        values: &[f64],
        config: &ChartConfig,
        bins: usize,
    ) -> Result<(), RenderError> {
        let bins = StatsCalculator::histogram_bins(values, bins);
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            return Err(RenderError::NoData);
        };
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

        let mut chart = ChartBuilder::on(root)
            .caption(config.title(), ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(first.start..last.end, 0.0..(max_count * 1.05).max(1.0))
            .map_err(draw_err)?;

        let x_desc = config.x_axis_label().to_string();
        let y_desc = config.y_axis_label();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc.as_str())
            .y_desc(y_desc.as_str())
            .draw()
            .map_err(draw_err)?;

        let fill = rgb(geometry::HISTOGRAM_RGB).mix(0.7).filled();
        chart
            .draw_series(
                bins.iter()
                    .map(|b| Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], fill)),
            )
            .map_err(draw_err)?;
        chart
            .draw_series(
                bins.iter()
                    .map(|b| Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLACK.stroke_width(1))),
            )
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        rows: &[GroupedRow],
        config: &ChartConfig,
    ) -> Result<(), RenderError> {
        let slices =
            pie_slices(rows.iter().map(|r| (r.key.as_str(), r.value))).ok_or(RenderError::InvalidPie)?;

        let area = root
            .titled(&config.title(), ("sans-serif", 20))
            .map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as f64 / 2.0, h as f64 / 2.0);
        let radius = (w.min(h) as f64 / 2.0 - 50.0).max(10.0);

        // Pixel Y grows downwards, so mirror angles to keep counter-clockwise order.
        let to_px = |(x, y): (f64, f64)| -> (i32, i32) {
            (x.round() as i32, (2.0 * center.1 - y).round() as i32)
        };

        for (i, slice) in slices.iter().enumerate() {
            let color = rgb(geometry::palette_color(i));
            let outline: Vec<(i32, i32)> = slice
                .outline(center, radius)
                .into_iter()
                .map(to_px)
                .collect();
            area.draw(&Polygon::new(outline, color.filled()))
                .map_err(draw_err)?;

            let mid = slice.mid_angle();
            let pct = to_px((
                center.0 + 0.6 * radius * mid.cos(),
                center.1 + 0.6 * radius * mid.sin(),
            ));
            area.draw(&Text::new(
                format!("{:.1}%", slice.fraction * 100.0),
                pct,
                ("sans-serif", 14).into_font().color(&WHITE),
            ))
            .map_err(draw_err)?;

            let label = to_px((
                center.0 + 1.12 * radius * mid.cos(),
                center.1 + 1.12 * radius * mid.sin(),
            ));
            area.draw(&Text::new(slice.label.clone(), label, ("sans-serif", 14).into_font()))
                .map_err(draw_err)?;
        }

        Ok(())
    }
}
