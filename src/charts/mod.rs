//! Charts module - Chart rendering

mod geometry;
mod plotter;
mod renderer;

pub use geometry::{pie_slices, value_range, PieSlice};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
