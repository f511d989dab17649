//! Chartify Report - CSV charts with PDF analysis reports
//!
//! Loads a CSV table, derives a grouped or raw series for the selected chart,
//! and writes an analysis report with insights and summary statistics.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod report;
pub mod state;
pub mod stats;
