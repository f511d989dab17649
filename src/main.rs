//! Chartify Report - CSV Chart Builder & PDF Analysis Report
//!
//! A Rust application for charting CSV data and exporting analysis reports.

use chartify_report::config::AppConfig;
use chartify_report::gui::ChartifyApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{:#}; using default settings", e);
            AppConfig::default()
        }
    };

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Chartify Report"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Chartify Report",
        options,
        Box::new(move |cc| Ok(Box::new(ChartifyApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start GUI: {}", e))
}
