//! Application configuration
//! JSON settings for chart defaults, CSV loading and report export.

use crate::data::{Aggregation, ChartKind, DEFAULT_INFER_SCHEMA_LENGTH};
use crate::report::DEFAULT_REPORT_TITLE;
use crate::stats::DEFAULT_HISTOGRAM_BINS;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
pub const APP_NAME: &str = "chartify_report";
/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CHARTIFY_CONFIG";

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub defaults: ChartDefaults,
    pub loading: LoadingConfig,
    pub charts: ChartsConfig,
    pub report: ReportConfig,
}

/// Initial selections in the control panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartDefaults {
    pub aggregation: Aggregation,
    pub chart_kind: ChartKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadingConfig {
    /// Rows scanned when inferring column types.
    pub infer_schema_length: usize,
    /// Rows shown in the data preview grid.
    pub preview_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartsConfig {
    pub histogram_bins: usize,
    pub export_width: u32,
    pub export_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    pub default_file_name: String,
    /// Open the exported report with the system viewer.
    pub open_after_export: bool,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            aggregation: Aggregation::Sum,
            chart_kind: ChartKind::Bar,
        }
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
            preview_rows: 100,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            export_width: 1000,
            export_height: 600,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            default_file_name: "analysis_report.pdf".to_string(),
            open_after_export: true,
        }
    }
}

impl AppConfig {
    /// Resolve the config file path: `CHARTIFY_CONFIG`, else the user config dir.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(dir.join(APP_NAME).join("config.json"))
    }

    /// Load the user configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file at {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this configuration as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file at {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.loading.infer_schema_length == 0 {
            bail!("loading.infer_schema_length must be greater than 0");
        }
        if self.charts.histogram_bins == 0 {
            bail!("charts.histogram_bins must be greater than 0");
        }
        if self.charts.export_width == 0 || self.charts.export_height == 0 {
            bail!("charts.export_width and charts.export_height must be greater than 0");
        }
        if self.report.title.trim().is_empty() {
            bail!("report.title must not be empty");
        }
        if self.report.default_file_name.trim().is_empty() {
            bail!("report.default_file_name must not be empty");
        }
        Ok(())
    }
}
