//! CSV Data Loader Module
//! Handles CSV file loading and column inspection using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default number of rows scanned when inferring column types.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: PolarsError,
    },
    #[error("CSV '{0}' has no columns")]
    NoColumns(String),
    #[error("No data loaded")]
    NoData,
}

/// Whether a column type holds numeric cells.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Boolean
            | DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Display text of a cell, `None` when the cell is missing.
pub fn cell_text(value: &AnyValue) -> Option<String> {
    if value.is_null() {
        return None;
    }
    Some(match value {
        AnyValue::String(s) => s.to_string(),
        other => other.to_string().trim_matches('"').to_string(),
    })
}

/// Handles CSV file loading with Polars. Holds the current table.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self::with_infer_schema_length(DEFAULT_INFER_SCHEMA_LENGTH)
    }

    pub fn with_infer_schema_length(infer_schema_length: usize) -> Self {
        Self {
            df: None,
            file_path: None,
            infer_schema_length,
        }
    }

    fn read_csv(file_path: &Path, infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
        LazyCsvReader::new(file_path)
            .with_infer_schema_length(infer_schema_length)
            .finish()?
            .collect()
    }

    /// Load a CSV file using Polars.
    ///
    /// Types are inferred from the first `infer_schema_length` rows; if the
    /// rest of the file disagrees, the whole file is scanned once more.
    /// The previous table is kept when parsing fails.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let display = file_path.display().to_string();

        let df = match Self::read_csv(file_path, Some(self.infer_schema_length)) {
            Ok(df) => df,
            Err(e) if file_path.is_file() => {
                log::debug!("Retrying {} with a full schema scan: {}", display, e);
                Self::read_csv(file_path, None).map_err(|source| LoaderError::Csv {
                    path: display.clone(),
                    source,
                })?
            }
            Err(source) => {
                return Err(LoaderError::Csv {
                    path: display,
                    source,
                })
            }
        };

        if df.width() == 0 {
            return Err(LoaderError::NoColumns(display));
        }

        log::info!(
            "Loaded {} ({} rows, {} columns)",
            display,
            df.height(),
            df.width()
        );

        self.file_path = Some(file_path.to_path_buf());
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(&self) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// First `limit` rows rendered as text, missing cells blank.
    pub fn preview_rows(&self, limit: usize) -> Vec<Vec<String>> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        let rows = df.height().min(limit);
        (0..rows)
            .map(|i| {
                df.get_columns()
                    .iter()
                    .map(|col| {
                        col.get(i)
                            .ok()
                            .and_then(|v| cell_text(&v))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get the number of columns in the DataFrame.
    pub fn get_column_count(&self) -> usize {
        self.df.as_ref().map(|df| df.width()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Base name of the loaded file, e.g. "sales.csv".
    pub fn file_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}
