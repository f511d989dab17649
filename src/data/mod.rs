//! Data module - CSV loading and chart data derivation

mod loader;
mod model;
mod processor;

pub use loader::{cell_text, is_numeric_dtype, DataLoader, LoaderError, DEFAULT_INFER_SCHEMA_LENGTH};
pub use model::{Aggregation, ChartConfig, ChartKind, GroupedRow, SeriesData};
pub use processor::{DataProcessor, ProcessorError};
