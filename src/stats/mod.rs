//! Stats module - descriptive statistics and report insights

mod calculator;
mod insights;

pub use calculator::{DescriptiveStats, HistogramBin, Skew, StatsCalculator, DEFAULT_HISTOGRAM_BINS};
pub use insights::{Analysis, AnalysisError, InsightGenerator, StatRow, UNAVAILABLE_INSIGHT};
