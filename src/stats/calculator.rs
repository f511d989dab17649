//! Statistics Calculator Module
//! Descriptive statistics and histogram binning over plain value slices.

use statrs::statistics::{Data, Median, Statistics};

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Descriptive statistics for a set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (divisor n - 1), NaN below two values.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Skew label derived from comparing mean and median.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skew {
    Right,
    Left,
    Symmetric,
}

impl Skew {
    /// Relative gap between mean and median before a skew is reported.
    pub const THRESHOLD: f64 = 1.1;

    pub fn classify(mean: f64, median: f64) -> Self {
        if mean > median * Self::THRESHOLD {
            Skew::Right
        } else if median > mean * Self::THRESHOLD {
            Skew::Left
        } else {
            Skew::Symmetric
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Skew::Right => "right-skewed",
            Skew::Left => "left-skewed",
            Skew::Symmetric => "symmetric",
        }
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let median = Data::new(values.to_vec()).median();

        DescriptiveStats {
            count: n,
            sum: values.iter().sum(),
            mean: Statistics::mean(values),
            median,
            std: Statistics::std_dev(values),
            min: Statistics::min(values),
            max: Statistics::max(values),
        }
    }

    /// Split values into `bins` equal-width bins over [min, max].
    ///
    /// The maximum lands in the last bin. A constant series gives one bin of
    /// width 1 centred on the value.
    pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let min = Statistics::min(values);
        let max = Statistics::max(values);

        if max <= min {
            return vec![HistogramBin {
                start: min - 0.5,
                end: min + 0.5,
                count: values.len(),
            }];
        }

        let width = (max - min) / bins as f64;
        let mut out: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                start: min + i as f64 * width,
                end: if i + 1 == bins {
                    max
                } else {
                    min + (i + 1) as f64 * width
                },
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            out[idx].count += 1;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn descriptive_stats_use_sample_std() {
        let stats = StatsCalculator::compute_descriptive_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.count, 8);
        assert!(approx(stats.sum, 40.0));
        assert!(approx(stats.mean, 5.0));
        assert!(approx(stats.median, 4.5));
        // Sample variance 32 / 7
        assert!(approx(stats.std, (32.0f64 / 7.0).sqrt()));
        assert!(approx(stats.min, 2.0));
        assert!(approx(stats.max, 9.0));
    }

    #[test]
    fn odd_length_median_is_middle_value() {
        let stats = StatsCalculator::compute_descriptive_stats(&[9.0, 1.0, 5.0]);
        assert!(approx(stats.median, 5.0));
    }

    #[test]
    fn single_value_has_undefined_std() {
        let stats = StatsCalculator::compute_descriptive_stats(&[3.0]);
        assert_eq!(stats.count, 1);
        assert!(stats.std.is_nan());
        assert!(approx(stats.mean, 3.0));
    }

    #[test]
    fn empty_values_give_default() {
        let stats = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
    }

    #[test]
    fn skew_uses_ten_percent_rule() {
        assert_eq!(Skew::classify(15.0, 10.0), Skew::Right);
        assert_eq!(Skew::classify(10.0, 10.0), Skew::Symmetric);
        assert_eq!(Skew::classify(10.0, 9.0), Skew::Right);
        assert_eq!(Skew::classify(10.5, 10.0), Skew::Symmetric);
        assert_eq!(Skew::classify(8.0, 10.0), Skew::Left);
        assert_eq!(Skew::classify(9.5, 10.0), Skew::Symmetric);
    }

    #[test]
    fn histogram_bins_cover_range() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let bins = StatsCalculator::histogram_bins(&values, 5);
        assert_eq!(bins.len(), 5);
        assert!(approx(bins[0].start, 0.0));
        assert!(approx(bins[4].end, 10.0));
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[4].count, 1);
    }

    #[test]
    fn constant_values_fill_single_bin() {
        let bins = StatsCalculator::histogram_bins(&[7.0, 7.0, 7.0], 20);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert!(approx(bins[0].center(), 7.0));
        assert!(approx(bins[0].width(), 1.0));
    }
}
