//! Distribution summaries for numeric series.
//!
//! The [`SummaryCalculator`] is the leaf of the analyzer graph: outlier
//! detection and quality assessment both derive their quartiles from it.
//!
//! Quantiles use linear interpolation between order statistics: for a
//! fraction `p` over `n` sorted values the position is `p * (n - 1)`, and the
//! result is interpolated between the elements at the floor and ceiling of
//! that position.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::analyzers::{Analyzer, Series};
use crate::error::{Result, StatsError};

/// Quartiles of a distribution and their spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    /// Interquartile range, `q3 - q1`.
    pub iqr: f64,
}

/// Fixed percentile points reported with every summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

/// Summary statistics for a cleaned numeric series.
///
/// `q1 <= q2 <= q3` always holds. `variance` and `standard_deviation` use the
/// sample (n - 1) convention and are zero when `count` is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalSummary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub standard_deviation: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub quartiles: Quartiles,
    pub percentiles: Percentiles,
}

impl StatisticalSummary {
    /// Computes a summary from values already sorted ascending.
    ///
    /// Fails with [`StatsError::DataEmpty`] for an empty slice. The slice must
    /// contain only finite values; callers go through [`Series::sorted_valid`].
    pub(crate) fn from_sorted(sorted: &[f64]) -> Result<Self> {
        let (&min, &max) = match (sorted.first(), sorted.last()) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err(StatsError::DataEmpty),
        };
        debug_assert!(
            sorted.windows(2).all(|w| w[0] <= w[1]),
            "values must be sorted in ascending order"
        );

        let count = sorted.len();
        let sum = sorted.iter().fold(0.0, |acc, v| acc + v);
        let mean = sum / count as f64;
        let variance = sample_variance(sorted, mean);

        // `quantile` only returns None for empty input, which was ruled out above.
        let q = |p: f64| quantile(sorted, p).unwrap_or(min);
        let q1 = q(0.25);
        let q2 = q(0.5);
        let q3 = q(0.75);

        Ok(Self {
            count,
            sum,
            mean,
            median: q2,
            variance,
            standard_deviation: variance.sqrt(),
            min,
            max,
            range: max - min,
            quartiles: Quartiles {
                q1,
                q2,
                q3,
                iqr: q3 - q1,
            },
            percentiles: Percentiles {
                p5: q(0.05),
                p10: q(0.10),
                p25: q1,
                p75: q3,
                p90: q(0.90),
                p95: q(0.95),
            },
        })
    }

    /// Coefficient of variation, `standard_deviation / |mean|`.
    ///
    /// Returns `None` when the mean is zero.
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        if self.mean == 0.0 {
            None
        } else {
            Some(self.standard_deviation / self.mean.abs())
        }
    }
}

/// Estimates the value at fraction `p` of sorted data by linear interpolation.
///
/// `p` is clamped to `[0, 1]`. Returns `None` for empty input.
///
/// # Examples
///
/// ```rust
/// use term_stats::analyzers::summary::quantile;
///
/// let sorted = [10.0, 20.0, 30.0, 40.0];
/// assert_eq!(quantile(&sorted, 0.5), Some(25.0));
/// assert_eq!(quantile(&sorted, 0.0), Some(10.0));
/// assert_eq!(quantile(&[], 0.5), None);
/// ```
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = p.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Sample variance around a known mean; zero for fewer than two values.
pub(crate) fn sample_variance(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let squared = values.iter().fold(0.0, |acc, v| acc + (v - mean).powi(2));
    squared / (values.len() - 1) as f64
}

/// Arithmetic mean; zero for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Analyzer producing a [`StatisticalSummary`] from a [`Series`].
///
/// # Example
///
/// ```rust
/// use term_stats::analyzers::{Analyzer, Series, SummaryCalculator};
///
/// let summary = SummaryCalculator::new()
///     .analyze(&Series::from([10.0, 20.0, 30.0, 40.0]))
///     .unwrap();
/// assert_eq!(summary.mean, 25.0);
/// assert_eq!(summary.median, 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryCalculator;

impl SummaryCalculator {
    /// Creates a new summary calculator.
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for SummaryCalculator {
    type Input = Series;
    type Output = StatisticalSummary;

    #[instrument(skip_all, fields(analyzer = "summary", len = input.len()))]
    fn analyze(&self, input: &Series) -> Result<StatisticalSummary> {
        let sorted = input.sorted_valid();
        debug!(
            valid = sorted.len(),
            dropped = input.len() - sorted.len(),
            "Filtered invalid entries"
        );
        StatisticalSummary::from_sorted(&sorted)
    }

    fn name(&self) -> &str {
        "summary"
    }

    fn description(&self) -> &str {
        "Computes count, mean, median, variance, quartiles and percentiles"
    }
}
