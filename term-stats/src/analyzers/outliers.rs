//! IQR-fence outlier detection.
//!
//! Values outside `[q1 - k·iqr, q3 + k·iqr]` (with `k` = 1.5 by default) are
//! outliers; those also outside the `3·iqr` fences are extreme. When the IQR
//! is zero the fences collapse onto q1/q3 and any deviation from them is
//! flagged. The outlier and clean partitions together cover every valid
//! input entry exactly once.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::analyzers::summary::StatisticalSummary;
use crate::analyzers::{Analyzer, Series};
use crate::config::OutlierConfig;
use crate::error::Result;

/// How far outside the fences an outlier lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Extreme,
}

/// Which fence an outlier violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Lower,
    Upper,
}

/// A value flagged as an outlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierRecord {
    pub value: f64,
    /// Position in the original series, counting invalid entries.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub severity: Severity,
    pub direction: Direction,
}

/// A valid value that lies within the fences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub value: f64,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The four fence thresholds derived from the quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FenceBounds {
    pub lower: f64,
    pub upper: f64,
    pub extreme_lower: f64,
    pub extreme_upper: f64,
}

impl FenceBounds {
    /// Derives fences from a summary's quartiles.
    pub fn from_summary(summary: &StatisticalSummary, config: &OutlierConfig) -> Self {
        let q1 = summary.quartiles.q1;
        let q3 = summary.quartiles.q3;
        let iqr = summary.quartiles.iqr;
        Self {
            lower: q1 - config.mild_multiplier * iqr,
            upper: q3 + config.mild_multiplier * iqr,
            extreme_lower: q1 - config.extreme_multiplier * iqr,
            extreme_upper: q3 + config.extreme_multiplier * iqr,
        }
    }

    /// Classifies a value, returning `None` when it lies within the mild fences.
    pub fn classify(&self, value: f64) -> Option<(Severity, Direction)> {
        if value >= self.lower && value <= self.upper {
            return None;
        }
        let direction = if value < self.lower {
            Direction::Lower
        } else {
            Direction::Upper
        };
        let severity = if value < self.extreme_lower || value > self.extreme_upper {
            Severity::Extreme
        } else {
            Severity::Mild
        };
        Some((severity, direction))
    }
}

/// Counts derived from the outlier partition.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub total: usize,
    pub mild: usize,
    pub extreme: usize,
    /// Share of valid entries flagged as outliers, in percent.
    pub percentage: f64,
}

/// Result of outlier detection over a series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierAnalysis {
    pub outliers: Vec<OutlierRecord>,
    pub clean_data: Vec<DataPoint>,
    /// Fences used for classification; `None` when no valid values were supplied.
    pub bounds: Option<FenceBounds>,
    pub summary: OutlierSummary,
}

impl OutlierAnalysis {
    /// Builds the analysis, deriving the summary counts from the partition.
    fn from_partition(
        outliers: Vec<OutlierRecord>,
        clean_data: Vec<DataPoint>,
        bounds: Option<FenceBounds>,
    ) -> Self {
        let total = outliers.len();
        let extreme = outliers
            .iter()
            .filter(|o| o.severity == Severity::Extreme)
            .count();
        let valid = total + clean_data.len();
        let percentage = if valid == 0 {
            0.0
        } else {
            total as f64 / valid as f64 * 100.0
        };
        Self {
            outliers,
            clean_data,
            bounds,
            summary: OutlierSummary {
                total,
                mild: total - extreme,
                extreme,
                percentage,
            },
        }
    }

    /// Returns true if any outliers were found.
    pub fn has_outliers(&self) -> bool {
        !self.outliers.is_empty()
    }
}

/// Flags mild and extreme outliers using IQR fences.
///
/// # Example
///
/// ```rust
/// use term_stats::analyzers::{Analyzer, OutlierDetector, Series, Severity};
///
/// let series = Series::from([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]);
/// let analysis = OutlierDetector::new().analyze(&series).unwrap();
///
/// assert_eq!(analysis.outliers.len(), 1);
/// assert_eq!(analysis.outliers[0].value, 100.0);
/// assert_eq!(analysis.outliers[0].severity, Severity::Extreme);
/// assert_eq!(analysis.clean_data.len(), 9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlierDetector {
    config: OutlierConfig,
}

impl OutlierDetector {
    /// Creates a detector with the standard 1.5/3.0 fence multipliers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector with custom fence multipliers.
    pub fn with_config(config: OutlierConfig) -> Self {
        Self { config }
    }

    /// Returns the detector configuration.
    pub fn config(&self) -> &OutlierConfig {
        &self.config
    }

    /// Runs detection. Never fails: a series without valid values yields an
    /// empty analysis.
    pub fn detect(&self, series: &Series) -> OutlierAnalysis {
        let sorted = series.sorted_valid();
        let Ok(summary) = StatisticalSummary::from_sorted(&sorted) else {
            return OutlierAnalysis::default();
        };
        let bounds = FenceBounds::from_summary(&summary, &self.config);

        let mut outliers = Vec::new();
        let mut clean_data = Vec::with_capacity(summary.count);
        for (index, value) in series.valid_values() {
            let label = series.label(index).map(str::to_string);
            match bounds.classify(value) {
                Some((severity, direction)) => outliers.push(OutlierRecord {
                    value,
                    index,
                    label,
                    severity,
                    direction,
                }),
                None => clean_data.push(DataPoint {
                    value,
                    index,
                    label,
                }),
            }
        }

        debug!(
            lower = bounds.lower,
            upper = bounds.upper,
            outliers = outliers.len(),
            clean = clean_data.len(),
            "Partitioned series by IQR fences"
        );
        OutlierAnalysis::from_partition(outliers, clean_data, Some(bounds))
    }
}

impl Analyzer for OutlierDetector {
    type Input = Series;
    type Output = OutlierAnalysis;

    #[instrument(skip_all, fields(analyzer = "outliers", len = input.len()))]
    fn analyze(&self, input: &Series) -> Result<OutlierAnalysis> {
        Ok(self.detect(input))
    }

    fn name(&self) -> &str {
        "outliers"
    }

    fn description(&self) -> &str {
        "Classifies values as mild or extreme outliers using IQR fences"
    }
}
