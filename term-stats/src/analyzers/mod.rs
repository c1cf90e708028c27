//! Statistical analyzers over numeric series and heterogeneous datasets.
//!
//! Every analyzer is a pure function of its input: it reads, computes, and
//! returns a freshly built result. Configurable analyzers implement the
//! [`Analyzer`] trait so they can be driven uniformly by the
//! [`crate::engine::StatsEngine`].
//!
//! ## Available Analyzers
//!
//! - **Summary** (`summary`): count, moments, quartiles and percentiles
//! - **Outliers** (`outliers`): mild/extreme classification with IQR fences
//! - **Quality** (`quality`): completeness, validity, accuracy, consistency
//!   and duplicates for arbitrary JSON items
//! - **Variance** (`variance`): per-item variance attribution and top factors
//! - **Trend** (`trend`): least-squares fit with projected confidence intervals
//! - **Search** (`search`): nearest-value index over caller records
//! - **Smoothing** (`smoothing`): moving average, exponential smoothing and
//!   seasonality detection
//!
//! ## Dependency Graph
//!
//! ```text
//! summary ──► outliers ──► quality
//! variance, trend, search, smoothing (independent)
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use term_stats::analyzers::{Analyzer, OutlierDetector, Series, SummaryCalculator};
//!
//! let series = Series::from(vec![Some(12.0), None, Some(15.0), Some(11.0), Some(90.0)])
//!     .with_labels(["mon", "tue", "wed", "thu", "fri"]);
//!
//! let summary = SummaryCalculator::new().analyze(&series).unwrap();
//! assert_eq!(summary.count, 4);
//!
//! let analysis = OutlierDetector::new().analyze(&series).unwrap();
//! for outlier in &analysis.outliers {
//!     println!("{:?} at {} ({:?})", outlier.label, outlier.index, outlier.severity);
//! }
//! ```

pub mod outliers;
pub mod quality;
pub mod search;
pub mod series;
pub mod smoothing;
pub mod summary;
pub mod traits;
pub mod trend;
pub mod variance;

pub use outliers::{
    DataPoint, Direction, FenceBounds, OutlierAnalysis, OutlierDetector, OutlierRecord,
    OutlierSummary, Severity,
};
pub use quality::{
    ClassifiedItem, ItemCounts, ItemKind, QualityAssessment, QualityAssessor, QualityOptions,
    ValueRange,
};
pub use search::SearchIndex;
pub use series::{LabeledValue, Point, Series};
pub use smoothing::{
    autocorrelation, detect_seasonality, detect_seasonality_with_threshold,
    exponential_smoothing, moving_average,
};
pub use summary::{quantile, Percentiles, Quartiles, StatisticalSummary, SummaryCalculator};
pub use traits::Analyzer;
pub use trend::{
    ConfidenceInterval, Projection, TrendAnalysis, TrendAnalyzer, TrendDirection, TrendStrength,
};
pub use variance::{Contribution, Impact, SignificantFactor, VarianceAnalysis, VarianceAnalyzer};
