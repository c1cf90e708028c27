//! # Term Stats - Statistical Analysis for Rust
//!
//! Term Stats is an in-process statistics engine for numeric series and
//! loosely typed datasets. It turns raw values into distribution summaries,
//! outlier partitions, data-quality scores, variance attributions, trend
//! lines and smoothed series, ready for a reporting or visualization layer.
//!
//! ## Overview
//!
//! Every operation is a synchronous, deterministic function of its input.
//! Nothing is persisted and no shared state is mutated, so all functions are
//! reentrant and safe to call from any number of threads. The only value that
//! outlives a call is a [`SearchIndex`], which is immutable once built.
//!
//! ## Quick Start
//!
//! ```rust
//! use term_stats::prelude::*;
//!
//! # fn main() -> term_stats::error::Result<()> {
//! let summary = term_stats::calculate_summary([10.0, 20.0, 30.0, 40.0, 50.0])?;
//! assert_eq!(summary.median, 30.0);
//!
//! let analysis = term_stats::detect_outliers([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]);
//! assert_eq!(analysis.outliers[0].severity, Severity::Extreme);
//!
//! let smoothed = term_stats::calculate_moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3)?;
//! assert_eq!(smoothed, vec![2.0, 3.0, 4.0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configured Engine
//!
//! The free functions use default thresholds and stay silent. For tuned
//! thresholds and per-call diagnostics, build a [`engine::StatsEngine`] with
//! an [`config::EngineConfig`] and a [`diagnostics::DiagnosticSink`]:
//!
//! ```rust
//! use std::sync::Arc;
//! use term_stats::config::EngineConfig;
//! use term_stats::diagnostics::MemorySink;
//! use term_stats::engine::StatsEngine;
//!
//! let config = EngineConfig::from_json_str(r#"{ "outliers": { "mildMultiplier": 2.0 } }"#).unwrap();
//! let sink = Arc::new(MemorySink::new());
//! let engine = StatsEngine::builder().config(config).sink(sink.clone()).build().unwrap();
//!
//! let analysis = engine.detect_outliers(vec![Some(4.0), None, Some(5.0), Some(40.0)]);
//! assert_eq!(analysis.summary.total + analysis.clean_data.len(), 3);
//! assert_eq!(sink.events().len(), 1);
//! ```
//!
//! ## Data Quality
//!
//! ```rust
//! use serde_json::json;
//! use term_stats::analyzers::QualityOptions;
//!
//! let items = vec![json!(12), json!(14), json!(null), json!("14"), json!(13)];
//! let options = QualityOptions::default().with_expected_range(0.0, 100.0);
//! let assessment = term_stats::assess_data_quality(&items, Some(&options)).unwrap();
//!
//! assert_eq!(assessment.completeness, 80.0);
//! let json = serde_json::to_value(&assessment).unwrap();
//! assert_eq!(json["counts"]["null"], 1);
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` spans and events but never installs a
//! subscriber. See [`logging::setup::init_logging`] for a ready-made one.

pub mod analyzers;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod logging;
pub mod prelude;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

use serde_json::Value;

use crate::analyzers::{
    smoothing, Analyzer, LabeledValue, OutlierAnalysis, OutlierDetector, Point,
    QualityAssessment, QualityAssessor, QualityOptions, SearchIndex, Series, StatisticalSummary,
    SummaryCalculator, TrendAnalysis, TrendAnalyzer, VarianceAnalysis, VarianceAnalyzer,
};
use crate::error::Result;

/// Summarizes the valid entries of a series.
///
/// Missing and non-finite entries are dropped first. Fails with
/// [`error::StatsError::DataEmpty`] when nothing remains.
pub fn calculate_summary(series: impl Into<Series>) -> Result<StatisticalSummary> {
    SummaryCalculator::new().analyze(&series.into())
}

/// Partitions the valid entries of a series into outliers and clean data
/// using 1.5·IQR and 3·IQR fences.
///
/// Attach labels with [`Series::with_labels`] to carry them onto the records.
pub fn detect_outliers(series: impl Into<Series>) -> OutlierAnalysis {
    OutlierDetector::new().detect(&series.into())
}

/// Scores completeness, consistency, accuracy and validity of `items`.
///
/// Fails with [`error::StatsError::Configuration`] for invalid options.
pub fn assess_data_quality(
    items: &[Value],
    options: Option<&QualityOptions>,
) -> Result<QualityAssessment> {
    let options = options.cloned().unwrap_or_default();
    QualityAssessor::new(options).analyze(items)
}

/// Attributes the variance of labeled values to individual items.
pub fn analyze_variance(values: &[LabeledValue]) -> Result<VarianceAnalysis> {
    VarianceAnalyzer::new().analyze(values)
}

/// Fits a least-squares trend line and projects three periods ahead.
///
/// Fails with [`error::StatsError::InsufficientData`] for fewer than two points.
pub fn analyze_trend(points: &[Point]) -> Result<TrendAnalysis> {
    TrendAnalyzer::new().analyze(points)
}

/// Builds a nearest-value index over a copy of `data`.
pub fn create_search_index<T, F>(data: &[T], accessor: F) -> SearchIndex<T>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    SearchIndex::new(data, accessor)
}

/// Simple moving average over `window` consecutive values.
pub fn calculate_moving_average(series: &[f64], window: usize) -> Result<Vec<f64>> {
    smoothing::moving_average(series, window)
}

/// Exponential smoothing with factor `alpha` in `[0, 1]`.
pub fn calculate_exponential_smoothing(series: &[f64], alpha: f64) -> Result<Vec<f64>> {
    smoothing::exponential_smoothing(series, alpha)
}

/// Reports whether the series autocorrelates above 0.3 at lag `period`.
pub fn detect_seasonality(series: &[f64], period: usize) -> bool {
    smoothing::detect_seasonality(series, period)
}
