//! Configured entry point exposing every statistics operation.
//!
//! [`StatsEngine`] bundles an [`EngineConfig`] with a caller-provided
//! [`DiagnosticSink`]. Each operation runs the corresponding analyzer and
//! reports one [`DiagnosticEvent`] to the sink, whether it succeeded or not.
//! The engine holds no mutable state and can be shared across threads.
//!
//! # Examples
//!
//! ```rust
//! use term_stats::analyzers::Point;
//! use term_stats::config::{EngineConfig, TrendConfig};
//! use term_stats::engine::StatsEngine;
//!
//! let config = EngineConfig::default()
//!     .with_trend(TrendConfig::default().with_projection_periods(5));
//! let engine = StatsEngine::builder().config(config).build().unwrap();
//!
//! let trend = engine
//!     .analyze_trend(&[Point::new(1.0, 3.0), Point::new(2.0, 5.0), Point::new(3.0, 7.0)])
//!     .unwrap();
//! assert_eq!(trend.projections.len(), 5);
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::analyzers::smoothing;
use crate::analyzers::{
    Analyzer, LabeledValue, OutlierAnalysis, OutlierDetector, Point, QualityAssessment,
    QualityAssessor, QualityOptions, SearchIndex, Series, StatisticalSummary, SummaryCalculator,
    TrendAnalysis, TrendAnalyzer, VarianceAnalysis, VarianceAnalyzer,
};
use crate::config::EngineConfig;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, TracingSink};
use crate::error::Result;

/// Builder for [`StatsEngine`].
#[derive(Debug, Default)]
pub struct StatsEngineBuilder {
    config: EngineConfig,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl StatsEngineBuilder {
    /// Sets the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the sink receiving one event per operation.
    ///
    /// Defaults to a [`TracingSink`] using the configured [`crate::logging::LogConfig`].
    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validates the configuration and builds the engine.
    pub fn build(self) -> Result<StatsEngine> {
        self.config.validate()?;
        let sink = match self.sink {
            Some(sink) => sink,
            None => Arc::new(TracingSink::new(self.config.logging.clone())),
        };
        Ok(StatsEngine {
            config: self.config,
            sink,
        })
    }
}

/// Statistics engine with validated configuration and an injected sink.
#[derive(Debug, Clone)]
pub struct StatsEngine {
    config: EngineConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for StatsEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        let sink = Arc::new(TracingSink::new(config.logging.clone()));
        Self { config, sink }
    }
}

impl StatsEngine {
    /// Creates an engine with default configuration and a tracing sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder.
    pub fn builder() -> StatsEngineBuilder {
        StatsEngineBuilder::default()
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Summarizes the valid entries of a series.
    ///
    /// Fails with [`crate::error::StatsError::DataEmpty`] when none remain.
    pub fn calculate_summary(&self, series: impl Into<Series>) -> Result<StatisticalSummary> {
        let series = series.into();
        let result = SummaryCalculator::new().analyze(&series);
        self.observe("calculate_summary", series.len(), result, |s| {
            format!("count={} mean={}", s.count, s.mean)
        })
    }

    /// Partitions the valid entries of a series into outliers and clean data.
    ///
    /// Labels attached to the series are carried onto the records.
    pub fn detect_outliers(&self, series: impl Into<Series>) -> OutlierAnalysis {
        let series = series.into();
        crate::log_analysis!(
            self.config.logging,
            mild = self.config.outliers.mild_multiplier,
            extreme = self.config.outliers.extreme_multiplier,
            "Applying outlier fence multipliers"
        );
        let analysis = OutlierDetector::with_config(self.config.outliers.clone()).detect(&series);
        self.sink.record(DiagnosticEvent::completed(
            "detect_outliers",
            series.len(),
            format!(
                "outliers={} extreme={}",
                analysis.summary.total, analysis.summary.extreme
            ),
        ));
        analysis
    }

    /// Assesses data quality, using the configured options unless overridden.
    pub fn assess_data_quality(
        &self,
        items: &[Value],
        options: Option<&QualityOptions>,
    ) -> Result<QualityAssessment> {
        let options = options.unwrap_or(&self.config.quality).clone();
        let result = QualityAssessor::new(options)
            .with_outlier_config(self.config.outliers.clone())
            .analyze(items);
        self.observe("assess_data_quality", items.len(), result, |a| {
            format!(
                "overall={:.1} recommendations={}",
                a.overall_score,
                a.recommendations.len()
            )
        })
    }

    /// Decomposes the variance of labeled values.
    pub fn analyze_variance(&self, values: &[LabeledValue]) -> Result<VarianceAnalysis> {
        let result = VarianceAnalyzer::with_config(self.config.variance.clone()).analyze(values);
        self.observe("analyze_variance", values.len(), result, |v| {
            format!(
                "total={} factors={}",
                v.total_variance,
                v.significant_factors.len()
            )
        })
    }

    /// Fits a trend line through `{x, y}` points.
    ///
    /// Fails with [`crate::error::StatsError::InsufficientData`] for fewer
    /// than two points.
    pub fn analyze_trend(&self, points: &[Point]) -> Result<TrendAnalysis> {
        crate::log_analysis!(
            self.config.logging,
            projection_periods = self.config.trend.projection_periods,
            z_score = self.config.trend.confidence_z,
            "Fitting trend"
        );
        let result = TrendAnalyzer::with_config(self.config.trend.clone()).analyze(points);
        self.observe("analyze_trend", points.len(), result, |t| {
            format!("slope={} direction={:?}", t.slope, t.direction)
        })
    }

    /// Builds a nearest-value index over a copy of `data`.
    pub fn create_search_index<T, F>(&self, data: &[T], accessor: F) -> SearchIndex<T>
    where
        T: Clone,
        F: Fn(&T) -> f64,
    {
        let index = SearchIndex::new(data, accessor);
        self.sink.record(DiagnosticEvent::completed(
            "create_search_index",
            data.len(),
            format!("indexed={}", index.len()),
        ));
        index
    }

    /// Simple moving average; see [`smoothing::moving_average`].
    pub fn calculate_moving_average(&self, series: &[f64], window: usize) -> Result<Vec<f64>> {
        let result = smoothing::moving_average(series, window);
        self.observe("calculate_moving_average", series.len(), result, |v| {
            format!("window={window} outputs={}", v.len())
        })
    }

    /// Exponential smoothing; see [`smoothing::exponential_smoothing`].
    pub fn calculate_exponential_smoothing(&self, series: &[f64], alpha: f64) -> Result<Vec<f64>> {
        let result = smoothing::exponential_smoothing(series, alpha);
        self.observe("calculate_exponential_smoothing", series.len(), result, |v| {
            format!("alpha={alpha} outputs={}", v.len())
        })
    }

    /// Seasonality check using the configured autocorrelation threshold.
    pub fn detect_seasonality(&self, series: &[f64], period: usize) -> bool {
        crate::log_analysis!(
            self.config.logging,
            period,
            threshold = self.config.smoothing.seasonality_threshold,
            "Checking seasonality"
        );
        let seasonal = smoothing::detect_seasonality_with_threshold(
            series,
            period,
            self.config.smoothing.seasonality_threshold,
        );
        self.sink.record(DiagnosticEvent::completed(
            "detect_seasonality",
            series.len(),
            format!("period={period} seasonal={seasonal}"),
        ));
        seasonal
    }

    fn observe<T>(
        &self,
        operation: &str,
        input_len: usize,
        result: Result<T>,
        describe: impl FnOnce(&T) -> String,
    ) -> Result<T> {
        let event = match &result {
            Ok(value) => DiagnosticEvent::completed(operation, input_len, describe(value)),
            Err(err) => {
                DiagnosticEvent::failed(operation, input_len, format!("{}: {err}", err.kind()))
            }
        };
        self.sink.record(event);
        result
    }
}
