//! Prelude for commonly used types and traits in term-stats.

pub use crate::analyzers::{
    Analyzer, Direction, Impact, ItemKind, LabeledValue, OutlierAnalysis, Point,
    QualityAssessment, QualityOptions, SearchIndex, Series, Severity, StatisticalSummary,
    TrendAnalysis, TrendDirection, TrendStrength, VarianceAnalysis,
};
pub use crate::config::EngineConfig;
pub use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
pub use crate::engine::StatsEngine;
pub use crate::error::{Result, StatsError};
pub use crate::logging::LogConfig;
