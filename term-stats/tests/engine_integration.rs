//! Integration tests for the configured engine, diagnostics and logging.

use std::io;
use std::sync::{Arc, Mutex};

use serde_json::json;
use term_stats::analyzers::{LabeledValue, Point, QualityOptions, Series};
use term_stats::config::EngineConfig;
use term_stats::diagnostics::{DiagnosticEvent, DiagnosticSink, MemorySink, NoopSink, Outcome};
use term_stats::engine::StatsEngine;
use term_stats::error::StatsError;
use term_stats::logging::LogConfig;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Counts events per outcome without storing them.
#[derive(Debug, Default)]
struct CountingSink {
    completed: Mutex<usize>,
    failed: Mutex<usize>,
}

impl DiagnosticSink for CountingSink {
    fn record(&self, event: DiagnosticEvent) {
        let counter = match event.outcome {
            Outcome::Completed => &self.completed,
            Outcome::Failed => &self.failed,
        };
        *counter.lock().unwrap() += 1;
    }
}

#[test]
fn test_json_config_drives_engine_thresholds() {
    let config = EngineConfig::from_json_str(
        r#"{
            "outliers": { "mildMultiplier": 0.25, "extremeMultiplier": 1.0 },
            "variance": { "topFactors": 2 },
            "trend": { "projectionPeriods": 1 }
        }"#,
    )
    .unwrap();
    let engine = StatsEngine::builder()
        .config(config)
        .sink(Arc::new(NoopSink))
        .build()
        .unwrap();

    let values: Vec<f64> = (1..=10).map(f64::from).collect();
    let strict = engine.detect_outliers(values.clone());
    let standard = term_stats::detect_outliers(values);
    assert!(strict.outliers.len() > standard.outliers.len());

    let variance = engine
        .analyze_variance(&[
            LabeledValue::new("a", 1.0),
            LabeledValue::new("b", 5.0),
            LabeledValue::new("c", 9.0),
        ])
        .unwrap();
    assert_eq!(variance.significant_factors.len(), 2);

    let trend = engine
        .analyze_trend(&[Point::new(0.0, 1.0), Point::new(1.0, 3.0)])
        .unwrap();
    assert_eq!(trend.projections.len(), 1);
}

#[test]
fn test_memory_sink_captures_outcomes() {
    let sink = Arc::new(MemorySink::new());
    let engine = StatsEngine::builder().sink(sink.clone()).build().unwrap();

    engine.calculate_summary(Series::from(vec![Some(1.0), None, Some(3.0)])).unwrap();
    engine.analyze_trend(&[Point::new(0.0, 0.0)]).unwrap_err();
    engine
        .calculate_exponential_smoothing(&[1.0, 2.0], -1.0)
        .unwrap_err();

    let events = sink.events();
    assert_eq!(events.len(), 3);

    assert_eq!(events[0].outcome, Outcome::Completed);
    assert_eq!(events[0].input_len, 3);
    assert!(events[0].message.contains("count=2"));

    assert_eq!(events[1].operation, "analyze_trend");
    assert_eq!(events[1].outcome, Outcome::Failed);
    assert!(events[1].message.starts_with("insufficient_data"));

    assert_eq!(events[2].outcome, Outcome::Failed);
    assert!(events[2].message.starts_with("invalid_alpha"));
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_custom_sink_implementation() {
    let sink = Arc::new(CountingSink::default());
    let engine = StatsEngine::builder().sink(sink.clone()).build().unwrap();

    engine.detect_seasonality(&[1.0, 2.0, 1.0, 2.0], 2);
    engine.calculate_moving_average(&[1.0], 2).unwrap_err();
    engine.create_search_index(&[3.0, 1.0], |v: &f64| *v);

    assert_eq!(*sink.completed.lock().unwrap(), 2);
    assert_eq!(*sink.failed.lock().unwrap(), 1);
}

#[test]
fn test_tracing_sink_emits_structured_logs() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(logs.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let engine = StatsEngine::builder()
            .config(EngineConfig::default().with_logging(LogConfig::balanced()))
            .build()
            .unwrap();
        engine.calculate_summary([1.0, 2.0, 3.0]).unwrap();
        engine.calculate_moving_average(&[1.0], 5).unwrap_err();
    });

    let output = logs.contents();
    assert!(output.contains("Statistics operation completed"));
    assert!(output.contains("calculate_summary"));
    assert!(output.contains("Statistics operation failed"));
    assert!(output.contains("invalid_window"));
}

#[test]
fn test_analysis_details_follow_log_config() {
    let run = |logging: LogConfig| {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(logs.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let engine = StatsEngine::builder()
                .config(EngineConfig::default().with_logging(logging))
                .build()
                .unwrap();
            engine.detect_outliers([1.0, 2.0, 3.0, 40.0]);
        });
        logs.contents()
    };

    let verbose = run(LogConfig::verbose());
    assert!(verbose.contains("Applying outlier fence multipliers"));

    let production = run(LogConfig::production());
    assert!(!production.contains("Applying outlier fence multipliers"));
    assert!(!production.contains("Statistics operation completed"));
}

#[test]
fn test_invalid_json_config_is_rejected() {
    let err = EngineConfig::from_json_str(r#"{ "smoothing": { "seasonalityThreshold": 2.0 } }"#)
        .unwrap_err();
    assert!(matches!(err, StatsError::Configuration(_)));

    let err = EngineConfig::from_json_str(r#"{ "quality": { "nullTolerance": "high" } }"#)
        .unwrap_err();
    assert!(matches!(err, StatsError::Serialization(_)));
}

#[test]
fn test_configured_quality_options_apply() {
    let config = EngineConfig::default()
        .with_quality(QualityOptions::default().with_expected_range(0.0, 10.0));
    let engine = StatsEngine::builder()
        .config(config)
        .sink(Arc::new(NoopSink))
        .build()
        .unwrap();

    let items = vec![json!(1), json!(2), json!(3), json!(42), json!(null)];
    let assessment = engine.assess_data_quality(&items, None).unwrap();
    assert_eq!(assessment.accuracy, 60.0);
    assert!(assessment
        .recommendations
        .iter()
        .any(|r| r.starts_with("Found 1 values outside the expected range [0, 10] (60.0% accurate)")));

    let parsed = serde_json::to_value(&assessment).unwrap();
    assert_eq!(parsed["accuracy"], 60.0);
    assert_eq!(parsed["counts"]["accurate"], 3);
    assert_eq!(parsed["anomalies"]["outliers"][0]["value"], 42.0);
}
