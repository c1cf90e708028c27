//! Caller-injected diagnostic sinks.
//!
//! The engine follows a bring-your-own-sink pattern: it never installs a
//! process-wide logger. Callers hand a [`DiagnosticSink`] to
//! [`crate::engine::StatsEngine`] and receive one [`DiagnosticEvent`] per
//! operation. [`TracingSink`] forwards events to `tracing`, [`MemorySink`]
//! keeps them for inspection and [`NoopSink`] drops them.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use term_stats::diagnostics::{MemorySink, Outcome};
//! use term_stats::engine::StatsEngine;
//!
//! let sink = Arc::new(MemorySink::new());
//! let engine = StatsEngine::builder().sink(sink.clone()).build().unwrap();
//!
//! engine.calculate_summary([1.0, 2.0, 3.0]).unwrap();
//!
//! let events = sink.events();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].operation, "calculate_summary");
//! assert_eq!(events[0].outcome, Outcome::Completed);
//! ```

use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logging::{truncate_field, LogConfig};

/// Whether an operation produced a result or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Failed,
}

/// A structured record of one engine operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticEvent {
    /// When the operation finished.
    pub timestamp: DateTime<Utc>,
    /// Name of the engine operation, e.g. `detect_outliers`.
    pub operation: String,
    pub outcome: Outcome,
    /// Number of input entries the operation received.
    pub input_len: usize,
    /// Short human-readable description of the result or failure.
    pub message: String,
}

impl DiagnosticEvent {
    /// Creates an event for a successful operation.
    pub fn completed(
        operation: impl Into<String>,
        input_len: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: operation.into(),
            outcome: Outcome::Completed,
            input_len,
            message: message.into(),
        }
    }

    /// Creates an event for a failed operation.
    pub fn failed(operation: impl Into<String>, input_len: usize, message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failed,
            ..Self::completed(operation, input_len, message)
        }
    }
}

/// Receiver for engine diagnostics.
///
/// Implementations must be cheap and must not panic; they are called
/// synchronously at the end of every engine operation.
pub trait DiagnosticSink: Send + Sync + Debug {
    /// Records a single event.
    fn record(&self, event: DiagnosticEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _event: DiagnosticEvent) {}
}

/// Sink that forwards events to `tracing`.
///
/// Failures are emitted at `WARN`; completions at `INFO` when
/// [`LogConfig::log_inputs`] is set and at `DEBUG` otherwise.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    config: LogConfig,
}

impl TracingSink {
    /// Creates a tracing sink with the given log configuration.
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }
}

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        let message = truncate_field(&event.message, self.config.max_field_length);
        match event.outcome {
            Outcome::Failed => tracing::warn!(
                operation = %event.operation,
                input_len = event.input_len,
                error = %message,
                "Statistics operation failed"
            ),
            Outcome::Completed if self.config.log_inputs => tracing::info!(
                operation = %event.operation,
                input_len = event.input_len,
                result = %message,
                "Statistics operation completed"
            ),
            Outcome::Completed => {
                crate::perf_debug!(
                    self.config,
                    operation = %event.operation,
                    result = %message,
                    "Statistics operation completed"
                );
            }
        }
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    /// Creates an empty memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns all recorded events.
    pub fn drain(&self) -> Vec<DiagnosticEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_and_drains() {
        let sink = MemorySink::new();
        sink.record(DiagnosticEvent::completed("calculate_summary", 3, "mean=2"));
        sink.record(DiagnosticEvent::failed("analyze_trend", 1, "insufficient data"));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].outcome, Outcome::Completed);
        assert_eq!(events[1].outcome, Outcome::Failed);
        assert_eq!(events[1].input_len, 1);

        assert_eq!(sink.drain().len(), 2);
        assert!(sink.events().is_empty());
    }

    /// In-memory writer for the fmt subscriber.
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(config: LogConfig, events: Vec<DiagnosticEvent>) -> String {
        let out = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(out.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let sink = TracingSink::new(config);
            for event in events {
                sink.record(event);
            }
        });
        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_tracing_sink_emits_events() {
        let output = capture(
            LogConfig::verbose(),
            vec![
                DiagnosticEvent::completed("detect_seasonality", 12, "seasonal=true"),
                DiagnosticEvent::failed("moving_average", 2, "invalid_window: bad window"),
            ],
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("Statistics operation completed"));
        assert!(lines[0].contains("operation=detect_seasonality"));
        assert!(lines[0].contains("input_len=12"));
        assert!(lines[1].contains("WARN"));
        assert!(lines[1].contains("Statistics operation failed"));
        assert!(lines[1].contains("invalid_window: bad window"));
    }

    #[test]
    fn test_tracing_sink_respects_log_config() {
        let output = capture(
            LogConfig::production(),
            vec![
                DiagnosticEvent::completed("calculate_summary", 3, "mean=2"),
                DiagnosticEvent::failed("analyze_trend", 1, "insufficient_data"),
            ],
        );
        assert!(!output.contains("Statistics operation completed"));
        assert!(output.contains("Statistics operation failed"));

        let short = LogConfig {
            max_field_length: 4,
            ..LogConfig::verbose()
        };
        let output = capture(
            short,
            vec![DiagnosticEvent::failed("analyze_trend", 1, "insufficient_data")],
        );
        assert!(output.contains("insu...(truncated)"));
        assert!(!output.contains("insufficient_data"));
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = DiagnosticEvent::completed("analyze_variance", 4, "total=1.0");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["outcome"], "completed");
        assert_eq!(json["inputLen"], 4);
        assert!(json.get("timestamp").is_some());
    }
}
