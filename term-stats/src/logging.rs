//! Logging utilities and configuration for Term statistics.
//!
//! The library itself only emits `tracing` events; it never installs a
//! subscriber. Binaries and tests that want output can call
//! [`setup::init_logging`].

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Logging configuration for the statistics engine.
///
/// Controls how much detail [`crate::diagnostics::TracingSink`] forwards to
/// `tracing`, keeping overhead low for hot analysis loops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Base log level for engine components
    #[serde(with = "level_serde")]
    pub base_level: Level,
    /// Whether to log per-analysis details such as thresholds and counts
    pub log_analysis_details: bool,
    /// Whether to log input sizes for every call
    pub log_inputs: bool,
    /// Longest message forwarded per event; longer ones are cut
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_analysis_details: false,
            log_inputs: true,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Everything at `DEBUG`, including fence multipliers and thresholds.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_analysis_details: true,
            log_inputs: true,
            max_field_length: 1024,
        }
    }

    /// Failures only; completed operations are not logged.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_analysis_details: false,
            log_inputs: false,
            max_field_length: 128,
        }
    }

    /// Same as [`LogConfig::default`].
    pub fn balanced() -> Self {
        Self::default()
    }
}

/// Emits a `DEBUG` event when the config's base level admits it.
///
/// Arguments are not evaluated otherwise.
#[macro_export]
macro_rules! perf_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.base_level >= tracing::Level::DEBUG {
            tracing::debug!($($arg)*);
        }
    };
}

/// Emits a `DEBUG` event when `log_analysis_details` is set.
#[macro_export]
macro_rules! log_analysis {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_analysis_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Cuts `value` to at most `max_length` bytes plus a marker.
///
/// Never splits a UTF-8 character.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if max_length >= value.len() {
        return value.to_owned();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

mod level_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::Level;

    pub fn serialize<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&level.as_str().to_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Level>().map_err(serde::de::Error::custom)
    }
}

/// Utilities for setting up structured logging.
pub mod setup {
    use tracing::Level;

    /// Subscriber settings for [`init_logging`].
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Level for every other target
        pub level: Level,
        /// Level for `term_stats` targets
        pub stats_level: Level,
        /// Emit one JSON object per line
        pub json_format: bool,
        /// Replaces the computed filter directive entirely
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                stats_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// JSON lines, `WARN` globally and `INFO` for this crate.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                stats_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        /// Plain text, `DEBUG` everywhere.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                stats_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        /// Level for targets outside this crate.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the log level for term-stats components.
        pub fn with_stats_level(mut self, level: Level) -> Self {
            self.stats_level = level;
            self
        }

        /// Toggles JSON output.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Uses `filter` verbatim as the `EnvFilter` directive.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// The `EnvFilter` directive, e.g. `info,term_stats=debug`.
        pub fn env_filter(&self) -> String {
            match &self.env_filter {
                Some(directive) => directive.clone(),
                None => format!(
                    "{},term_stats={}",
                    self.level.as_str().to_ascii_lowercase(),
                    self.stats_level.as_str().to_ascii_lowercase()
                ),
            }
        }
    }

    /// Initializes a global `tracing` subscriber.
    ///
    /// Fails if a global subscriber has already been installed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use term_stats::logging::setup::{LoggingConfig, init_logging};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}
