//! Configuration for the statistics engine.
//!
//! Every analyzer threshold lives in a small config struct with sensible
//! defaults. All structs deserialize with `#[serde(default)]`, so a partial
//! JSON document only overrides the fields it names:
//!
//! ```rust
//! use term_stats::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "trend": { "projectionPeriods": 6 } }"#).unwrap();
//! assert_eq!(config.trend.projection_periods, 6);
//! assert_eq!(config.outliers.mild_multiplier, 1.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::analyzers::quality::QualityOptions;
use crate::error::{Result, StatsError};
use crate::logging::LogConfig;

/// IQR fence multipliers for outlier detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutlierConfig {
    /// Multiplier for the mild fences (`q1 - k·iqr`, `q3 + k·iqr`).
    pub mild_multiplier: f64,
    /// Multiplier for the extreme fences.
    pub extreme_multiplier: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            mild_multiplier: 1.5,
            extreme_multiplier: 3.0,
        }
    }
}

impl OutlierConfig {
    /// Sets both fence multipliers.
    pub fn with_multipliers(mut self, mild: f64, extreme: f64) -> Self {
        self.mild_multiplier = mild;
        self.extreme_multiplier = extreme;
        self
    }

    fn validate(&self) -> Result<()> {
        require_non_negative(self.mild_multiplier, "outliers.mildMultiplier")?;
        require_non_negative(self.extreme_multiplier, "outliers.extremeMultiplier")?;
        if self.extreme_multiplier < self.mild_multiplier {
            return Err(StatsError::configuration(format!(
                "outliers.extremeMultiplier ({}) must not be below outliers.mildMultiplier ({})",
                self.extreme_multiplier, self.mild_multiplier
            )));
        }
        Ok(())
    }
}

/// Ranking and impact thresholds for variance analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VarianceConfig {
    /// Number of top contributors reported as significant factors.
    pub top_factors: usize,
    /// Contribution percentage above which impact is high.
    pub high_impact_pct: f64,
    /// Contribution percentage above which impact is medium.
    pub medium_impact_pct: f64,
}

impl Default for VarianceConfig {
    fn default() -> Self {
        Self {
            top_factors: 5,
            high_impact_pct: 20.0,
            medium_impact_pct: 10.0,
        }
    }
}

impl VarianceConfig {
    /// Sets the number of significant factors to report.
    pub fn with_top_factors(mut self, top_factors: usize) -> Self {
        self.top_factors = top_factors;
        self
    }

    fn validate(&self) -> Result<()> {
        require_non_negative(self.high_impact_pct, "variance.highImpactPct")?;
        require_non_negative(self.medium_impact_pct, "variance.mediumImpactPct")?;
        if self.high_impact_pct < self.medium_impact_pct {
            return Err(StatsError::configuration(
                "variance.highImpactPct must not be below variance.mediumImpactPct",
            ));
        }
        Ok(())
    }
}

/// Classification and projection settings for trend analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrendConfig {
    /// Slopes within `±stable_slope` are classified as stable.
    pub stable_slope: f64,
    /// |r| above this is a strong trend.
    pub strong_correlation: f64,
    /// |r| above this is a moderate trend.
    pub moderate_correlation: f64,
    /// Number of periods projected beyond the largest x.
    pub projection_periods: usize,
    /// Normal quantile used for projection confidence intervals.
    pub confidence_z: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            stable_slope: 0.01,
            strong_correlation: 0.7,
            moderate_correlation: 0.3,
            projection_periods: 3,
            confidence_z: 1.96,
        }
    }
}

impl TrendConfig {
    /// Sets the number of projected periods.
    pub fn with_projection_periods(mut self, periods: usize) -> Self {
        self.projection_periods = periods;
        self
    }

    fn validate(&self) -> Result<()> {
        require_non_negative(self.stable_slope, "trend.stableSlope")?;
        require_non_negative(self.confidence_z, "trend.confidenceZ")?;
        require_unit(self.strong_correlation, "trend.strongCorrelation")?;
        require_unit(self.moderate_correlation, "trend.moderateCorrelation")?;
        if self.strong_correlation < self.moderate_correlation {
            return Err(StatsError::configuration(
                "trend.strongCorrelation must not be below trend.moderateCorrelation",
            ));
        }
        Ok(())
    }
}

/// Settings for the time-series utilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmoothingConfig {
    /// |autocorrelation| above this marks a series as seasonal.
    pub seasonality_threshold: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            seasonality_threshold: 0.3,
        }
    }
}

/// Top-level configuration consumed by [`crate::engine::StatsEngine`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub outliers: OutlierConfig,
    pub quality: QualityOptions,
    pub variance: VarianceConfig,
    pub trend: TrendConfig,
    pub smoothing: SmoothingConfig,
    pub logging: LogConfig,
}

impl EngineConfig {
    /// Parses a (possibly partial) JSON configuration and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every threshold is finite and internally consistent.
    pub fn validate(&self) -> Result<()> {
        self.outliers.validate()?;
        self.quality.validate()?;
        self.variance.validate()?;
        self.trend.validate()?;
        require_unit(
            self.smoothing.seasonality_threshold,
            "smoothing.seasonalityThreshold",
        )?;
        Ok(())
    }

    /// Replaces the outlier settings.
    pub fn with_outliers(mut self, outliers: OutlierConfig) -> Self {
        self.outliers = outliers;
        self
    }

    /// Replaces the default quality options.
    pub fn with_quality(mut self, quality: QualityOptions) -> Self {
        self.quality = quality;
        self
    }

    /// Replaces the variance settings.
    pub fn with_variance(mut self, variance: VarianceConfig) -> Self {
        self.variance = variance;
        self
    }

    /// Replaces the trend settings.
    pub fn with_trend(mut self, trend: TrendConfig) -> Self {
        self.trend = trend;
        self
    }

    /// Replaces the smoothing settings.
    pub fn with_smoothing(mut self, smoothing: SmoothingConfig) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Replaces the logging settings.
    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }
}

pub(crate) fn require_non_negative(value: f64, name: &str) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(StatsError::configuration(format!(
            "{name} must be finite and non-negative, got: {value}"
        )));
    }
    Ok(())
}

pub(crate) fn require_unit(value: f64, name: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(StatsError::configuration(format!(
            "{name} must be within [0, 1], got: {value}"
        )));
    }
    Ok(())
}
