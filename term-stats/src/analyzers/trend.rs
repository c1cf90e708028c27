//! Least-squares trend analysis with short-range projections.
//!
//! The fitted line is the ordinary least-squares regression of y on x. The
//! reported correlation is `Sxy / (√Sxx · s_y · √(n - 1))` where `s_y` is the
//! sample standard deviation of y. Because `s_y · √(n - 1) = √Syy`, this is
//! exactly Pearson's r; degenerate inputs (no spread in x or y) report 0.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::analyzers::{Analyzer, LabeledValue, Point};
use crate::config::TrendConfig;
use crate::error::{ensure_finite, Result, StatsError};

/// Direction of the fitted slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Strength of the linear relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// A projected value beyond the observed range of x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub period: f64,
    pub value: f64,
    pub confidence_interval: ConfidenceInterval,
}

/// Result of a trend analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub slope: f64,
    pub intercept: f64,
    pub correlation: f64,
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    /// `|correlation| · 100`.
    pub confidence_pct: f64,
    pub projections: Vec<Projection>,
}

impl TrendAnalysis {
    /// Evaluates the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Running sums over centered coordinates.
struct Moments {
    n: f64,
    x_mean: f64,
    y_mean: f64,
    x_max: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl Moments {
    fn from_points(points: &[Point]) -> Self {
        let n = points.len() as f64;
        let (x_sum, y_sum, x_max) = points.iter().fold(
            (0.0, 0.0, f64::NEG_INFINITY),
            |(xs, ys, xm), p| (xs + p.x, ys + p.y, xm.max(p.x)),
        );
        let x_mean = x_sum / n;
        let y_mean = y_sum / n;
        let (sxx, syy, sxy) = points.iter().fold((0.0, 0.0, 0.0), |(xx, yy, xy), p| {
            let dx = p.x - x_mean;
            let dy = p.y - y_mean;
            (xx + dx * dx, yy + dy * dy, xy + dx * dy)
        });
        Self {
            n,
            x_mean,
            y_mean,
            x_max,
            sxx,
            syy,
            sxy,
        }
    }

    fn slope(&self) -> f64 {
        if self.sxx == 0.0 {
            0.0
        } else {
            self.sxy / self.sxx
        }
    }

    fn y_std(&self) -> f64 {
        (self.syy / (self.n - 1.0)).sqrt()
    }

    fn correlation(&self) -> f64 {
        if self.sxx == 0.0 || self.syy == 0.0 {
            return 0.0;
        }
        let r = self.sxy / (self.sxx.sqrt() * self.y_std() * (self.n - 1.0).sqrt());
        r.clamp(-1.0, 1.0)
    }
}

/// Fits a least-squares line through `{x, y}` points and projects it forward.
///
/// # Example
///
/// ```rust
/// use term_stats::analyzers::{Analyzer, Point, TrendAnalyzer, TrendDirection};
///
/// let points: Vec<Point> = vec![(1.0, 2.0).into(), (2.0, 4.1).into(), (3.0, 5.9).into()];
/// let trend = TrendAnalyzer::new().analyze(&points).unwrap();
///
/// assert_eq!(trend.direction, TrendDirection::Increasing);
/// assert_eq!(trend.projections.len(), 3);
/// assert_eq!(trend.projections[0].period, 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    /// Creates an analyzer with the standard thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an analyzer with custom thresholds.
    pub fn with_config(config: TrendConfig) -> Self {
        Self { config }
    }

    /// Analyzes labeled values as a sequence, using each value's position as x.
    pub fn analyze_labeled(&self, values: &[LabeledValue]) -> Result<TrendAnalysis> {
        let points: Vec<Point> = values
            .iter()
            .enumerate()
            .map(|(i, item)| Point::new(i as f64, item.value))
            .collect();
        self.analyze(&points)
    }

    fn direction(&self, slope: f64) -> TrendDirection {
        if slope > self.config.stable_slope {
            TrendDirection::Increasing
        } else if slope < -self.config.stable_slope {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    fn strength(&self, correlation: f64) -> TrendStrength {
        let magnitude = correlation.abs();
        if magnitude > self.config.strong_correlation {
            TrendStrength::Strong
        } else if magnitude > self.config.moderate_correlation {
            TrendStrength::Moderate
        } else {
            TrendStrength::Weak
        }
    }

    fn project(&self, moments: &Moments, slope: f64) -> Vec<Projection> {
        let standard_error = moments.y_std() / moments.n.sqrt();
        let margin = self.config.confidence_z * standard_error;
        (1..=self.config.projection_periods)
            .map(|step| {
                let period = moments.x_max + step as f64;
                let value = moments.y_mean + slope * (period - moments.x_mean);
                Projection {
                    period,
                    value,
                    confidence_interval: ConfidenceInterval {
                        lower: value - margin,
                        upper: value + margin,
                    },
                }
            })
            .collect()
    }
}

impl Analyzer for TrendAnalyzer {
    type Input = [Point];
    type Output = TrendAnalysis;

    #[instrument(skip_all, fields(analyzer = "trend", len = input.len()))]
    fn analyze(&self, input: &[Point]) -> Result<TrendAnalysis> {
        if input.len() < 2 {
            return Err(StatsError::insufficient_data(2, input.len()));
        }
        ensure_finite(input.iter().map(|p| p.x), "x coordinate")?;
        ensure_finite(input.iter().map(|p| p.y), "y coordinate")?;

        let moments = Moments::from_points(input);
        let slope = moments.slope();
        let correlation = moments.correlation();

        debug!(slope, correlation, sxx = moments.sxx, "Fitted regression line");

        Ok(TrendAnalysis {
            slope,
            intercept: moments.y_mean - slope * moments.x_mean,
            correlation,
            direction: self.direction(slope),
            strength: self.strength(correlation),
            confidence_pct: correlation.abs() * 100.0,
            projections: self.project(&moments, slope),
        })
    }

    fn name(&self) -> &str {
        "trend"
    }

    fn description(&self) -> &str {
        "Fits a least-squares line and projects it beyond the observed range"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;

    fn points(pairs: &[(f64, f64)]) -> Vec<Point> {
        pairs.iter().map(|&p| Point::from(p)).collect()
    }

    #[test]
    fn test_perfect_linear_trend() {
        let trend = TrendAnalyzer::new()
            .analyze(&points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)]))
            .unwrap();

        assert_eq!(trend.slope, 2.0);
        assert_eq!(trend.intercept, 0.0);
        assert!((trend.correlation - 1.0).abs() < 1e-12);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.strength, TrendStrength::Strong);
        assert!((trend.confidence_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_projections_and_intervals() {
        let trend = TrendAnalyzer::new()
            .analyze(&points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)]))
            .unwrap();

        let periods: Vec<f64> = trend.projections.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![5.0, 6.0, 7.0]);
        assert_eq!(trend.projections[0].value, 10.0);
        assert_eq!(trend.projections[2].value, 14.0);

        // var(y) = 20 / 3, se = sqrt(var) / sqrt(4)
        let margin = 1.96 * (20.0f64 / 3.0).sqrt() / 2.0;
        let ci = trend.projections[0].confidence_interval;
        assert!((ci.lower - (10.0 - margin)).abs() < 1e-9);
        assert!((ci.upper - (10.0 + margin)).abs() < 1e-9);
    }

    #[test]
    fn test_noisy_monthly_revenue() {
        let trend = TrendAnalyzer::new()
            .analyze(&test_fixtures::revenue_points())
            .unwrap();

        assert!((trend.slope - 2.5).abs() < 0.05);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.strength, TrendStrength::Strong);
        assert!(trend.confidence_pct > 99.0);
        let periods: Vec<f64> = trend.projections.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![13.0, 14.0, 15.0]);
    }

    #[test]
    fn test_correlation_matches_pearson() {
        let data = points(&[(1.0, 3.0), (2.0, 1.0), (3.0, 4.0), (4.0, 1.5), (5.0, 5.0)]);
        let trend = TrendAnalyzer::new().analyze(&data).unwrap();

        let n = data.len() as f64;
        let mx = data.iter().map(|p| p.x).sum::<f64>() / n;
        let my = data.iter().map(|p| p.y).sum::<f64>() / n;
        let sxy: f64 = data.iter().map(|p| (p.x - mx) * (p.y - my)).sum();
        let sxx: f64 = data.iter().map(|p| (p.x - mx).powi(2)).sum();
        let syy: f64 = data.iter().map(|p| (p.y - my).powi(2)).sum();
        let pearson = sxy / (sxx * syy).sqrt();

        assert!((trend.correlation - pearson).abs() < 1e-12);
        assert_eq!(trend.strength, TrendStrength::Moderate);
    }

    #[test]
    fn test_unsorted_points_give_same_fit() {
        let sorted = points(&[(1.0, 1.0), (2.0, 3.0), (3.0, 2.0), (4.0, 5.0)]);
        let shuffled = points(&[(3.0, 2.0), (1.0, 1.0), (4.0, 5.0), (2.0, 3.0)]);
        let a = TrendAnalyzer::new().analyze(&sorted).unwrap();
        let b = TrendAnalyzer::new().analyze(&shuffled).unwrap();
        assert!((a.slope - b.slope).abs() < 1e-12);
        assert!((a.correlation - b.correlation).abs() < 1e-12);
        assert_eq!(a.projections[0].period, b.projections[0].period);
    }

    #[test]
    fn test_flat_and_decreasing() {
        let flat = TrendAnalyzer::new()
            .analyze(&points(&[(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)]))
            .unwrap();
        assert_eq!(flat.slope, 0.0);
        assert_eq!(flat.correlation, 0.0);
        assert_eq!(flat.direction, TrendDirection::Stable);
        assert_eq!(flat.strength, TrendStrength::Weak);

        let falling = TrendAnalyzer::new()
            .analyze(&points(&[(0.0, 10.0), (1.0, 7.0), (2.0, 9.0), (3.0, 4.0)]))
            .unwrap();
        assert_eq!(falling.direction, TrendDirection::Decreasing);
        assert!(falling.correlation < 0.0);
    }

    #[test]
    fn test_vertical_points_have_zero_slope() {
        let trend = TrendAnalyzer::new()
            .analyze(&points(&[(2.0, 1.0), (2.0, 5.0), (2.0, 9.0)]))
            .unwrap();
        assert_eq!(trend.slope, 0.0);
        assert_eq!(trend.correlation, 0.0);
        assert_eq!(trend.projections[0].period, 3.0);
        assert_eq!(trend.projections[0].value, 5.0);
    }

    #[test]
    fn test_insufficient_data() {
        let err = TrendAnalyzer::new().analyze(&points(&[(1.0, 1.0)])).unwrap_err();
        assert_eq!(err, StatsError::insufficient_data(2, 1));
        assert!(TrendAnalyzer::new().analyze(&[]).is_err());
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let err = TrendAnalyzer::new()
            .analyze(&points(&[(1.0, 1.0), (f64::INFINITY, 2.0)]))
            .unwrap_err();
        assert!(matches!(err, StatsError::InvalidArgument(ref m) if m.contains("x coordinate")));
    }

    #[test]
    fn test_analyze_labeled_uses_positions() {
        let values = vec![
            LabeledValue::new("jan", 10.0),
            LabeledValue::new("feb", 20.0),
            LabeledValue::new("mar", 30.0),
        ];
        let trend = TrendAnalyzer::new().analyze_labeled(&values).unwrap();
        assert_eq!(trend.slope, 10.0);
        assert_eq!(trend.projections[0].period, 3.0);
        assert_eq!(trend.predict(3.0), 40.0);
    }

    #[test]
    fn test_projection_count_is_configurable() {
        let analyzer = TrendAnalyzer::with_config(TrendConfig::default().with_projection_periods(0));
        let trend = analyzer
            .analyze(&points(&[(0.0, 1.0), (1.0, 2.0)]))
            .unwrap();
        assert!(trend.projections.is_empty());
    }
}
