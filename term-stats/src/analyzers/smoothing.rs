//! Time-series smoothing and seasonality checks.
//!
//! These operate on ordered series, so unlike the summary analyzers they do
//! not drop invalid entries: a non-finite value would shift every later
//! position and is rejected instead.

use tracing::{debug, instrument};

use crate::analyzers::summary::mean;
use crate::error::{ensure_finite, Result, StatsError};

/// Default |autocorrelation| above which a series is considered seasonal.
pub const DEFAULT_SEASONALITY_THRESHOLD: f64 = 0.3;

/// Simple moving average over a sliding window.
///
/// The output has `series.len() - window + 1` entries. Fails with
/// [`StatsError::InvalidWindow`] when `window` is zero or longer than the
/// series.
///
/// ```rust
/// use term_stats::analyzers::smoothing::moving_average;
///
/// assert_eq!(moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap(), vec![2.0, 3.0, 4.0]);
/// assert!(moving_average(&[1.0, 2.0], 3).is_err());
/// ```
#[instrument(skip(series), fields(len = series.len()))]
pub fn moving_average(series: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 || window > series.len() {
        return Err(StatsError::InvalidWindow {
            window,
            len: series.len(),
        });
    }
    ensure_finite(series.iter().copied(), "series value")?;

    Ok(series.windows(window).map(mean).collect())
}

/// Exponentially weighted smoothing.
///
/// `smoothed[0] = series[0]` and
/// `smoothed[i] = alpha·series[i] + (1 - alpha)·smoothed[i - 1]`.
/// Fails with [`StatsError::InvalidAlpha`] unless `alpha` is within `[0, 1]`.
#[instrument(skip(series), fields(len = series.len()))]
pub fn exponential_smoothing(series: &[f64], alpha: f64) -> Result<Vec<f64>> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(StatsError::InvalidAlpha(alpha));
    }
    ensure_finite(series.iter().copied(), "series value")?;

    let mut smoothed = Vec::with_capacity(series.len());
    let mut previous = None;
    for &value in series {
        let next = match previous {
            None => value,
            Some(prev) => alpha * value + (1.0 - alpha) * prev,
        };
        smoothed.push(next);
        previous = Some(next);
    }
    Ok(smoothed)
}

/// Autocorrelation of a series with itself shifted by `lag`.
///
/// Computed as `Σ(x[i] - m)(x[i + lag] - m) / Σ(x[i] - m)²` where `m` is the
/// mean of the whole series. Returns `None` when the series is not longer
/// than `lag`, has no spread, or contains non-finite values.
pub fn autocorrelation(series: &[f64], lag: usize) -> Option<f64> {
    if series.len() <= lag || series.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let m = mean(series);
    let denominator = series.iter().fold(0.0, |acc, v| acc + (v - m).powi(2));
    if denominator == 0.0 {
        return None;
    }
    let numerator = series
        .iter()
        .zip(&series[lag..])
        .fold(0.0, |acc, (a, b)| acc + (a - m) * (b - m));
    Some(numerator / denominator)
}

/// Reports whether a series repeats with the given period.
///
/// Uses [`DEFAULT_SEASONALITY_THRESHOLD`]. See
/// [`detect_seasonality_with_threshold`].
pub fn detect_seasonality(series: &[f64], period: usize) -> bool {
    detect_seasonality_with_threshold(series, period, DEFAULT_SEASONALITY_THRESHOLD)
}

/// Reports whether `|autocorrelation(series, period)|` exceeds `threshold`.
///
/// Never fails: a zero period, a series shorter than two full periods, or a
/// series without spread all report `false`.
///
/// ```rust
/// use term_stats::analyzers::smoothing::detect_seasonality_with_threshold;
///
/// let cycle = [10.0, 15.0, 20.0, 5.0];
/// let series: Vec<f64> = cycle.iter().cycle().take(12).copied().collect();
/// assert!(detect_seasonality_with_threshold(&series, 4, 0.3));
/// assert!(!detect_seasonality_with_threshold(&series, 4, 0.9));
/// ```
pub fn detect_seasonality_with_threshold(series: &[f64], period: usize, threshold: f64) -> bool {
    if period == 0 || series.len() < period.saturating_mul(2) {
        debug!(len = series.len(), period, "Series too short for seasonality check");
        return false;
    }
    match autocorrelation(series, period) {
        Some(r) => {
            debug!(period, autocorrelation = r, threshold, "Computed autocorrelation");
            r.abs() > threshold
        }
        None => false,
    }
}
