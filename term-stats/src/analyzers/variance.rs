//! Variance decomposition over labeled values.
//!
//! Each item contributes `(value - mean)²` to the spread of the whole set. The
//! contribution percentages are normalized by the sum of those squared
//! deviations, so across all items they add up to 100 whenever the set has
//! any spread at all.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::analyzers::summary::{mean, sample_variance};
use crate::analyzers::{Analyzer, LabeledValue};
use crate::config::VarianceConfig;
use crate::error::{ensure_finite, Result};

/// How strongly a factor drives the total variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// One item's share of the total variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub label: String,
    pub value: f64,
    /// Squared deviation from the mean.
    pub variance: f64,
    pub contribution_pct: f64,
}

/// A top contributor with its impact classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificantFactor {
    pub label: String,
    pub impact: Impact,
    pub variance: f64,
    pub contribution_pct: f64,
}

/// Result of a variance decomposition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceAnalysis {
    /// Sample variance of all values.
    pub total_variance: f64,
    /// Sample variance of the strictly positive values.
    pub positive_variance: f64,
    /// Sample variance of the strictly negative values.
    pub negative_variance: f64,
    /// One entry per input item, in input order.
    pub contributions: Vec<Contribution>,
    /// Largest contributors, in descending order of contribution.
    pub significant_factors: Vec<SignificantFactor>,
}

/// Decomposes the variance of a labeled set into per-item contributions.
///
/// # Example
///
/// ```rust
/// use term_stats::analyzers::{Analyzer, Impact, LabeledValue, VarianceAnalyzer};
///
/// let items = vec![
///     LabeledValue::new("rent", 1200.0),
///     LabeledValue::new("food", 400.0),
///     LabeledValue::new("travel", 350.0),
/// ];
/// let analysis = VarianceAnalyzer::new().analyze(&items).unwrap();
///
/// assert_eq!(analysis.significant_factors[0].label, "rent");
/// assert_eq!(analysis.significant_factors[0].impact, Impact::High);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VarianceAnalyzer {
    config: VarianceConfig,
}

impl VarianceAnalyzer {
    /// Creates an analyzer reporting the top five factors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an analyzer with custom ranking thresholds.
    pub fn with_config(config: VarianceConfig) -> Self {
        Self { config }
    }

    fn impact(&self, contribution_pct: f64) -> Impact {
        if contribution_pct > self.config.high_impact_pct {
            Impact::High
        } else if contribution_pct > self.config.medium_impact_pct {
            Impact::Medium
        } else {
            Impact::Low
        }
    }
}

impl Analyzer for VarianceAnalyzer {
    type Input = [LabeledValue];
    type Output = VarianceAnalysis;

    #[instrument(skip_all, fields(analyzer = "variance", len = input.len()))]
    fn analyze(&self, input: &[LabeledValue]) -> Result<VarianceAnalysis> {
        ensure_finite(input.iter().map(|item| item.value), "labeled value")?;

        let values: Vec<f64> = input.iter().map(|item| item.value).collect();
        let center = mean(&values);
        let total_variance = sample_variance(&values, center);

        let subset_variance = |keep: fn(f64) -> bool| {
            let subset: Vec<f64> = values.iter().copied().filter(|v| keep(*v)).collect();
            sample_variance(&subset, mean(&subset))
        };
        let positive_variance = subset_variance(|v| v > 0.0);
        let negative_variance = subset_variance(|v| v < 0.0);

        let deviations: Vec<f64> = values.iter().map(|v| (v - center).powi(2)).collect();
        let total_deviation = deviations.iter().fold(0.0, |acc, d| acc + d);

        let contributions: Vec<Contribution> = input
            .iter()
            .zip(&deviations)
            .map(|(item, &variance)| Contribution {
                label: item.label.clone(),
                value: item.value,
                variance,
                contribution_pct: if total_deviation > 0.0 {
                    variance / total_deviation * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        let mut ranked: Vec<&Contribution> = contributions.iter().collect();
        // Stable sort keeps input order among equal contributions.
        ranked.sort_by(|a, b| b.contribution_pct.total_cmp(&a.contribution_pct));
        let significant_factors = ranked
            .into_iter()
            .take(self.config.top_factors)
            .map(|c| SignificantFactor {
                label: c.label.clone(),
                impact: self.impact(c.contribution_pct),
                variance: c.variance,
                contribution_pct: c.contribution_pct,
            })
            .collect();

        debug!(
            total_variance,
            positive_variance, negative_variance, "Decomposed variance"
        );

        Ok(VarianceAnalysis {
            total_variance,
            positive_variance,
            negative_variance,
            contributions,
            significant_factors,
        })
    }

    fn name(&self) -> &str {
        "variance"
    }

    fn description(&self) -> &str {
        "Attributes variance to individual labeled values and ranks the largest"
    }
}
