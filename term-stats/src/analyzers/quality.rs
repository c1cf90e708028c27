//! Data-quality assessment for heterogeneous item collections.
//!
//! Items arrive as arbitrary JSON values. A single classification pass tags
//! each item with an [`ItemKind`] (and its numeric value, when it has one)
//! before any metric is computed; the metrics then read the tags instead of
//! re-inspecting raw values.
//!
//! Scores are percentages in `[0, 100]`:
//!
//! - **completeness**: share of non-null items
//! - **validity**: share of items whose kind is in the allowed set
//! - **accuracy**: share of numeric items inside the expected range, or of
//!   non-null items when no range is configured
//! - **consistency**: `100 - 100·CoV` over the numeric subset, clipped at 0

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::analyzers::outliers::{OutlierAnalysis, OutlierDetector};
use crate::analyzers::summary::StatisticalSummary;
use crate::analyzers::{Analyzer, Series};
use crate::config::{require_unit, OutlierConfig};
use crate::error::{Result, StatsError};

/// Validity score below which a type recommendation is emitted.
const MIN_VALIDITY_PCT: f64 = 95.0;
/// Accuracy score below which a range recommendation is emitted.
const MIN_ACCURACY_PCT: f64 = 90.0;
/// Outlier share above which an outlier recommendation is emitted.
const MAX_OUTLIER_PCT: f64 = 5.0;

/// The runtime kind of an input item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Null,
    Number,
    String,
    Boolean,
    Array,
    Object,
}

impl ItemKind {
    /// Determines the kind of a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Bool(_) => Self::Boolean,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

/// An item after the classification pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedItem {
    Null,
    Number(f64),
    Other(ItemKind),
}

impl ClassifiedItem {
    /// Classifies a JSON value.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Number(n) => match n.as_f64() {
                Some(v) if v.is_finite() => Self::Number(v),
                _ => Self::Other(ItemKind::Number),
            },
            other => Self::Other(ItemKind::of(other)),
        }
    }

    /// The item's kind.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Null => ItemKind::Null,
            Self::Number(_) => ItemKind::Number,
            Self::Other(kind) => *kind,
        }
    }

    /// The numeric value, if the item is a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Inclusive range of values considered accurate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Creates a new inclusive range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Options controlling a quality assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityOptions {
    /// Range that numeric items must fall within to count as accurate.
    pub expected_range: Option<ValueRange>,
    /// Item kinds counted as valid.
    pub allowed_types: Vec<ItemKind>,
    /// Acceptable fraction of null items.
    pub null_tolerance: f64,
    /// Acceptable fraction of duplicate items.
    pub duplicate_tolerance: f64,
}

impl Default for QualityOptions {
    fn default() -> Self {
        Self {
            expected_range: None,
            allowed_types: vec![ItemKind::Number],
            null_tolerance: 0.05,
            duplicate_tolerance: 0.10,
        }
    }
}

impl QualityOptions {
    /// Sets the expected value range.
    pub fn with_expected_range(mut self, min: f64, max: f64) -> Self {
        self.expected_range = Some(ValueRange::new(min, max));
        self
    }

    /// Sets the allowed item kinds.
    pub fn with_allowed_types(mut self, kinds: impl IntoIterator<Item = ItemKind>) -> Self {
        self.allowed_types = kinds.into_iter().collect();
        self
    }

    /// Sets the null tolerance as a fraction.
    pub fn with_null_tolerance(mut self, tolerance: f64) -> Self {
        self.null_tolerance = tolerance;
        self
    }

    /// Sets the duplicate tolerance as a fraction.
    pub fn with_duplicate_tolerance(mut self, tolerance: f64) -> Self {
        self.duplicate_tolerance = tolerance;
        self
    }

    /// Checks tolerances and range bounds.
    pub fn validate(&self) -> Result<()> {
        require_unit(self.null_tolerance, "quality.nullTolerance")?;
        require_unit(self.duplicate_tolerance, "quality.duplicateTolerance")?;
        if let Some(range) = self.expected_range {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(StatsError::configuration(format!(
                    "quality.expectedRange must be finite with min <= max, got [{}, {}]",
                    range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

/// Raw counts behind the quality scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCounts {
    pub total: usize,
    pub null: usize,
    pub numeric: usize,
    pub valid_type: usize,
    pub accurate: usize,
}

/// Result of a quality assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub completeness: f64,
    pub consistency: f64,
    pub accuracy: f64,
    pub validity: f64,
    /// Mean of the four scores.
    pub overall_score: f64,
    /// Items that structurally equal an earlier item.
    pub duplicate_count: usize,
    pub counts: ItemCounts,
    /// Outlier analysis over the numeric subset.
    pub anomalies: OutlierAnalysis,
    /// Ordered, human-readable remediation hints.
    pub recommendations: Vec<String>,
}

impl QualityAssessment {
    /// Returns true if no recommendation was raised.
    pub fn is_clean(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// Scores completeness, validity, accuracy and consistency of a dataset.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use term_stats::analyzers::{Analyzer, QualityAssessor, QualityOptions};
///
/// let items = vec![json!(1), json!(null), json!("n/a"), json!(4)];
/// let assessment = QualityAssessor::new(QualityOptions::default())
///     .analyze(&items)
///     .unwrap();
///
/// assert_eq!(assessment.completeness, 75.0);
/// assert_eq!(assessment.validity, 50.0);
/// assert!(!assessment.recommendations.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct QualityAssessor {
    options: QualityOptions,
    outliers: OutlierConfig,
}

impl QualityAssessor {
    /// Creates an assessor with the given options and standard outlier fences.
    pub fn new(options: QualityOptions) -> Self {
        Self {
            options,
            outliers: OutlierConfig::default(),
        }
    }

    /// Uses custom fences for the embedded outlier detection.
    pub fn with_outlier_config(mut self, outliers: OutlierConfig) -> Self {
        self.outliers = outliers;
        self
    }

    /// Returns the assessment options.
    pub fn options(&self) -> &QualityOptions {
        &self.options
    }

    /// Assesses a dataset; never fails for valid options.
    pub fn assess(&self, items: &[Value]) -> QualityAssessment {
        let classified: Vec<ClassifiedItem> = items.iter().map(ClassifiedItem::classify).collect();
        let counts = self.count(&classified);
        let duplicate_count = count_duplicates(items);

        let numbers: Series = classified.iter().filter_map(ClassifiedItem::as_number).collect();
        let anomalies = OutlierDetector::with_config(self.outliers.clone()).detect(&numbers);

        if counts.total == 0 {
            debug!("Quality assessment on empty dataset");
            return QualityAssessment {
                completeness: 0.0,
                consistency: 100.0,
                accuracy: 0.0,
                validity: 0.0,
                overall_score: 25.0,
                duplicate_count: 0,
                counts,
                anomalies,
                recommendations: vec![
                    "Dataset contains 0 items; provide data before assessing quality".to_string(),
                ],
            };
        }

        let total = counts.total as f64;
        let completeness = (counts.total - counts.null) as f64 / total * 100.0;
        let validity = counts.valid_type as f64 / total * 100.0;
        let accuracy = counts.accurate as f64 / total * 100.0;
        let consistency = consistency_score(&numbers);

        debug!(
            completeness,
            validity,
            accuracy,
            consistency,
            duplicates = duplicate_count,
            "Computed quality scores"
        );

        let mut assessment = QualityAssessment {
            completeness,
            consistency,
            accuracy,
            validity,
            overall_score: (completeness + consistency + accuracy + validity) / 4.0,
            duplicate_count,
            counts,
            anomalies,
            recommendations: Vec::new(),
        };
        assessment.recommendations = self.recommend(&assessment);
        assessment
    }

    fn count(&self, classified: &[ClassifiedItem]) -> ItemCounts {
        classified.iter().fold(
            ItemCounts {
                total: classified.len(),
                ..ItemCounts::default()
            },
            |mut counts, item| {
                let kind = item.kind();
                if kind == ItemKind::Null {
                    counts.null += 1;
                }
                if item.as_number().is_some() {
                    counts.numeric += 1;
                }
                if self.options.allowed_types.contains(&kind) {
                    counts.valid_type += 1;
                }
                let accurate = match self.options.expected_range {
                    Some(range) => item.as_number().is_some_and(|v| range.contains(v)),
                    None => kind != ItemKind::Null,
                };
                if accurate {
                    counts.accurate += 1;
                }
                counts
            },
        )
    }

    fn recommend(&self, assessment: &QualityAssessment) -> Vec<String> {
        let counts = &assessment.counts;
        let mut recommendations = Vec::new();

        let min_completeness = (1.0 - self.options.null_tolerance) * 100.0;
        if assessment.completeness < min_completeness {
            recommendations.push(format!(
                "Found {} null values ({:.1}% complete, target {:.1}%); impute or remove missing entries",
                counts.null, assessment.completeness, min_completeness
            ));
        }

        if assessment.validity < MIN_VALIDITY_PCT {
            recommendations.push(format!(
                "Found {} values with unexpected types ({:.1}% valid); enforce type validation at ingestion",
                counts.total - counts.valid_type,
                assessment.validity
            ));
        }

        if let Some(range) = self.options.expected_range {
            if assessment.accuracy < MIN_ACCURACY_PCT {
                let out_of_range = counts.numeric - counts.accurate;
                let non_numeric = counts.total - counts.null - counts.numeric;
                let mut message = format!(
                    "Found {out_of_range} values outside the expected range [{}, {}]",
                    range.min, range.max
                );
                if non_numeric > 0 {
                    message.push_str(&format!(" and {non_numeric} non-numeric values"));
                }
                message.push_str(&format!(
                    " ({:.1}% accurate); review collection or range bounds",
                    assessment.accuracy
                ));
                recommendations.push(message);
            }
        }

        if assessment.duplicate_count as f64 > self.options.duplicate_tolerance * counts.total as f64 {
            recommendations.push(format!(
                "Found {} duplicate values; deduplicate the dataset or verify the source",
                assessment.duplicate_count
            ));
        }

        let outliers = &assessment.anomalies.summary;
        if outliers.percentage > MAX_OUTLIER_PCT {
            recommendations.push(format!(
                "Found {} outliers ({:.1}% of numeric values, {} extreme); investigate them before analysis",
                outliers.total, outliers.percentage, outliers.extreme
            ));
        }

        recommendations
    }
}

impl Analyzer for QualityAssessor {
    type Input = [Value];
    type Output = QualityAssessment;

    #[instrument(skip_all, fields(analyzer = "quality", len = input.len()))]
    fn analyze(&self, input: &[Value]) -> Result<QualityAssessment> {
        self.options.validate()?;
        Ok(self.assess(input))
    }

    fn name(&self) -> &str {
        "quality"
    }

    fn description(&self) -> &str {
        "Scores completeness, validity, accuracy and consistency of a dataset"
    }
}

/// `100 - 100·CoV` over the numeric subset, clipped to `[0, 100]`.
fn consistency_score(numbers: &Series) -> f64 {
    let Ok(summary) = StatisticalSummary::from_sorted(&numbers.sorted_valid()) else {
        return 100.0;
    };
    let cv = match summary.coefficient_of_variation() {
        Some(cv) => cv,
        None if summary.standard_deviation == 0.0 => 0.0,
        // Spread around a zero mean has no meaningful relative scale.
        None => return 0.0,
    };
    (100.0 - cv * 100.0).clamp(0.0, 100.0)
}

/// Counts items structurally equal to an earlier item.
fn count_duplicates(items: &[Value]) -> usize {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| {
            let mut key = String::new();
            canonical_key(item, &mut key);
            !seen.insert(key)
        })
        .count()
}

/// Serializes a value with sorted object keys and normalized numbers.
fn canonical_key(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => match n.as_f64() {
            Some(v) => out.push_str(&v.to_string()),
            None => out.push_str(&n.to_string()),
        },
        Value::String(s) => out.push_str(&format!("{s:?}")),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                canonical_key(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&format!("{key:?}:"));
                canonical_key(item, out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;
    use serde_json::json;

    fn assess(items: Vec<Value>, options: QualityOptions) -> QualityAssessment {
        QualityAssessor::new(options).analyze(&items).unwrap()
    }

    #[test]
    fn test_clean_numeric_dataset() {
        let items = vec![json!(10), json!(11), json!(12), json!(13), json!(14)];
        let assessment = assess(items, QualityOptions::default());

        assert_eq!(assessment.completeness, 100.0);
        assert_eq!(assessment.validity, 100.0);
        assert_eq!(assessment.accuracy, 100.0);
        assert_eq!(assessment.duplicate_count, 0);

        // CoV = sqrt(2.5) / 12
        let expected = 100.0 - (2.5f64).sqrt() / 12.0 * 100.0;
        assert!((assessment.consistency - expected).abs() < 1e-9);
        assert!(assessment.is_clean());
    }

    #[test]
    fn test_mixed_dataset_recommendations_in_order() {
        let items = vec![json!(1), json!(null), json!("a"), json!(1), json!(2)];
        let assessment = assess(items, QualityOptions::default());

        assert_eq!(assessment.completeness, 80.0);
        assert_eq!(assessment.validity, 60.0);
        assert_eq!(assessment.accuracy, 80.0);
        assert_eq!(assessment.duplicate_count, 1);
        assert_eq!(assessment.counts.numeric, 3);

        let recs = &assessment.recommendations;
        assert_eq!(recs.len(), 3);
        assert!(recs[0].starts_with("Found 1 null values"));
        assert!(recs[1].starts_with("Found 2 values with unexpected types"));
        assert!(recs[2].starts_with("Found 1 duplicate values"));
    }

    #[test]
    fn test_expected_range_accuracy() {
        let items = vec![json!(1), json!(5), json!(20), json!(null)];
        let options = QualityOptions::default().with_expected_range(0.0, 10.0);
        let assessment = assess(items, options);

        assert_eq!(assessment.accuracy, 50.0);
        assert_eq!(assessment.counts.accurate, 2);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.starts_with("Found 1 values outside the expected range [0, 10]")));
    }

    #[test]
    fn test_mixed_quality_fixture() {
        let items = test_fixtures::mixed_quality_items();
        let options = QualityOptions::default().with_expected_range(0.0, 100.0);
        let assessment = assess(items.clone(), options);

        assert_eq!(
            assessment.counts,
            ItemCounts {
                total: 20,
                null: 2,
                numeric: 16,
                valid_type: 16,
                accurate: 15,
            }
        );
        assert_eq!(assessment.completeness, 90.0);
        assert_eq!(assessment.validity, 80.0);
        assert_eq!(assessment.accuracy, 75.0);
        assert_eq!(assessment.duplicate_count, 2);
        assert_eq!(assessment.anomalies.outliers.len(), 1);
        assert_eq!(assessment.anomalies.outliers[0].value, 900.0);

        // Two duplicates out of twenty sit exactly at the 10% tolerance.
        let recs = &assessment.recommendations;
        assert_eq!(recs.len(), 4);
        assert!(recs[0].starts_with("Found 2 null values"));
        assert!(recs[1].starts_with("Found 4 values with unexpected types"));
        assert!(recs[2].starts_with(
            "Found 1 values outside the expected range [0, 100] and 2 non-numeric values"
        ));
        assert!(recs[3].starts_with("Found 1 outliers"));
        assert!(!recs.iter().any(|r| r.contains("duplicate")));

        let strings = QualityOptions::default().with_allowed_types([ItemKind::String]);
        assert_eq!(assess(items, strings).validity, 5.0);
    }

    #[test]
    fn test_range_recommendation_separates_non_numeric_items() {
        let items = vec![json!(1), json!(2), json!("x"), json!(true), json!(false), json!(500)];
        let options = QualityOptions::default()
            .with_expected_range(0.0, 10.0)
            .with_allowed_types([ItemKind::Number, ItemKind::String, ItemKind::Boolean]);
        let assessment = assess(items, options);

        let rec = assessment
            .recommendations
            .iter()
            .find(|r| r.contains("expected range"))
            .unwrap();
        assert!(rec.starts_with(
            "Found 1 values outside the expected range [0, 10] and 3 non-numeric values"
        ));
    }

    #[test]
    fn test_no_range_means_non_null_is_accurate() {
        let items = vec![json!("x"), json!(true), json!(null), json!(3)];
        let assessment = assess(items, QualityOptions::default());
        assert_eq!(assessment.accuracy, 75.0);
        assert!(!assessment
            .recommendations
            .iter()
            .any(|r| r.contains("expected range")));
    }

    #[test]
    fn test_allowed_types() {
        let items = vec![json!("a"), json!("b"), json!(1)];
        let options =
            QualityOptions::default().with_allowed_types([ItemKind::String, ItemKind::Number]);
        let assessment = assess(items, options);
        assert_eq!(assessment.validity, 100.0);
    }

    #[test]
    fn test_structural_duplicates() {
        let items = vec![
            json!({"a": 1, "b": [1, 2]}),
            json!({"b": [1, 2], "a": 1}),
            json!(1),
            json!(1.0),
            json!("1"),
        ];
        let options = QualityOptions::default().with_allowed_types([
            ItemKind::Object,
            ItemKind::Number,
            ItemKind::String,
        ]);
        let assessment = assess(items, options);
        assert_eq!(assessment.duplicate_count, 2);

        let items = vec![
            json!(true),
            json!("true"),
            json!(true),
            json!(false),
            json!(["a", {"k": "a"}]),
            json!(["a", {"k": "a"}]),
            json!(null),
            json!(null),
        ];
        assert_eq!(count_duplicates(&items), 3);
    }

    #[test]
    fn test_consistency_is_clipped_at_zero() {
        let items = vec![json!(1), json!(1000), json!(-990)];
        let assessment = assess(items, QualityOptions::default());
        assert_eq!(assessment.consistency, 0.0);
    }

    #[test]
    fn test_no_numeric_items_is_fully_consistent() {
        let items = vec![json!("a"), json!("b")];
        let assessment = assess(items, QualityOptions::default());
        assert_eq!(assessment.consistency, 100.0);
        assert!(assessment.anomalies.outliers.is_empty());
        assert!(assessment.anomalies.bounds.is_none());
    }

    #[test]
    fn test_outlier_recommendation() {
        let mut items: Vec<Value> = (1..=9).map(|v| json!(v)).collect();
        items.push(json!(100));
        let assessment = assess(items, QualityOptions::default());

        assert_eq!(assessment.anomalies.summary.total, 1);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.starts_with("Found 1 outliers (10.0% of numeric values, 1 extreme)")));
    }

    #[test]
    fn test_empty_dataset() {
        let assessment = assess(Vec::new(), QualityOptions::default());
        assert_eq!(assessment.completeness, 0.0);
        assert_eq!(assessment.counts.total, 0);
        assert_eq!(assessment.recommendations.len(), 1);
        assert!(assessment.recommendations[0].contains("0 items"));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = QualityOptions::default().with_null_tolerance(1.5);
        let err = QualityAssessor::new(options).analyze(&[json!(1)]).unwrap_err();
        assert!(matches!(err, StatsError::Configuration(_)));

        let options = QualityOptions::default().with_expected_range(10.0, 0.0);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_classification() {
        assert_eq!(ClassifiedItem::classify(&json!(2.5)), ClassifiedItem::Number(2.5));
        assert_eq!(ClassifiedItem::classify(&json!(null)), ClassifiedItem::Null);
        assert_eq!(
            ClassifiedItem::classify(&json!([1])).kind(),
            ItemKind::Array
        );
        assert_eq!(ItemKind::of(&json!(false)), ItemKind::Boolean);
    }
}
