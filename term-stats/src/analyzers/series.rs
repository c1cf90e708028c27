//! Input containers shared by the analyzers.

use serde::{Deserialize, Serialize};

/// An ordered numeric sample series with optional parallel labels.
///
/// Entries may be missing (`None`) or NaN; both are treated as invalid and
/// dropped before analysis. Infinite values are dropped as well, since they
/// poison every moment-based statistic.
///
/// # Examples
///
/// ```rust
/// use term_stats::analyzers::Series;
///
/// let series = Series::from(vec![Some(1.0), None, Some(f64::NAN), Some(4.0)]);
/// assert_eq!(series.len(), 4);
/// assert_eq!(series.valid_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    values: Vec<Option<f64>>,
    labels: Option<Vec<String>>,
}

impl Series {
    /// Creates a series from raw, possibly missing values.
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self {
            values,
            labels: None,
        }
    }

    /// Attaches labels parallel to the values.
    ///
    /// Labels are matched by position; values without a label at their
    /// position simply carry none.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Total number of entries, valid or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the series has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw entries in input order.
    pub fn raw(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Label at an original position, if labels were attached.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(index))
            .map(String::as_str)
    }

    /// Iterates over `(original_index, value)` for every valid entry.
    pub fn valid_values(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| match value {
                Some(v) if v.is_finite() => Some((index, *v)),
                _ => None,
            })
    }

    /// Number of valid entries.
    pub fn valid_count(&self) -> usize {
        self.valid_values().count()
    }

    /// Valid values sorted ascending.
    pub fn sorted_valid(&self) -> Vec<f64> {
        let mut sorted: Vec<f64> = self.valid_values().map(|(_, v)| v).collect();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}

impl From<Vec<Option<f64>>> for Series {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self::new(values)
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        values.into_iter().collect()
    }
}

impl From<&[f64]> for Series {
    fn from(values: &[f64]) -> Self {
        values.iter().copied().collect()
    }
}

impl From<&[Option<f64>]> for Series {
    fn from(values: &[Option<f64>]) -> Self {
        Self::new(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Series {
    fn from(values: [f64; N]) -> Self {
        values.into_iter().collect()
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Some).collect())
    }
}

impl FromIterator<Option<f64>> for Series {
    fn from_iter<T: IntoIterator<Item = Option<f64>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A `{label, value}` pair used by variance and trend analysis.
///
/// Labels need not be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    /// Display label for the value.
    pub label: String,
    /// The observed value.
    pub value: f64,
}

impl LabeledValue {
    /// Creates a new labeled value.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl<S: Into<String>> From<(S, f64)> for LabeledValue {
    fn from((label, value): (S, f64)) -> Self {
        Self::new(label, value)
    }
}

/// An `(x, y)` observation for trend fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Independent variable.
    pub x: f64,
    /// Dependent variable.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
