//! Nearest-value lookup over arbitrary records.
//!
//! A [`SearchIndex`] owns a copy of the caller's records sorted by a numeric
//! key. The keys are extracted once at construction; queries are binary
//! searches over them. The index is never mutated after it is built, so a
//! shared reference can be queried from any number of threads.

use std::cmp::Ordering;

use tracing::debug;

/// An immutable, key-sorted copy of a record collection.
///
/// # Example
///
/// ```rust
/// use term_stats::analyzers::SearchIndex;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Sample { v: f64 }
///
/// let data = [Sample { v: 10.0 }, Sample { v: 30.0 }, Sample { v: 20.0 }];
/// let index = SearchIndex::new(&data, |s: &Sample| s.v);
///
/// assert_eq!(index.nearest(22.0), Some(&Sample { v: 20.0 }));
/// assert_eq!(index.nearest(5.0), Some(&Sample { v: 10.0 }));
/// ```
#[derive(Debug, Clone)]
pub struct SearchIndex<T> {
    records: Vec<T>,
    keys: Vec<f64>,
}

impl<T> Default for SearchIndex<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            keys: Vec::new(),
        }
    }
}

impl<T: Clone> SearchIndex<T> {
    /// Builds an index over a copy of `data`; the input is left untouched.
    pub fn new<F>(data: &[T], accessor: F) -> Self
    where
        F: Fn(&T) -> f64,
    {
        Self::from_vec(data.to_vec(), accessor)
    }
}

impl<T> SearchIndex<T> {
    /// Builds an index that takes ownership of `records`.
    ///
    /// Records whose key is NaN cannot be compared with a query and are left
    /// out of the index.
    pub fn from_vec<F>(records: Vec<T>, accessor: F) -> Self
    where
        F: Fn(&T) -> f64,
    {
        let total = records.len();
        let mut keyed: Vec<(f64, T)> = records
            .into_iter()
            .map(|record| (accessor(&record), record))
            .filter(|(key, _)| !key.is_nan())
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (keys, records): (Vec<f64>, Vec<T>) = keyed.into_iter().unzip();
        debug!(
            indexed = records.len(),
            skipped = total - records.len(),
            "Built search index"
        );
        Self { records, keys }
    }

    /// Returns the record whose key is closest to `value`.
    ///
    /// Queries below the smallest key or above the largest return the first
    /// or last record. When two neighbours are equally close the lower one
    /// wins. Returns `None` for an empty index or a NaN query.
    pub fn nearest(&self, value: f64) -> Option<&T> {
        if value.is_nan() {
            return None;
        }
        let i = self.insertion_point(value);
        let position = match (i.checked_sub(1), self.keys.get(i)) {
            (None, Some(_)) => 0,
            (Some(left), None) => left,
            (Some(left), Some(&right_key)) => {
                let left_distance = value - self.keys[left];
                let right_distance = right_key - value;
                match left_distance.partial_cmp(&right_distance) {
                    Some(Ordering::Greater) => i,
                    _ => left,
                }
            }
            (None, None) => return None,
        };
        self.records.get(position)
    }

    /// Returns the records whose keys lie in `[lo, hi]`, sorted by key.
    pub fn within(&self, lo: f64, hi: f64) -> &[T] {
        if lo.is_nan() || hi.is_nan() {
            return &[];
        }
        let start = self.insertion_point(lo);
        let end = self.keys.partition_point(|k| *k <= hi);
        if start >= end {
            return &[];
        }
        &self.records[start..end]
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in ascending key order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// The sorted keys, parallel to [`Self::iter`].
    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    /// First position whose key is not below `value`.
    fn insertion_point(&self, value: f64) -> usize {
        self.keys.partition_point(|k| *k < value)
    }
}

impl<'a, T> IntoIterator for &'a SearchIndex<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
