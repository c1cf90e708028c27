//! Core analyzer trait for the statistics engine.

use std::fmt::Debug;

use crate::error::Result;

/// Common interface implemented by every configurable analyzer.
///
/// Analyzers are pure: `analyze` reads its input, never mutates shared state,
/// and returns a freshly built result. This makes every implementation safe
/// to call concurrently from multiple threads.
///
/// # Example
///
/// ```rust
/// use term_stats::analyzers::{Analyzer, Series};
/// use term_stats::error::Result;
///
/// #[derive(Debug)]
/// struct CountAnalyzer;
///
/// impl Analyzer for CountAnalyzer {
///     type Input = Series;
///     type Output = usize;
///
///     fn analyze(&self, input: &Series) -> Result<usize> {
///         Ok(input.valid_count())
///     }
///
///     fn name(&self) -> &str {
///         "count"
///     }
/// }
///
/// let count = CountAnalyzer.analyze(&Series::from([1.0, f64::NAN])).unwrap();
/// assert_eq!(count, 1);
/// ```
pub trait Analyzer: Send + Sync + Debug {
    /// The input consumed by this analyzer.
    type Input: ?Sized;

    /// The result produced by this analyzer.
    type Output;

    /// Runs the analysis.
    fn analyze(&self, input: &Self::Input) -> Result<Self::Output>;

    /// Returns the name of this analyzer.
    ///
    /// Used for identification in diagnostics.
    fn name(&self) -> &str;

    /// Returns a description of what this analyzer computes.
    fn description(&self) -> &str {
        ""
    }
}
