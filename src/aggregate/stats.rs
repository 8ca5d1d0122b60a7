//! Summary statistics for a single column.
//!
//! The column is traversed once. Non-finite values are counted and dropped, finite values feed a
//! Welford accumulator (mean / population variance), incremental min/max, and a buffer that is
//! sorted afterwards for the median and the distinct count.

use std::collections::HashSet;

use crate::types::{FeatureKind, FeatureStat, Quantiles};

/// Running moments over finite values.
///
/// Uses Welford's update, which avoids the cancellation of the `E[x^2] - E[x]^2` formula on
/// large-magnitude columns.
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    non_finite: usize,
    nan: usize,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            non_finite: 0,
            nan: 0,
        }
    }

    /// Feed one value. Returns `false` (and only counts it) when the value is NaN or infinite.
    #[inline]
    pub fn push(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            self.non_finite += 1;
            if value.is_nan() {
                self.nan += 1;
            }
            return false;
        }
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        true
    }

    /// Finite values seen.
    pub fn count(&self) -> usize {
        self.count
    }

    /// NaN / infinite values seen.
    pub fn non_finite(&self) -> usize {
        self.non_finite
    }

    /// The NaN share of [`StatsAccumulator::non_finite`].
    pub fn nan_count(&self) -> usize {
        self.nan
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }

    /// Population variance (divisor `n`).
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            (self.m2 / self.count as f64).max(0.0)
        }
    }

    /// Population standard deviation. `0.0` for a single value, NaN for none.
    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// `(min, max)` of the finite values, if any.
    pub fn range(&self) -> Option<(f64, f64)> {
        (self.count > 0).then_some((self.min, self.max))
    }
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics of one column, before it is attached to a feature name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    pub row_count: usize,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    pub quantiles: Quantiles,
    pub inf_count: usize,
    pub nan_count: usize,
    pub unique_count: usize,
}

impl ColumnSummary {
    pub fn into_feature_stat(self, feature_name: impl Into<String>, kind: FeatureKind) -> FeatureStat {
        FeatureStat {
            feature_name: feature_name.into(),
            kind,
            row_count: self.row_count,
            mean: self.mean,
            median: self.median,
            stddev: self.stddev,
            min: self.min,
            max: self.max,
            quantiles: self.quantiles,
            inf_count: self.inf_count,
            nan_count: self.nan_count,
            unique_count: self.unique_count,
        }
    }
}

/// Compute summary statistics over `values`.
///
/// Numeric columns get every aggregate; quantiles share the sorted copy taken for the median.
/// Categorical columns (category codes) report NaN for the numeric aggregates and only carry
/// `inf_count` / `nan_count` (missing/invalid codes) and the number of distinct categories.
pub fn compute_stats<I>(values: I, kind: FeatureKind) -> ColumnSummary
where
    I: IntoIterator<Item = f64>,
{
    FiniteScan::collect(values).summarize(kind)
}

/// Result of the single traversal: the finite subset plus its running moments.
///
/// The finite buffer is kept so a histogram can be built from it without reading the column again.
#[derive(Debug)]
pub(crate) struct FiniteScan {
    pub(crate) finite: Vec<f64>,
    pub(crate) acc: StatsAccumulator,
    pub(crate) row_count: usize,
}

impl FiniteScan {
    pub(crate) fn collect<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let iter = values.into_iter();
        let mut finite = Vec::with_capacity(iter.size_hint().0);
        let mut acc = StatsAccumulator::new();
        let mut row_count = 0usize;
        for value in iter {
            row_count += 1;
            if acc.push(value) {
                finite.push(value);
            }
        }
        Self {
            finite,
            acc,
            row_count,
        }
    }

    /// Reduce to a [`ColumnSummary`]. Sorts the finite buffer in place for numeric columns.
    pub(crate) fn summarize(&mut self, kind: FeatureKind) -> ColumnSummary {
        let mut summary = ColumnSummary {
            row_count: self.row_count,
            mean: f64::NAN,
            median: f64::NAN,
            stddev: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            quantiles: Quantiles::UNDEFINED,
            inf_count: self.acc.non_finite(),
            nan_count: self.acc.nan_count(),
            unique_count: 0,
        };
        if self.finite.is_empty() {
            return summary;
        }

        match kind {
            FeatureKind::Numeric => {
                self.finite.sort_unstable_by(f64::total_cmp);
                let (min, max) = self.acc.range().unwrap_or((f64::NAN, f64::NAN));
                summary.mean = self.acc.mean();
                summary.stddev = self.acc.stddev();
                summary.min = min;
                summary.max = max;
                summary.median = median_of_sorted(&self.finite);
                summary.quantiles = Quantiles::from_sorted(&self.finite);
                summary.unique_count = distinct_sorted(&self.finite);
            }
            FeatureKind::Categorical => {
                summary.unique_count = distinct_codes(&self.finite);
            }
        }
        summary
    }
}

/// Median of a non-empty sorted slice; the mean of the two middle values for even lengths.
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        return sorted[mid];
    }
    let (lo, hi) = (sorted[mid - 1], sorted[mid]);
    let m = (lo + hi) / 2.0;
    if m.is_finite() { m } else { lo / 2.0 + hi / 2.0 }
}

/// Runs of equal values in a sorted slice (`-0.0` and `0.0` are one value).
fn distinct_sorted(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|w| w[0] != w[1]).count()
}

fn distinct_codes(codes: &[f64]) -> usize {
    codes
        .iter()
        .map(|&c| if c == 0.0 { 0u64 } else { c.to_bits() })
        .collect::<HashSet<u64>>()
        .len()
}
