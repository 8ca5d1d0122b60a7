//! Fixed equal-width histograms.
//!
//! Binning takes two passes over a restartable sequence: the first finds the finite range, the
//! second assigns each finite value to `floor((v - min) / width)`, clamped to the last bin so the
//! maximum always lands inside the histogram. That estimate is then settled against the reported
//! edges, so a value always lands in the bin whose `[lower_bound, upper_bound)` contains it.
//!
//! Degenerate ranges:
//!
//! - no finite value: `num_bins` bins with all bounds at `0.0` and zero counts,
//! - `min == max`: `num_bins` zero-width bins at `[min, min]`; the first bin holds every value.

use crate::error::{ProfileError, ProfileResult};
use crate::types::HistogramBin;

pub(crate) fn validate_bin_count(num_bins: usize) -> ProfileResult<()> {
    if num_bins == 0 {
        return Err(ProfileError::InvalidBinCount { num_bins });
    }
    Ok(())
}

/// `(min, max)` over the finite values, or `None` when there are none.
pub fn finite_range<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Build an equal-width histogram with `num_bins` bins over the finite values of `values`.
///
/// `values` is traversed twice, so it must be cheap to clone (e.g. a
/// [`crate::column::ColumnIter`] or a slice iterator).
pub fn compute_histogram<I>(values: I, num_bins: usize) -> ProfileResult<Vec<HistogramBin>>
where
    I: IntoIterator<Item = f64> + Clone,
{
    validate_bin_count(num_bins)?;
    let mut binner = EqualWidthBinner::new(finite_range(values.clone()), num_bins);
    for v in values {
        binner.push(v);
    }
    Ok(binner.finish())
}

/// Count the finite values of `values` into the fixed bounds of `reference`.
///
/// Finite values below `reference[0].lower_bound` are counted in the first bin and values above
/// `reference[last].upper_bound` in the last one, so data drifting out of the reference range
/// still shows up in the tails. Values falling into a gap between non-contiguous reference bins
/// are not counted. The reference counts are ignored.
pub fn rebin<I>(values: I, reference: &[HistogramBin]) -> ProfileResult<Vec<HistogramBin>>
where
    I: IntoIterator<Item = f64>,
{
    let (first, last) = match (reference.first(), reference.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ProfileError::InvalidBinCount { num_bins: 0 }),
    };
    let (lo, hi) = (first.lower_bound, last.upper_bound);
    let last_idx = reference.len() - 1;

    let mut counts = vec![0u64; reference.len()];
    for v in values {
        if !v.is_finite() {
            continue;
        }
        if v < lo {
            counts[0] += 1;
            continue;
        }
        if v > hi {
            counts[last_idx] += 1;
            continue;
        }
        // First bin whose lower bound is >= v.
        let at = reference.partition_point(|b| b.lower_bound < v);
        let idx = if at < reference.len() && reference[at].lower_bound == v {
            at
        } else {
            at.saturating_sub(1)
        };
        let bin = &reference[idx];
        let inside = v < bin.upper_bound || (v == bin.upper_bound && (idx == last_idx || bin.width() == 0.0));
        if inside {
            counts[idx] += 1;
        }
    }

    Ok(reference
        .iter()
        .zip(counts)
        .map(|(b, count)| HistogramBin {
            lower_bound: b.lower_bound,
            upper_bound: b.upper_bound,
            count,
        })
        .collect())
}

/// Second-pass state of an equal-width histogram whose range is already known.
#[derive(Debug)]
pub(crate) struct EqualWidthBinner {
    range: Option<(f64, f64)>,
    width: f64,
    edges: Vec<f64>,
    counts: Vec<u64>,
}

impl EqualWidthBinner {
    /// `num_bins` must be > 0 (see [`validate_bin_count`]).
    pub(crate) fn new(range: Option<(f64, f64)>, num_bins: usize) -> Self {
        let Some((min, max)) = range else {
            return Self {
                range: None,
                width: 0.0,
                edges: vec![0.0; num_bins + 1],
                counts: vec![0; num_bins],
            };
        };

        let n = num_bins as f64;
        let mut width = (max - min) / n;
        if !width.is_finite() {
            // max - min overflowed.
            width = max / n - min / n;
        }

        let mut edges = Vec::with_capacity(num_bins + 1);
        edges.extend((0..num_bins).map(|i| min + width * i as f64));
        edges.push(max);

        Self {
            range: Some((min, max)),
            width,
            edges,
            counts: vec![0; num_bins],
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, value: f64) {
        let Some((min, max)) = self.range else {
            return;
        };
        if !value.is_finite() || value < min || value > max {
            return;
        }
        if self.width <= 0.0 {
            self.counts[0] += 1;
            return;
        }
        let last = self.counts.len() - 1;
        let mut idx = (((value - min) / self.width).floor() as usize).min(last);
        while idx > 0 && value < self.edges[idx] {
            idx -= 1;
        }
        while idx < last && value >= self.edges[idx + 1] {
            idx += 1;
        }
        self.counts[idx] += 1;
    }

    pub(crate) fn finish(self) -> Vec<HistogramBin> {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| HistogramBin {
                lower_bound: self.edges[i],
                upper_bound: self.edges[i + 1],
                count,
            })
            .collect()
    }
}
