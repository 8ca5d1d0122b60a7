//! Single-column reducers.
//!
//! Both reducers consume a sequence of `f64` (usually a [`crate::column::ColumnIter`]) and
//! produce an immutable result:
//!
//! - [`compute_stats()`]: mean / median / population stddev / min / max / non-finite count /
//!   distinct count
//! - [`compute_histogram()`]: fixed equal-width bins over the finite range
//! - [`rebin()`]: counts against the bounds of an existing histogram
//!
//! ## Example
//!
//! ```rust
//! use rusty_data_profiler::aggregate::{compute_histogram, compute_stats};
//! use rusty_data_profiler::types::FeatureKind;
//!
//! let values = [1.0, 3.0, 5.0, f64::NAN];
//!
//! let stats = compute_stats(values, FeatureKind::Numeric);
//! assert_eq!(stats.median, 3.0);
//! assert_eq!(stats.inf_count, 1);
//!
//! let bins = compute_histogram(values, 2).unwrap();
//! assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 2]);
//! ```

pub mod histogram;
pub mod stats;

pub use histogram::{compute_histogram, finite_range, rebin};
pub use stats::{compute_stats, ColumnSummary, StatsAccumulator};
