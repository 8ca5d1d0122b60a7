//! `rusty-data-profiler` computes a statistical profile of a 2D numeric array: per-feature summary
//! statistics and fixed equal-width histograms, in a single pass over each column.
//!
//! The primary entrypoint is [`profile::Profiler`] (or the one-shot
//! [`profile::compute_statistics`] / [`profile::compute_histograms`] functions), which takes a
//! borrowed [`types::ArrayView`] and one [`types::FeatureDescriptor`] per column.
//!
//! ## What you get per feature
//!
//! - [`types::FeatureStat`]: mean, median, population standard deviation, min, max, nearest-rank
//!   quantiles (p25 / p50 / p75 / p99), number of non-finite values (NaN / +inf / -inf, including
//!   missing cells) with its NaN share, distinct-value count
//! - [`types::FeatureBin`]: `num_bins` equal-width bins over the finite range of the column
//!
//! Non-finite values are data-quality signals, not errors: they are counted and excluded from
//! every numeric aggregate and from the histogram.
//!
//! **Feature kinds:** descriptors are either [`types::FeatureKind::Numeric`] or
//! [`types::FeatureKind::Categorical`]. Raw type tags are folded into a kind with
//! [`classify::classify`]: any tag containing `int` or `float` is numeric, everything else
//! (including unknown tags) is categorical. Categorical columns hold category codes; they report
//! their distinct-category count and NaN for the numeric aggregates.
//!
//! ## Quick example: profile a row-major buffer
//!
//! ```rust
//! use rusty_data_profiler::profile::{ProfileOptions, Profiler};
//! use rusty_data_profiler::types::{ArrayView, FeatureDescriptor};
//!
//! # fn main() -> Result<(), rusty_data_profiler::ProfileError> {
//! // [[1, 2], [3, 4], [5, 6]]
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let view = ArrayView::row_major(&data, 3, 2)?;
//! let descriptors = FeatureDescriptor::from_names_and_tags(&["a", "b"], &["int64", "float64"])?;
//!
//! let profiler = Profiler::new(ProfileOptions::default())?;
//! let profile = profiler.profile(&view, &descriptors, Some(2))?;
//!
//! let a = &profile.features[0];
//! assert_eq!((a.min, a.median, a.max, a.mean), (1.0, 3.0, 5.0, 3.0));
//!
//! let counts: Vec<u64> = profile.histograms[0].bins.iter().map(|b| b.count).collect();
//! assert_eq!(counts, vec![1, 2]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: profile a CSV file
//!
//! ```no_run
//! use rusty_data_profiler::frame::csv::read_csv_frame_from_path;
//! use rusty_data_profiler::frame::ColumnSpec;
//! use rusty_data_profiler::profile::{ProfileOptions, Profiler};
//!
//! # fn main() -> Result<(), rusty_data_profiler::ProfileError> {
//! let frame = read_csv_frame_from_path(
//!     "measurements.csv",
//!     &[ColumnSpec::new("temperature", "float64"), ColumnSpec::new("site", "str")],
//! )?;
//! let profiler = Profiler::new(ProfileOptions::default())?;
//! println!("{}", frame.profile(&profiler, Some(20))?.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`profile`]: the profiling engine, options, observer hooks and metrics
//! - [`aggregate`]: single-column statistics and histogram reducers
//! - [`column`]: lazy column access over row-major / column-major buffers
//! - [`classify`]: type tag classification
//! - [`types`]: array views, descriptors and result records
//! - [`frame`]: owned tables built in code, from CSV or (feature `polars`) from a `DataFrame`
//! - [`error`]: the error type shared by every module
//!
//! ### Boundary policies
//!
//! - A column without finite values yields NaN statistics and `num_bins` empty bins bounded at
//!   `0.0`.
//! - A constant column yields `num_bins` zero-width bins at the constant; the first bin holds
//!   every value.
//! - Results are always in descriptor order and are identical for any worker count.

pub mod aggregate;
pub mod classify;
pub mod column;
pub mod error;
pub mod frame;
pub mod profile;
pub mod types;

pub use error::{ProfileError, ProfileResult};
