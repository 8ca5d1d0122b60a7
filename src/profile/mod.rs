//! Profile orchestration: validate the request, fan features out over a worker pool, reassemble
//! results in descriptor order.
//!
//! This module sits "above" [`crate::aggregate`] and provides:
//!
//! - [`Profiler`]: a configurable engine (worker pool, in-flight throttle, observer, metrics)
//! - [`compute_statistics()`] / [`compute_histograms()`] / [`profile()`]: one-shot entry points
//!   running on the rayon global pool
//!
//! Columns are independent, so each feature is reduced by exactly one worker. Results are
//! collected with an indexed parallel collect, which makes the output order and every value
//! independent of the number of workers.
//!
//! ## Example
//!
//! ```rust
//! use rusty_data_profiler::profile::{compute_histograms, compute_statistics};
//! use rusty_data_profiler::types::{ArrayView, FeatureDescriptor};
//!
//! // [[1, 2], [3, 4], [5, 6]]
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let view = ArrayView::row_major(&data, 3, 2).unwrap();
//! let descriptors = FeatureDescriptor::numeric(&["a", "b"]);
//!
//! let stats = compute_statistics(&view, &descriptors).unwrap();
//! assert_eq!(stats[0].mean, 3.0);
//! assert_eq!(stats[0].median, 3.0);
//!
//! let histograms = compute_histograms(&view, &descriptors, 2).unwrap();
//! let counts: Vec<u64> = histograms[0].bins.iter().map(|b| b.count).collect();
//! assert_eq!(counts, vec![1, 2]);
//! ```

mod observer;
mod semaphore;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::aggregate::histogram::{self, finite_range, validate_bin_count, EqualWidthBinner};
use crate::aggregate::stats::FiniteScan;
use crate::column::Column;
use crate::error::{ProfileError, ProfileResult};
use crate::types::{ArrayView, DataProfile, Element, FeatureBin, FeatureDescriptor, FeatureStat};

pub use observer::{ProfileEvent, ProfileMetrics, ProfileMetricsSnapshot, ProfileObserver, StdErrProfileObserver};

use semaphore::Semaphore;

/// Configuration for the [`Profiler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOptions {
    /// Number of worker threads.
    ///
    /// If `None`, work runs on the rayon global pool (sized to the available parallelism).
    /// `Some(n)` builds a dedicated pool of `n` threads.
    pub num_threads: Option<usize>,
    /// Upper bound on features being reduced at the same time.
    ///
    /// Each in-flight feature may hold an O(row_count) copy of its finite values, so this bounds
    /// peak extra memory independently of the column count.
    pub max_in_flight_features: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            num_threads: None,
            max_in_flight_features: n.max(1),
        }
    }
}

/// A configurable profiling engine.
///
/// A `Profiler` can be reused across calls; every call builds its results from scratch.
pub struct Profiler {
    pool: Option<ThreadPool>,
    opts: ProfileOptions,
    observer: Option<Arc<dyn ProfileObserver>>,
    metrics: Arc<ProfileMetrics>,
}

impl fmt::Debug for Profiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profiler")
            .field("opts", &self.opts)
            .field("dedicated_pool", &self.pool.is_some())
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Profiler {
    /// Create a profiler with the given options.
    ///
    /// Fails with [`ProfileError::InvalidOptions`] if `num_threads == Some(0)` or
    /// `max_in_flight_features == 0`.
    pub fn new(opts: ProfileOptions) -> ProfileResult<Self> {
        if opts.max_in_flight_features == 0 {
            return Err(ProfileError::InvalidOptions {
                message: "max_in_flight_features must be > 0".to_string(),
            });
        }
        let pool = match opts.num_threads {
            Some(0) => {
                return Err(ProfileError::InvalidOptions {
                    message: "num_threads must be > 0 when set".to_string(),
                });
            }
            Some(n) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("profiler-{i}"))
                    .build()?,
            ),
            None => None,
        };

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ProfileMetrics::new()),
        })
    }

    /// Attach an observer for profiling events.
    pub fn with_observer(mut self, observer: Arc<dyn ProfileObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to live profiling metrics.
    pub fn metrics(&self) -> Arc<ProfileMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn options(&self) -> &ProfileOptions {
        &self.opts
    }

    /// One [`FeatureStat`] per descriptor, in descriptor order.
    pub fn compute_statistics<T: Element>(
        &self,
        view: &ArrayView<'_, T>,
        descriptors: &[FeatureDescriptor],
    ) -> ProfileResult<Vec<FeatureStat>> {
        validate_descriptors(view, descriptors)?;
        self.run(view, descriptors, |_, d, column| {
            FiniteScan::collect(column.iter())
                .summarize(d.kind)
                .into_feature_stat(&d.name, d.kind)
        })
    }

    /// One equal-width [`FeatureBin`] of `num_bins` bins per descriptor, in descriptor order.
    ///
    /// Each column is read twice (range, then binning) without being copied.
    pub fn compute_histograms<T: Element>(
        &self,
        view: &ArrayView<'_, T>,
        descriptors: &[FeatureDescriptor],
        num_bins: usize,
    ) -> ProfileResult<Vec<FeatureBin>> {
        validate_descriptors(view, descriptors)?;
        validate_bin_count(num_bins)?;
        self.run(view, descriptors, |_, d, column| {
            let mut binner = EqualWidthBinner::new(finite_range(column.iter()), num_bins);
            for v in column.iter() {
                binner.push(v);
            }
            FeatureBin {
                feature_name: d.name.clone(),
                bins: binner.finish(),
            }
        })
    }

    /// Statistics, plus histograms when `num_bins` is set.
    ///
    /// Each column is read once: the finite values gathered for the statistics are binned over
    /// the min/max the statistics already found.
    pub fn profile<T: Element>(
        &self,
        view: &ArrayView<'_, T>,
        descriptors: &[FeatureDescriptor],
        num_bins: Option<usize>,
    ) -> ProfileResult<DataProfile> {
        validate_descriptors(view, descriptors)?;
        if let Some(n) = num_bins {
            validate_bin_count(n)?;
        }

        let per_feature = self.run(view, descriptors, |_, d, column| {
            let mut scan = FiniteScan::collect(column.iter());
            let summary = scan.summarize(d.kind);
            let histogram = num_bins.map(|n| {
                let mut binner = EqualWidthBinner::new(scan.acc.range(), n);
                for &v in &scan.finite {
                    binner.push(v);
                }
                FeatureBin {
                    feature_name: d.name.clone(),
                    bins: binner.finish(),
                }
            });
            (summary.into_feature_stat(&d.name, d.kind), histogram)
        })?;

        let (features, histograms): (Vec<FeatureStat>, Vec<Option<FeatureBin>>) =
            per_feature.into_iter().unzip();
        Ok(DataProfile {
            row_count: view.row_count(),
            features,
            histograms: histograms.into_iter().flatten().collect(),
        })
    }

    /// Count every feature into the bin bounds of a reference histogram.
    ///
    /// `reference[i]` supplies the bounds for `descriptors[i]` (typically the output of an earlier
    /// [`Profiler::compute_histograms`] call on a baseline dataset).
    pub fn rebin<T: Element>(
        &self,
        view: &ArrayView<'_, T>,
        descriptors: &[FeatureDescriptor],
        reference: &[FeatureBin],
    ) -> ProfileResult<Vec<FeatureBin>> {
        validate_descriptors(view, descriptors)?;
        if reference.len() != descriptors.len() {
            return Err(ProfileError::shape(format!(
                "{} reference histograms for {} features",
                reference.len(),
                descriptors.len()
            )));
        }
        if let Some(empty) = reference.iter().find(|r| r.bins.is_empty()) {
            return Err(ProfileError::InvalidBinCount {
                num_bins: empty.bins.len(),
            });
        }

        self.run(view, descriptors, |i, d, column| {
            histogram::rebin(column.iter(), &reference[i].bins).map(|bins| FeatureBin {
                feature_name: d.name.clone(),
                bins,
            })
        })?
        .into_iter()
        .collect()
    }

    fn run<T, R, F>(
        &self,
        view: &ArrayView<'_, T>,
        descriptors: &[FeatureDescriptor],
        task: F,
    ) -> ProfileResult<Vec<R>>
    where
        T: Element,
        R: Send,
        F: Fn(usize, &FeatureDescriptor, Column<'_, T>) -> R + Send + Sync,
    {
        let columns = descriptors
            .iter()
            .map(|d| {
                view.column(d.position).ok_or_else(|| {
                    ProfileError::shape(format!("no column at position {}", d.position))
                })
            })
            .collect::<ProfileResult<Vec<_>>>()?;

        let out = match &self.pool {
            Some(pool) => pool.install(|| self.run_impl(view, descriptors, &columns, &task)),
            None => self.run_impl(view, descriptors, &columns, &task),
        };
        Ok(out)
    }

    fn run_impl<T, R, F>(
        &self,
        view: &ArrayView<'_, T>,
        descriptors: &[FeatureDescriptor],
        columns: &[Column<'_, T>],
        task: &F,
    ) -> Vec<R>
    where
        T: Element,
        R: Send,
        F: Fn(usize, &FeatureDescriptor, Column<'_, T>) -> R + Send + Sync,
    {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ProfileEvent::RunStarted {
            features: descriptors.len(),
            rows: view.row_count(),
        });

        let sem = Semaphore::new(self.opts.max_in_flight_features);

        let out: Vec<R> = descriptors
            .par_iter()
            .zip(columns.par_iter())
            .enumerate()
            .map(|(i, (d, column))| {
                let (permit, waited) = sem.acquire();
                if waited > Duration::ZERO {
                    self.metrics.on_throttle_wait(waited);
                    self.emit(ProfileEvent::ThrottleWaited { duration: waited });
                }

                self.metrics.on_feature_start();
                self.emit(ProfileEvent::FeatureStarted {
                    position: d.position,
                    name: d.name.clone(),
                });

                let result = task(i, d, *column);

                self.emit(ProfileEvent::FeatureFinished {
                    position: d.position,
                    values: column.len(),
                });
                self.metrics.on_feature_end(column.len());
                drop(permit);
                result
            })
            .collect();

        self.metrics.end_run(start.elapsed());
        self.emit(ProfileEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        out
    }

    fn emit(&self, event: ProfileEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

/// Fail fast on requests that cannot be profiled. Runs before any aggregation.
fn validate_descriptors<T: Element>(
    view: &ArrayView<'_, T>,
    descriptors: &[FeatureDescriptor],
) -> ProfileResult<()> {
    let column_count = view.column_count();
    if descriptors.len() != column_count {
        return Err(ProfileError::shape(format!(
            "{} feature descriptors for an array with {} columns",
            descriptors.len(),
            column_count
        )));
    }

    let mut seen = vec![false; column_count];
    for d in descriptors {
        match seen.get_mut(d.position) {
            None => {
                return Err(ProfileError::shape(format!(
                    "feature '{}' has position {} but the array has {} columns",
                    d.name, d.position, column_count
                )));
            }
            Some(true) => {
                return Err(ProfileError::shape(format!(
                    "position {} is used by more than one feature (second: '{}')",
                    d.position, d.name
                )));
            }
            Some(slot) => *slot = true,
        }
    }
    Ok(())
}

/// [`Profiler::compute_statistics`] on a default profiler.
pub fn compute_statistics<T: Element>(
    view: &ArrayView<'_, T>,
    descriptors: &[FeatureDescriptor],
) -> ProfileResult<Vec<FeatureStat>> {
    Profiler::new(ProfileOptions::default())?.compute_statistics(view, descriptors)
}

/// [`Profiler::compute_histograms`] on a default profiler.
pub fn compute_histograms<T: Element>(
    view: &ArrayView<'_, T>,
    descriptors: &[FeatureDescriptor],
    num_bins: usize,
) -> ProfileResult<Vec<FeatureBin>> {
    Profiler::new(ProfileOptions::default())?.compute_histograms(view, descriptors, num_bins)
}

/// [`Profiler::profile`] on a default profiler.
pub fn profile<T: Element>(
    view: &ArrayView<'_, T>,
    descriptors: &[FeatureDescriptor],
    num_bins: Option<usize>,
) -> ProfileResult<DataProfile> {
    Profiler::new(ProfileOptions::default())?.profile(view, descriptors, num_bins)
}
