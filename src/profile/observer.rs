use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Events emitted by the [`super::Profiler`] during a profiling call.
///
/// `FeatureStarted` / `FeatureFinished` are emitted from worker threads, so their relative order
/// across features is not deterministic.
#[derive(Debug, Clone)]
pub enum ProfileEvent {
    RunStarted { features: usize, rows: usize },
    ThrottleWaited { duration: Duration },
    FeatureStarted { position: usize, name: String },
    FeatureFinished { position: usize, values: usize },
    RunFinished {
        elapsed: Duration,
        metrics: ProfileMetricsSnapshot,
    },
}

/// Observer hook for profiling events.
pub trait ProfileObserver: Send + Sync {
    fn on_event(&self, event: &ProfileEvent);
}

/// Logs profiling events to stderr.
#[derive(Debug, Default)]
pub struct StdErrProfileObserver;

impl ProfileObserver for StdErrProfileObserver {
    fn on_event(&self, event: &ProfileEvent) {
        match event {
            ProfileEvent::RunStarted { features, rows } => {
                eprintln!("[profile][start] features={features} rows={rows}");
            }
            ProfileEvent::ThrottleWaited { duration } => {
                eprintln!("[profile][throttle] waited={duration:?}");
            }
            ProfileEvent::FeatureStarted { position, name } => {
                eprintln!("[profile][feature] position={position} name={name}");
            }
            ProfileEvent::FeatureFinished { position, values } => {
                eprintln!("[profile][feature][done] position={position} values={values}");
            }
            ProfileEvent::RunFinished { elapsed, metrics } => {
                eprintln!("[profile][ok] elapsed={elapsed:?} {metrics}");
            }
        }
    }
}

/// Live counters for the current (or last) profiling run.
///
/// The profiler resets and updates these during each call; callers can snapshot them at any time.
#[derive(Debug)]
pub struct ProfileMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    features_started: AtomicU64,
    features_finished: AtomicU64,
    values_scanned: AtomicU64,
    throttle_wait_ns: AtomicU64,

    active_features: AtomicUsize,
    max_active_features: AtomicUsize,
}

impl ProfileMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            features_started: AtomicU64::new(0),
            features_finished: AtomicU64::new(0),
            values_scanned: AtomicU64::new(0),
            throttle_wait_ns: AtomicU64::new(0),
            active_features: AtomicUsize::new(0),
            max_active_features: AtomicUsize::new(0),
        }
    }

    pub(crate) fn begin_run(&self) {
        self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.features_started.store(0, Ordering::SeqCst);
        self.features_finished.store(0, Ordering::SeqCst);
        self.values_scanned.store(0, Ordering::SeqCst);
        self.throttle_wait_ns.store(0, Ordering::SeqCst);
        self.active_features.store(0, Ordering::SeqCst);
        self.max_active_features.store(0, Ordering::SeqCst);
    }

    pub(crate) fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(saturating_nanos(elapsed), Ordering::SeqCst);
    }

    pub(crate) fn on_feature_start(&self) {
        self.features_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_features.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_features.fetch_max(now, Ordering::SeqCst);
    }

    pub(crate) fn on_feature_end(&self, values: usize) {
        self.features_finished.fetch_add(1, Ordering::SeqCst);
        self.values_scanned.fetch_add(values as u64, Ordering::SeqCst);
        self.active_features.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn on_throttle_wait(&self, d: Duration) {
        self.throttle_wait_ns.fetch_add(saturating_nanos(d), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ProfileMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        ProfileMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            features_started: self.features_started.load(Ordering::SeqCst),
            features_finished: self.features_finished.load(Ordering::SeqCst),
            values_scanned: self.values_scanned.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_features: self.max_active_features.load(Ordering::SeqCst),
        }
    }
}

impl Default for ProfileMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

/// Immutable snapshot of [`ProfileMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub features_started: u64,
    pub features_finished: u64,
    pub values_scanned: u64,
    pub throttle_wait: Duration,
    pub max_active_features: usize,
}

impl fmt::Display for ProfileMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, features={}/{}, values_scanned={}, max_active_features={}, throttle_wait={:?}, elapsed={:?}",
            self.run_id,
            self.features_finished,
            self.features_started,
            self.values_scanned,
            self.max_active_features,
            self.throttle_wait,
            self.elapsed
        )
    }
}
