use thiserror::Error;

/// Convenience result type for profiling operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Error type returned by profiling and frame ingestion functions.
///
/// Input errors (`InvalidShape`, `InvalidBinCount`, `UnsupportedElementType`) are raised before any
/// aggregation starts, so a failed call never leaves partial results behind.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The array shape and the feature descriptors do not agree (or the shape itself is invalid).
    #[error("invalid shape: {message}")]
    InvalidShape { message: String },

    /// A histogram was requested with no bins.
    #[error("invalid bin count: {num_bins} (must be > 0)")]
    InvalidBinCount { num_bins: usize },

    /// The buffer element type cannot be read as a finite-precision float.
    #[error("unsupported element type '{dtype}': {message}")]
    UnsupportedElementType { dtype: String, message: String },

    /// [`crate::profile::ProfileOptions`] failed validation.
    #[error("invalid profiler options: {message}")]
    InvalidOptions { message: String },

    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not carry the requested columns.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A numeric cell could not be parsed.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// Report serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "polars")]
    /// DataFrame conversion error (feature-gated behind `polars`).
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl ProfileError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::InvalidShape {
            message: message.into(),
        }
    }
}
