//! Engine error types.

use reg_config::ConfigError;
use reg_core::{DataIntegrityError, Frequency};
use reg_series::ResampleError;
use thiserror::Error;

/// A failure computing one (series, event) pair. Never aborts a run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The series' metric is not in the catalog.
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// The series is coarser than its metric's canonical frequency.
    #[error("cannot align {series}: {from} series is coarser than the {to} metric; alignment does not disaggregate")]
    CoarserThanMetric {
        series: String,
        from: Frequency,
        to: Frequency,
    },

    /// The series could not be moved to its metric's canonical frequency.
    #[error("resample failed: {0}")]
    Resample(#[from] ResampleError),

    /// Deriving the analysed measure from the series failed.
    #[error("transform failed: {0}")]
    Transform(#[from] DataIntegrityError),
}

/// Errors that stop a pipeline before any pair is computed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Configuration(#[from] ConfigError),

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
