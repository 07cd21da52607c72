//! Series Store error types.

use reg_core::{DataIntegrityError, Frequency, SourceDescriptor};
use thiserror::Error;

/// Errors raised by a [`crate::SeriesLoader`] collaborator.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The loader has no data for the requested descriptor.
    #[error("no data for {country}/{metric_id}@{source_id}")]
    NoData {
        country: String,
        metric_id: String,
        source_id: String,
    },

    /// Reading the underlying source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source could not be parsed into observations.
    #[error("parse error: {0}")]
    Parse(String),
}

impl LoaderError {
    #[must_use]
    pub fn no_data(descriptor: &SourceDescriptor) -> Self {
        Self::NoData {
            country: descriptor.country.clone(),
            metric_id: descriptor.metric_id.clone(),
            source_id: descriptor.source_id.clone(),
        }
    }
}

/// Errors from loading into or querying the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The loaded observations violate a series invariant.
    #[error("data integrity error: {0}")]
    Integrity(#[from] DataIntegrityError),

    /// The loader collaborator failed.
    #[error("loader error: {0}")]
    Loader(#[from] LoaderError),

    /// No series is stored for the requested identity.
    #[error("series not found: {country}/{metric_id}")]
    NotFound { country: String, metric_id: String },
}

/// Errors from moving a series to another frequency.
#[derive(Debug, Error)]
pub enum ResampleError {
    /// Splitting a flow total over finer periods would fabricate values.
    #[error("cannot disaggregate summed series {series} from {from} to {to}")]
    UnsupportedDisaggregation {
        series: String,
        from: Frequency,
        to: Frequency,
    },

    /// The resampled output failed series validation.
    #[error("data integrity error: {0}")]
    Integrity(#[from] DataIntegrityError),
}
