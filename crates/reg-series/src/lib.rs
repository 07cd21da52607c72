//! # reg-series
//!
//! The Series Store for Regula.
//!
//! - [`SeriesStore`] owns every loaded [`reg_core::Series`]. Loading goes
//!   through a [`SeriesLoader`] collaborator that has already parsed the
//!   source format; the store only validates and indexes.
//! - [`resample`] moves a series to another frequency, aggregating into
//!   coarser buckets and carrying values forward across short gaps.
//! - [`transform`] derives growth-rate and cumulative-index series.
//!
//! The store performs no network or disk I/O of its own.

mod error;
mod loader;
mod resample;
mod store;
pub mod transform;

pub use error::{LoaderError, ResampleError, StoreError};
pub use loader::{InMemoryLoader, SeriesLoader, group_by_series};
pub use resample::{ResampleOptions, resample};
pub use store::SeriesStore;
