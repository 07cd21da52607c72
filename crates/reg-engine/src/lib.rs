//! # reg-engine
//!
//! The impact-analysis core of Regula:
//! - [`align`]: anchors a series to an event and extracts pre/post windows
//! - [`estimate`]: before/after means, deltas, slopes, trend-break flag, and
//!   confidence for one window
//! - [`aggregate`]: groups results into comparison tables
//! - [`ImpactPipeline`]: runs every (series, event) pair on a worker pool and
//!   isolates per-pair failures
//!
//! The engine performs no I/O. Inputs are a [`reg_series::SeriesStore`], an
//! [`reg_registry::EventRegistry`], and a [`reg_registry::MetricCatalog`].

pub mod aggregate;
pub mod align;
mod error;
pub mod estimate;
mod pipeline;
mod stats;

pub use aggregate::{ResultOrder, aggregate};
pub use align::{AlignedWindow, WindowSpec, align, event_profile};
pub use error::{EngineError, PipelineError};
pub use estimate::{confounders, estimate};
pub use pipeline::ImpactPipeline;
