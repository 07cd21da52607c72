//! # reg-core
//!
//! Core types and error taxonomy for Regula.
//!
//! This crate provides the foundational types shared across all Regula crates:
//! - Calendar periods at annual, quarterly, and monthly frequency
//! - Observations and validated, gap-tolerant series
//! - Metric and regulatory event reference metadata
//! - Impact results, comparison tables, and the run report handed to renderers
//! - Data integrity and cross-cutting error types

pub mod errors;
pub mod event;
pub mod impact;
pub mod metric;
pub mod observation;
pub mod period;
pub mod series;

pub use errors::{CoreError, DataIntegrityError};
pub use event::{Applicability, ContextPeriod, Event, EventCategory};
pub use impact::{
    ComparisonGroup, ComparisonTable, Confidence, GroupBy, GroupKey, ImpactReport, ImpactResult,
    PeriodRange, ProfilePoint, SkippedPair,
};
pub use metric::{AggregationKind, Metric};
pub use observation::{Observation, QualityFlag};
pub use period::{Frequency, Period};
pub use series::{Series, SeriesKey, SourceDescriptor};
