//! Cross-cutting error types for Regula.
//!
//! `DataIntegrityError` covers malformed input series and is fatal for the
//! series it names only. Configuration errors live in `reg-config`; per-pair
//! computation errors live in `reg-engine`.

use thiserror::Error;

use crate::period::{Frequency, Period};

/// Malformed, duplicate, or non-monotonic input detected while building a series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityError {
    /// Two observations share the same period.
    #[error("Duplicate timestamp {period} in series {series}")]
    DuplicateTimestamp { series: String, period: Period },

    /// Observations are not in strictly increasing period order.
    #[error("Non-monotonic timestamps in series {series}: {next} follows {previous}")]
    NonMonotonic {
        series: String,
        previous: Period,
        next: Period,
    },

    /// An observation's frequency differs from the series frequency.
    #[error("Observation {period} in series {series} is not at {expected} frequency")]
    FrequencyMismatch {
        series: String,
        period: Period,
        expected: Frequency,
    },

    /// An observation belongs to a different country, metric, or source.
    #[error("Observation in series {series} has mismatched {field}: {found}")]
    IdentityMismatch {
        series: String,
        field: &'static str,
        found: String,
    },

    /// A present value is NaN or infinite.
    #[error("Non-finite value at {period} in series {series}")]
    NonFiniteValue { series: String, period: Period },

    /// The same (country, metric, source) series was loaded twice.
    #[error("Series {series} is already loaded")]
    AlreadyLoaded { series: String },
}

/// Errors that can be raised by any Regula crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Lookup returned no result.
    #[error("Not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A period string or component could not be interpreted.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
