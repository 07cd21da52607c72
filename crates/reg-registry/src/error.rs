//! Registry error types.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building an event registry or metric catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The TOML document could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Reading a registry file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two entries share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// A context period ends before it starts.
    #[error("context period {id} ends ({end}) before it starts ({start})")]
    InvalidContextPeriod {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}
