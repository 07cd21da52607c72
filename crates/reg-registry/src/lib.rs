//! # reg-registry
//!
//! Reference catalogs for Regula:
//! - [`EventRegistry`]: regulatory events (GDPR, DSA, DMA, AI Act) with their
//!   effective dates and applicability, plus known confounding periods
//! - [`MetricCatalog`]: metric metadata (unit, canonical frequency,
//!   aggregation kind)
//!
//! Both ship a builtin instance and can be loaded from TOML. They are
//! immutable once built and are passed around by shared reference.

mod error;
mod events;
mod metrics;

pub use error::RegistryError;
pub use events::{EEA_EFTA, EU27, EventRegistry};
pub use metrics::MetricCatalog;
