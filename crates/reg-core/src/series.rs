//! Validated, gap-tolerant time series.
//!
//! A [`Series`] can only be built through [`Series::new`], which enforces the
//! load-time invariants: one frequency, one (country, metric, source)
//! identity, strictly increasing periods, and finite values. Invalid input is
//! rejected with a [`DataIntegrityError`]; nothing is dropped or reordered.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DataIntegrityError;
use crate::observation::Observation;
use crate::period::{Frequency, Period};

/// Identity of a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    pub country: String,
    pub metric_id: String,
    pub source_id: String,
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.country, self.metric_id, self.source_id)
    }
}

/// What a loader is asked to produce: one series identity at one frequency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub country: String,
    pub metric_id: String,
    pub source_id: String,
    pub frequency: Frequency,
}

impl SourceDescriptor {
    #[must_use]
    pub fn new(
        country: impl Into<String>,
        metric_id: impl Into<String>,
        source_id: impl Into<String>,
        frequency: Frequency,
    ) -> Self {
        Self {
            country: country.into(),
            metric_id: metric_id.into(),
            source_id: source_id.into(),
            frequency,
        }
    }

    #[must_use]
    pub fn key(&self) -> SeriesKey {
        SeriesKey {
            country: self.country.clone(),
            metric_id: self.metric_id.clone(),
            source_id: self.source_id.clone(),
        }
    }
}

/// Ordered observations sharing (country, metric, source) and a frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    descriptor: SourceDescriptor,
    observations: Vec<Observation>,
}

impl Series {
    /// Validate `observations` against `descriptor`.
    pub fn new(
        descriptor: SourceDescriptor,
        observations: Vec<Observation>,
    ) -> Result<Self, DataIntegrityError> {
        let label = descriptor.key().to_string();
        let mut previous: Option<Period> = None;

        for obs in &observations {
            if obs.country != descriptor.country {
                return Err(DataIntegrityError::IdentityMismatch {
                    series: label,
                    field: "country",
                    found: obs.country.clone(),
                });
            }
            if obs.metric_id != descriptor.metric_id {
                return Err(DataIntegrityError::IdentityMismatch {
                    series: label,
                    field: "metric_id",
                    found: obs.metric_id.clone(),
                });
            }
            if obs.source_id != descriptor.source_id {
                return Err(DataIntegrityError::IdentityMismatch {
                    series: label,
                    field: "source_id",
                    found: obs.source_id.clone(),
                });
            }
            if obs.period.frequency() != descriptor.frequency {
                return Err(DataIntegrityError::FrequencyMismatch {
                    series: label,
                    period: obs.period,
                    expected: descriptor.frequency,
                });
            }
            if obs.value.is_some_and(|v| !v.is_finite()) {
                return Err(DataIntegrityError::NonFiniteValue {
                    series: label,
                    period: obs.period,
                });
            }
            if let Some(prev) = previous {
                if obs.period == prev {
                    return Err(DataIntegrityError::DuplicateTimestamp {
                        series: label,
                        period: obs.period,
                    });
                }
                if obs.period < prev {
                    return Err(DataIntegrityError::NonMonotonic {
                        series: label,
                        previous: prev,
                        next: obs.period,
                    });
                }
            }
            previous = Some(obs.period);
        }

        Ok(Self {
            descriptor,
            observations,
        })
    }

    #[must_use]
    pub const fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn key(&self) -> SeriesKey {
        self.descriptor.key()
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.descriptor.country
    }

    #[must_use]
    pub fn metric_id(&self) -> &str {
        &self.descriptor.metric_id
    }

    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.descriptor.source_id
    }

    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.descriptor.frequency
    }

    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    #[must_use]
    pub fn first_period(&self) -> Option<Period> {
        self.observations.first().map(|obs| obs.period)
    }

    #[must_use]
    pub fn last_period(&self) -> Option<Period> {
        self.observations.last().map(|obs| obs.period)
    }

    /// Calendar span from the first observation's start to the last one's end.
    #[must_use]
    pub fn observed_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((
            self.first_period()?.start_date(),
            self.last_period()?.end_date(),
        ))
    }

    /// Observation at exactly `period`, if one was recorded.
    #[must_use]
    pub fn get(&self, period: Period) -> Option<&Observation> {
        self.observations
            .binary_search_by(|obs| obs.period.cmp(&period))
            .ok()
            .map(|index| &self.observations[index])
    }

    /// Non-missing `(period, value)` pairs with `start <= period <= end`.
    #[must_use]
    pub fn values_between(&self, start: Period, end: Period) -> Vec<(Period, f64)> {
        let from = self.observations.partition_point(|obs| obs.period < start);
        self.observations[from..]
            .iter()
            .take_while(|obs| obs.period <= end)
            .filter_map(|obs| obs.value.map(|value| (obs.period, value)))
            .collect()
    }

    /// Consume the series, returning its parts.
    #[must_use]
    pub fn into_parts(self) -> (SourceDescriptor, Vec<Observation>) {
        (self.descriptor, self.observations)
    }
}
