use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::period::Period;

/// Source-level quality marker attached to an observation.
///
/// The first four mirror the observation status flags used by Eurostat and
/// OECD exports; `CarriedForward` marks values produced by resampling.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    #[default]
    Observed,
    Estimated,
    Provisional,
    BreakInSeries,
    CarriedForward,
}

impl QualityFlag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Observed => "observed",
            Self::Estimated => "estimated",
            Self::Provisional => "provisional",
            Self::BreakInSeries => "break_in_series",
            Self::CarriedForward => "carried_forward",
        }
    }
}

/// A single data point. `value: None` means missing, never zero.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Observation {
    pub country: String,
    pub metric_id: String,
    pub source_id: String,
    pub period: Period,
    pub value: Option<f64>,
    #[serde(default)]
    pub quality: QualityFlag,
}

impl Observation {
    /// Observed value with default quality.
    #[must_use]
    pub fn new(
        country: impl Into<String>,
        metric_id: impl Into<String>,
        source_id: impl Into<String>,
        period: Period,
        value: Option<f64>,
    ) -> Self {
        Self {
            country: country.into(),
            metric_id: metric_id.into(),
            source_id: source_id.into(),
            period,
            value,
            quality: QualityFlag::Observed,
        }
    }

    #[must_use]
    pub const fn with_quality(mut self, quality: QualityFlag) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}
