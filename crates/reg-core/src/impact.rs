//! Impact results, comparison tables, and the run report.
//!
//! These are the output contract handed to the rendering layer: plain data,
//! serializable, with JSON Schemas available via `schemars`. No chart-specific
//! fields live here.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::period::Period;

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Categorical quality label on an impact estimate. Not a p-value.
///
/// `Low` is reserved: no current heuristic produces it, and it should only be
/// assigned once a trigger condition has been calibrated against data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    InsufficientData,
}

impl Confidence {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::InsufficientData => "insufficient_data",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PeriodRange
// ---------------------------------------------------------------------------

/// Inclusive range of periods of one frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PeriodRange {
    pub start: Period,
    pub end: Period,
}

impl PeriodRange {
    #[must_use]
    pub const fn new(start: Period, end: Period) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, period: Period) -> bool {
        self.start <= period && period <= self.end
    }

    /// Number of periods in the range.
    #[must_use]
    pub const fn len(&self) -> i64 {
        self.start.periods_until(self.end) + 1
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

impl fmt::Display for PeriodRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// ImpactResult
// ---------------------------------------------------------------------------

/// Before/after estimate for one (series, event) pair.
///
/// Means and deltas are `None` when undefined (empty window, zero baseline).
/// `delta_pct` is the ratio `delta_abs / pre_mean`, so `-0.167` reads as a
/// 16.7% decrease. `trend_break_detected` is a heuristic flag comparing
/// first-difference slopes, not a formal structural-break test.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImpactResult {
    pub country: String,
    pub metric_id: String,
    pub source_id: String,
    pub event_id: String,
    pub pre_period: PeriodRange,
    pub post_period: PeriodRange,
    pub pre_count: usize,
    pub post_count: usize,
    pub pre_mean: Option<f64>,
    pub post_mean: Option<f64>,
    pub delta_abs: Option<f64>,
    pub delta_pct: Option<f64>,
    pub pre_slope: Option<f64>,
    pub post_slope: Option<f64>,
    pub trend_break_detected: bool,
    pub confidence: Confidence,
    /// Ids of context periods (e.g. `covid19`) overlapping either window.
    #[serde(default)]
    pub confounders: Vec<String>,
}

// ---------------------------------------------------------------------------
// Comparison table
// ---------------------------------------------------------------------------

/// Dimensions a comparison table is grouped by.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One group per (metric, event); rows are countries.
    #[default]
    MetricEvent,
    /// One group per metric; rows are (event, country).
    Metric,
    /// One group per event; rows are (metric, country).
    Event,
    /// One group per country; rows are (event, metric).
    Country,
}

impl GroupBy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MetricEvent => "metric_event",
            Self::Metric => "metric",
            Self::Event => "event",
            Self::Country => "country",
        }
    }
}

/// Key of one comparison group. Dimensions not grouped on are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct GroupKey {
    pub metric_id: Option<String>,
    pub event_id: Option<String>,
    pub country: Option<String>,
}

impl GroupKey {
    /// Project `result` onto the dimensions of `group_by`.
    #[must_use]
    pub fn for_result(result: &ImpactResult, group_by: GroupBy) -> Self {
        let metric = || Some(result.metric_id.clone());
        let event = || Some(result.event_id.clone());
        match group_by {
            GroupBy::MetricEvent => Self {
                metric_id: metric(),
                event_id: event(),
                country: None,
            },
            GroupBy::Metric => Self {
                metric_id: metric(),
                event_id: None,
                country: None,
            },
            GroupBy::Event => Self {
                metric_id: None,
                event_id: event(),
                country: None,
            },
            GroupBy::Country => Self {
                metric_id: None,
                event_id: None,
                country: Some(result.country.clone()),
            },
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.metric_id, &self.event_id, &self.country]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect();
        f.write_str(&parts.join(" / "))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ComparisonGroup {
    pub key: GroupKey,
    pub results: Vec<ImpactResult>,
}

/// Ordered groups of impact results for cross-country or cross-metric charts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ComparisonTable {
    pub group_by: GroupBy,
    pub groups: Vec<ComparisonGroup>,
}

impl ComparisonTable {
    /// Per-country rows for a (metric, event) pair, in country order.
    ///
    /// Works for any grouping; for `MetricEvent` it is a direct group lookup.
    #[must_use]
    pub fn get(&self, metric_id: &str, event_id: &str) -> Vec<&ImpactResult> {
        self.groups
            .iter()
            .flat_map(|group| group.results.iter())
            .filter(|result| result.metric_id == metric_id && result.event_id == event_id)
            .collect()
    }

    #[must_use]
    pub fn group(&self, key: &GroupKey) -> Option<&ComparisonGroup> {
        self.groups.iter().find(|group| &group.key == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of results across all groups.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.groups.iter().map(|group| group.results.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Event profile
// ---------------------------------------------------------------------------

/// A series value at a fixed offset from the period containing an event.
///
/// Offset `0` is the event period; missing values stay `None`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProfilePoint {
    pub offset: i64,
    pub period: Period,
    pub value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// A (series, event) pair whose computation failed and was skipped.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SkippedPair {
    pub country: String,
    pub metric_id: String,
    pub source_id: String,
    /// `None` when the whole series failed before event pairing.
    pub event_id: Option<String>,
    pub reason: String,
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImpactReport {
    pub results: Vec<ImpactResult>,
    pub table: ComparisonTable,
    pub skipped: Vec<SkippedPair>,
}
