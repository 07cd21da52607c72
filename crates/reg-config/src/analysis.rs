//! Alignment and estimator settings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_span_periods() -> u32 {
    8
}

const fn default_trend_break_threshold() -> f64 {
    1.5
}

const fn default_min_observations() -> usize {
    3
}

const fn default_high_confidence_min_observations() -> usize {
    6
}

const fn default_cv_high_confidence_threshold() -> f64 {
    0.5
}

/// Quantity compared before and after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Raw series values.
    #[default]
    Level,
    /// Period-over-period percentage change.
    GrowthRate,
}

impl Measure {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::GrowthRate => "growth_rate",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Canonical periods before the event period included in the pre window.
    #[serde(default = "default_span_periods")]
    pub pre_span_periods: u32,

    /// Canonical periods after the event period included in the post window.
    #[serde(default = "default_span_periods")]
    pub post_span_periods: u32,

    /// Multiplier on the pre-window standard deviation of first differences.
    #[serde(default = "default_trend_break_threshold")]
    pub trend_break_threshold: f64,

    /// Windows with fewer non-missing values are flagged insufficient.
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,

    /// Both windows need at least this many values for `high` confidence.
    #[serde(default = "default_high_confidence_min_observations")]
    pub high_confidence_min_observations: usize,

    /// Pre-window coefficient of variation must be below this for `high`.
    #[serde(default = "default_cv_high_confidence_threshold")]
    pub cv_high_confidence_threshold: f64,

    #[serde(default)]
    pub measure: Measure,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pre_span_periods: default_span_periods(),
            post_span_periods: default_span_periods(),
            trend_break_threshold: default_trend_break_threshold(),
            min_observations: default_min_observations(),
            high_confidence_min_observations: default_high_confidence_min_observations(),
            cv_high_confidence_threshold: default_cv_high_confidence_threshold(),
            measure: Measure::default(),
        }
    }
}

impl AnalysisConfig {
    /// Reject values the alignment engine or estimator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pre_span_periods == 0 {
            return Err(ConfigError::invalid(
                "analysis.pre_span_periods",
                "must be at least 1",
            ));
        }
        if self.post_span_periods == 0 {
            return Err(ConfigError::invalid(
                "analysis.post_span_periods",
                "must be at least 1",
            ));
        }
        if !self.trend_break_threshold.is_finite() || self.trend_break_threshold <= 0.0 {
            return Err(ConfigError::invalid(
                "analysis.trend_break_threshold",
                format!(
                    "must be a positive finite number, got {}",
                    self.trend_break_threshold
                ),
            ));
        }
        if self.min_observations < 2 {
            return Err(ConfigError::invalid(
                "analysis.min_observations",
                "must be at least 2 so a window has a spread",
            ));
        }
        if self.high_confidence_min_observations < self.min_observations {
            return Err(ConfigError::invalid(
                "analysis.high_confidence_min_observations",
                format!(
                    "must not be below min_observations ({})",
                    self.min_observations
                ),
            ));
        }
        if !self.cv_high_confidence_threshold.is_finite() || self.cv_high_confidence_threshold <= 0.0
        {
            return Err(ConfigError::invalid(
                "analysis.cv_high_confidence_threshold",
                format!(
                    "must be a positive finite number, got {}",
                    self.cv_high_confidence_threshold
                ),
            ));
        }
        Ok(())
    }
}
