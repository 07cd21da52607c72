use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::period::Frequency;

/// Separator between a base metric id and a derived-transform suffix.
pub const DERIVED_SEPARATOR: char = ':';
/// Suffix of period-over-period growth-rate series.
pub const GROWTH_SUFFIX: &str = "growth";
/// Suffix of cumulative index series.
pub const INDEX_SUFFIX: &str = "index";

/// `broadband_price:growth` -> `broadband_price`.
#[must_use]
pub fn base_metric_id(metric_id: &str) -> &str {
    metric_id
        .split_once(DERIVED_SEPARATOR)
        .map_or(metric_id, |(base, _)| base)
}

/// `("broadband_price", "growth")` -> `broadband_price:growth`.
#[must_use]
pub fn derived_metric_id(metric_id: &str, suffix: &str) -> String {
    format!("{metric_id}{DERIVED_SEPARATOR}{suffix}")
}

/// How values of a metric combine when several periods collapse into one.
///
/// Rate- and level-like metrics (prices, penetration shares) average; flow
/// metrics (traffic volume, spending) add up.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    #[default]
    Mean,
    Sum,
}

impl AggregationKind {
    /// Combine `values`. Returns `None` for an empty slice.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn combine(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let total: f64 = values.iter().sum();
        match self {
            Self::Mean => Some(total / values.len() as f64),
            Self::Sum => Some(total),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
        }
    }
}

/// Static reference metadata for one metric.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Metric {
    pub metric_id: String,
    pub display_unit: String,
    /// Canonical frequency; series are resampled to it before windowing.
    pub expected_frequency: Frequency,
    pub higher_is_better: bool,
    #[serde(default)]
    pub aggregation_kind: AggregationKind,
}

impl Metric {
    #[must_use]
    pub fn new(
        metric_id: impl Into<String>,
        display_unit: impl Into<String>,
        expected_frequency: Frequency,
        higher_is_better: bool,
        aggregation_kind: AggregationKind,
    ) -> Self {
        Self {
            metric_id: metric_id.into(),
            display_unit: display_unit.into(),
            expected_frequency,
            higher_is_better,
            aggregation_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_mean_and_sum() {
        let values = [1.0, 2.0, 6.0];
        assert_eq!(AggregationKind::Mean.combine(&values), Some(3.0));
        assert_eq!(AggregationKind::Sum.combine(&values), Some(9.0));
        assert_eq!(AggregationKind::Sum.combine(&[]), None);
    }

    #[test]
    fn derived_ids_resolve_to_base() {
        let derived = derived_metric_id("gerd", GROWTH_SUFFIX);
        assert_eq!(derived, "gerd:growth");
        assert_eq!(base_metric_id(&derived), "gerd");
        assert_eq!(base_metric_id("gerd:growth:index"), "gerd");
        assert_eq!(base_metric_id("gerd"), "gerd");
    }

    #[test]
    fn aggregation_defaults_to_mean_in_toml_shaped_input() {
        let json = r#"{"metric_id":"internet_usage","display_unit":"% of individuals",
            "expected_frequency":"annual","higher_is_better":true}"#;
        let metric: Metric = serde_json::from_str(json).unwrap();
        assert_eq!(metric.aggregation_kind, AggregationKind::Mean);
    }
}
