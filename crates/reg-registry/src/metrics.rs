//! The metric catalog.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use reg_core::metric::{DERIVED_SEPARATOR, GROWTH_SUFFIX, INDEX_SUFFIX, base_metric_id};
use reg_core::{AggregationKind, Frequency, Metric};
use serde::Deserialize;

use crate::error::RegistryError;

/// Immutable metric metadata keyed by metric id.
///
/// Derived ids (`broadband_price:growth`, `gerd:growth:index`) are not
/// stored; [`MetricCatalog::get`] resolves them from the base metric.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    metrics: Vec<Metric>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct MetricsDocument {
    #[serde(default)]
    metrics: Vec<Metric>,
}

impl MetricCatalog {
    /// Build a catalog, rejecting duplicate metric ids.
    pub fn new(metrics: Vec<Metric>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(metrics.len());
        for (position, metric) in metrics.iter().enumerate() {
            if index.insert(metric.metric_id.clone(), position).is_some() {
                return Err(RegistryError::DuplicateId {
                    kind: "metric",
                    id: metric.metric_id.clone(),
                });
            }
        }
        Ok(Self { metrics, index })
    }

    /// Metrics of the digital-economy data sets Regula ships analyses for.
    #[must_use]
    pub fn builtin() -> Self {
        use AggregationKind::{Mean, Sum};
        use Frequency::{Annual, Monthly, Quarterly};

        let metrics = vec![
            Metric::new("broadband_price", "PPP EUR", Annual, false, Mean),
            Metric::new("broadband_speed", "% of households >1 Gbps", Annual, true, Mean),
            Metric::new("broadband_traffic", "exabytes", Annual, true, Sum),
            Metric::new("internet_usage", "% of population", Annual, true, Mean),
            Metric::new("cloud_individual", "% of individuals", Annual, true, Mean),
            Metric::new("cloud_enterprise", "% of enterprises", Annual, true, Mean),
            Metric::new("gerd", "% of GDP", Annual, true, Mean),
            Metric::new("berd", "% of GDP", Annual, true, Mean),
            Metric::new("goverd", "% of GDP", Annual, true, Mean),
            Metric::new("herd", "% of GDP", Annual, true, Mean),
            Metric::new("vpn_searches", "search interest", Monthly, true, Mean),
            Metric::new(
                "dsa_notice_compliance",
                "% of notices assessed within 24h",
                Quarterly,
                true,
                Mean,
            ),
        ];
        let index = metrics
            .iter()
            .enumerate()
            .map(|(position, metric)| (metric.metric_id.clone(), position))
            .collect();
        Self { metrics, index }
    }

    /// Parse a TOML document of `[[metrics]]` tables.
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryError> {
        let document: MetricsDocument = toml::from_str(source)?;
        Self::new(document.metrics)
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Look up a metric. Derived ids resolve to their base metric with mean
    /// aggregation and a `%` (growth) or `index` unit.
    #[must_use]
    pub fn get(&self, metric_id: &str) -> Option<Cow<'_, Metric>> {
        if let Some(&position) = self.index.get(metric_id) {
            return Some(Cow::Borrowed(&self.metrics[position]));
        }

        let base = self.index.get(base_metric_id(metric_id))?;
        let (_, suffix) = metric_id.rsplit_once(DERIVED_SEPARATOR)?;
        let display_unit = match suffix {
            GROWTH_SUFFIX => "%",
            INDEX_SUFFIX => "index",
            _ => return None,
        };
        let base = &self.metrics[*base];
        Some(Cow::Owned(Metric {
            metric_id: metric_id.to_string(),
            display_unit: display_unit.to_string(),
            aggregation_kind: AggregationKind::Mean,
            ..base.clone()
        }))
    }

    /// Stored (non-derived) metrics, in catalog order.
    #[must_use]
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
