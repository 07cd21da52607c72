//! Batch pipeline: every stored series against every applicable event.

use std::borrow::Cow;

use rayon::prelude::*;
use reg_config::{Measure, RegulaConfig};
use reg_core::{Event, ImpactReport, ImpactResult, Series, SkippedPair};
use reg_registry::{EventRegistry, MetricCatalog};
use reg_series::SeriesStore;
use reg_series::transform::growth_rate;

use crate::aggregate::{ResultOrder, aggregate};
use crate::align::{WindowSpec, align};
use crate::error::{EngineError, PipelineError};
use crate::estimate::{confounders, estimate};

/// A validated run configuration bound to its reference catalogs.
#[derive(Debug)]
pub struct ImpactPipeline<'a> {
    config: RegulaConfig,
    registry: &'a EventRegistry,
    catalog: &'a MetricCatalog,
}

enum Outcome {
    Computed(ImpactResult),
    OutsideSpan,
    Failed(SkippedPair),
}

impl<'a> ImpactPipeline<'a> {
    /// Validate `config`; nothing is computed for an invalid configuration.
    pub fn new(
        config: RegulaConfig,
        registry: &'a EventRegistry,
        catalog: &'a MetricCatalog,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            registry,
            catalog,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &RegulaConfig {
        &self.config
    }

    /// Run every (series, applicable event) pair in `store`.
    ///
    /// A failing pair is logged and recorded in `skipped`; the rest of the
    /// run proceeds. Identical input yields an identical report.
    pub fn run(&self, store: &SeriesStore) -> Result<ImpactReport, PipelineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.pipeline.worker_threads)
            .build()?;
        tracing::info!(
            series = store.len(),
            events = self.registry.len(),
            measure = %self.config.analysis.measure,
            threads = pool.current_num_threads(),
            "impact run started"
        );

        let (measured, mut skipped) = pool.install(|| self.measure_all(store));
        let tasks: Vec<(&Series, &Event)> = measured
            .iter()
            .flat_map(|series| {
                self.registry
                    .events_for(series.country(), None)
                    .into_iter()
                    .map(move |event| (series.as_ref(), event))
            })
            .collect();

        let outcomes: Vec<Outcome> = pool.install(|| {
            tasks
                .par_iter()
                .map(|&(series, event)| self.run_pair(series, event))
                .collect()
        });

        let mut results = Vec::new();
        let mut outside = 0_usize;
        for outcome in outcomes {
            match outcome {
                Outcome::Computed(result) => results.push(result),
                Outcome::OutsideSpan => outside += 1,
                Outcome::Failed(pair) => skipped.push(pair),
            }
        }

        let order = self.result_order();
        order.sort(&mut results);
        let table = aggregate(&results, self.config.pipeline.group_by, &order);

        tracing::info!(
            results = results.len(),
            outside_span = outside,
            skipped = skipped.len(),
            groups = table.len(),
            "impact run finished"
        );
        Ok(ImpactReport {
            results,
            table,
            skipped,
        })
    }

    /// Align and estimate one pair. `Ok(None)` when the event lies outside
    /// the series span.
    pub fn analyze_pair(
        &self,
        series: &Series,
        event: &Event,
    ) -> Result<Option<ImpactResult>, EngineError> {
        let metric = self
            .catalog
            .get(series.metric_id())
            .ok_or_else(|| EngineError::UnknownMetric(series.metric_id().to_string()))?;
        let spec = WindowSpec::from(&self.config.analysis);
        let Some(window) = align(series, event, &metric, spec)? else {
            return Ok(None);
        };
        let mut result = estimate(&window, &self.config.analysis);
        result.confounders = confounders(&window, self.registry);
        Ok(Some(result))
    }

    fn run_pair(&self, series: &Series, event: &Event) -> Outcome {
        match self.analyze_pair(series, event) {
            Ok(Some(result)) => {
                tracing::debug!(
                    series = %series.key(),
                    event = %event.event_id,
                    confidence = %result.confidence,
                    "pair estimated"
                );
                Outcome::Computed(result)
            }
            Ok(None) => Outcome::OutsideSpan,
            Err(err) => {
                tracing::warn!(
                    series = %series.key(),
                    event = %event.event_id,
                    error = %err,
                    "pair skipped"
                );
                Outcome::Failed(skipped_pair(series, Some(&event.event_id), &err))
            }
        }
    }

    /// Apply the configured measure to every stored series.
    fn measure_all<'s>(
        &self,
        store: &'s SeriesStore,
    ) -> (Vec<Cow<'s, Series>>, Vec<SkippedPair>) {
        let transformed: Vec<Result<Cow<'s, Series>, (&'s Series, EngineError)>> = store
            .series()
            .par_iter()
            .map(|series| match self.config.analysis.measure {
                Measure::Level => Ok(Cow::Borrowed(series)),
                Measure::GrowthRate => growth_rate(series)
                    .map(Cow::Owned)
                    .map_err(|err| (series, EngineError::from(err))),
            })
            .collect();

        let mut measured = Vec::with_capacity(transformed.len());
        let mut failed = Vec::new();
        for outcome in transformed {
            match outcome {
                Ok(series) => measured.push(series),
                Err((series, err)) => {
                    tracing::warn!(series = %series.key(), error = %err, "series skipped");
                    failed.push(skipped_pair(series, None, &err));
                }
            }
        }
        (measured, failed)
    }

    fn result_order(&self) -> ResultOrder {
        ResultOrder::new(
            self.config.pipeline.country_order.clone(),
            self.registry
                .all_events()
                .iter()
                .map(|event| event.event_id.clone())
                .collect(),
        )
    }
}

fn skipped_pair(series: &Series, event_id: Option<&str>, err: &EngineError) -> SkippedPair {
    SkippedPair {
        country: series.country().to_string(),
        metric_id: series.metric_id().to_string(),
        source_id: series.source_id().to_string(),
        event_id: event_id.map(ToString::to_string),
        reason: err.to_string(),
    }
}
