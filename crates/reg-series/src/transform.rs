//! Derived series: period-over-period growth and cumulative indices.

use reg_core::metric::{GROWTH_SUFFIX, INDEX_SUFFIX, derived_metric_id};
use reg_core::{DataIntegrityError, Observation, QualityFlag, Series, SourceDescriptor};

/// Default starting level for [`cumulative_index`].
pub const DEFAULT_INDEX_BASE: f64 = 100.0;

/// Percentage change between adjacent periods: `(v_t / v_{t-1} - 1) * 100`.
///
/// The output has one observation per input observation after the first. A
/// growth value is missing when either side is missing, when the two periods
/// are not adjacent, or when the previous value is zero.
pub fn growth_rate(series: &Series) -> Result<Series, DataIntegrityError> {
    let descriptor = derived_descriptor(series, GROWTH_SUFFIX);
    let observations = series
        .observations()
        .windows(2)
        .map(|pair| {
            let (prev, current) = (&pair[0], &pair[1]);
            let adjacent = prev.period.next() == current.period;
            let value = match (prev.value, current.value) {
                (Some(before), Some(after)) if adjacent && before != 0.0 => {
                    Some((after / before - 1.0) * 100.0)
                }
                _ => None,
            };
            derived_observation(&descriptor, current, value)
        })
        .collect();
    Series::new(descriptor, observations)
}

/// Compound a growth-rate series into an index starting at `base`.
///
/// Each level is `previous * (1 + growth / 100)`. A missing growth value
/// keeps the previous level.
pub fn cumulative_index(growth: &Series, base: f64) -> Result<Series, DataIntegrityError> {
    let descriptor = derived_descriptor(growth, INDEX_SUFFIX);
    let mut level = base;
    let observations = growth
        .observations()
        .iter()
        .map(|obs| {
            if let Some(rate) = obs.value {
                level *= 1.0 + rate / 100.0;
            }
            let mut derived = derived_observation(&descriptor, obs, Some(level));
            if obs.value.is_none() {
                derived.quality = QualityFlag::CarriedForward;
            }
            derived
        })
        .collect();
    Series::new(descriptor, observations)
}

fn derived_descriptor(series: &Series, suffix: &str) -> SourceDescriptor {
    SourceDescriptor {
        metric_id: derived_metric_id(series.metric_id(), suffix),
        ..series.descriptor().clone()
    }
}

fn derived_observation(
    descriptor: &SourceDescriptor,
    source: &Observation,
    value: Option<f64>,
) -> Observation {
    Observation::new(
        descriptor.country.clone(),
        descriptor.metric_id.clone(),
        descriptor.source_id.clone(),
        source.period,
        value,
    )
    .with_quality(source.quality)
}
