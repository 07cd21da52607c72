//! Frequency conversion with bounded last-observation-carried-forward.
//!
//! Resampling happens in two steps:
//!
//! 1. Values are mapped onto target-frequency buckets. A coarser target
//!    combines members with the metric's [`AggregationKind`]; a finer target
//!    repeats a level value over the periods it contains.
//! 2. The buckets are laid on a regular grid from the first to the last
//!    bucket. Interior runs of missing periods no longer than `max_gap` are
//!    filled with the preceding value (flagged `CarriedForward`); longer runs
//!    stay missing.

use std::collections::BTreeMap;

use reg_core::{
    AggregationKind, Frequency, Observation, Period, QualityFlag, Series, SourceDescriptor,
};

use crate::error::ResampleError;

/// How to resample one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleOptions {
    pub aggregation: AggregationKind,
    /// Longest interior run of missing target periods to carry forward over.
    pub max_gap: u32,
}

impl ResampleOptions {
    #[must_use]
    pub const fn new(aggregation: AggregationKind, max_gap: u32) -> Self {
        Self {
            aggregation,
            max_gap,
        }
    }

    /// Bucketing only; nothing is carried forward.
    #[must_use]
    pub const fn aggregate_only(aggregation: AggregationKind) -> Self {
        Self::new(aggregation, 0)
    }
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self::new(AggregationKind::Mean, 1)
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    value: Option<f64>,
    quality: QualityFlag,
}

/// Resample `series` to `target` frequency.
///
/// The output has strictly increasing, duplicate-free periods at `target`
/// frequency covering the input's span. Summed (flow) series cannot be moved
/// to a finer frequency.
pub fn resample(
    series: &Series,
    target: Frequency,
    options: ResampleOptions,
) -> Result<Series, ResampleError> {
    let source = series.frequency();
    let buckets = if source == target {
        same_frequency(series)
    } else if target.is_coarser_than(source) {
        aggregate(series, target, options.aggregation)
    } else {
        if options.aggregation == AggregationKind::Sum {
            return Err(ResampleError::UnsupportedDisaggregation {
                series: series.key().to_string(),
                from: source,
                to: target,
            });
        }
        expand(series, target)
    };

    let mut grid = regular_grid(&buckets);
    carry_forward(&mut grid, options.max_gap);

    let descriptor = SourceDescriptor {
        frequency: target,
        ..series.descriptor().clone()
    };
    let observations = grid
        .into_iter()
        .map(|(period, slot)| Observation {
            country: descriptor.country.clone(),
            metric_id: descriptor.metric_id.clone(),
            source_id: descriptor.source_id.clone(),
            period,
            value: slot.value,
            quality: slot.quality,
        })
        .collect();

    tracing::trace!(series = %series.key(), from = %source, to = %target, "series resampled");
    Ok(Series::new(descriptor, observations)?)
}

fn same_frequency(series: &Series) -> BTreeMap<Period, Slot> {
    series
        .observations()
        .iter()
        .map(|obs| {
            (
                obs.period,
                Slot {
                    value: obs.value,
                    quality: obs.quality,
                },
            )
        })
        .collect()
}

fn aggregate(
    series: &Series,
    target: Frequency,
    aggregation: AggregationKind,
) -> BTreeMap<Period, Slot> {
    let mut members: BTreeMap<Period, (Vec<f64>, QualityFlag)> = BTreeMap::new();
    for obs in series.observations() {
        let entry = members
            .entry(obs.period.to_frequency(target))
            .or_insert_with(|| (Vec::new(), QualityFlag::Observed));
        if let Some(value) = obs.value {
            entry.0.push(value);
        }
        if entry.1 == QualityFlag::Observed {
            entry.1 = obs.quality;
        }
    }

    let source = series.frequency();
    members
        .into_iter()
        .map(|(bucket, (values, quality))| {
            let complete = values.len() == bucket.sub_periods(source).len();
            let value = match aggregation {
                AggregationKind::Mean => aggregation.combine(&values),
                // A partial flow total would understate the bucket.
                AggregationKind::Sum if complete => aggregation.combine(&values),
                AggregationKind::Sum => None,
            };
            (bucket, Slot { value, quality })
        })
        .collect()
}

fn expand(series: &Series, target: Frequency) -> BTreeMap<Period, Slot> {
    series
        .observations()
        .iter()
        .flat_map(|obs| {
            let slot = Slot {
                value: obs.value,
                quality: obs.quality,
            };
            obs.period
                .sub_periods(target)
                .into_iter()
                .map(move |period| (period, slot))
        })
        .collect()
}

fn regular_grid(buckets: &BTreeMap<Period, Slot>) -> Vec<(Period, Slot)> {
    let (Some((&first, _)), Some((&last, _))) = (buckets.first_key_value(), buckets.last_key_value())
    else {
        return Vec::new();
    };

    let mut grid = Vec::new();
    let mut period = first;
    while period <= last {
        let slot = buckets.get(&period).copied().unwrap_or(Slot {
            value: None,
            quality: QualityFlag::Observed,
        });
        grid.push((period, slot));
        period = period.next();
    }
    grid
}

/// Fill interior missing runs of length `<= max_gap` with the preceding value.
fn carry_forward(grid: &mut [(Period, Slot)], max_gap: u32) {
    if max_gap == 0 {
        return;
    }
    let max_gap = max_gap as usize;
    let mut index = 0;
    while index < grid.len() {
        if grid[index].1.value.is_some() {
            index += 1;
            continue;
        }
        let run_start = index;
        while index < grid.len() && grid[index].1.value.is_none() {
            index += 1;
        }
        let run_len = index - run_start;
        let bounded = run_start > 0 && index < grid.len();
        if bounded && run_len <= max_gap {
            let carried = grid[run_start - 1].1.value;
            for (_, slot) in &mut grid[run_start..index] {
                slot.value = carried;
                slot.quality = QualityFlag::CarriedForward;
            }
        }
    }
}
