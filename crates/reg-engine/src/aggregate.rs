//! Result Aggregator: comparison tables over impact results.

use std::collections::{BTreeMap, HashMap};

use reg_core::{ComparisonGroup, ComparisonTable, GroupBy, GroupKey, ImpactResult};

/// Row and group ordering for a run.
///
/// Countries follow `country_order` (case-insensitive), then unlisted
/// countries in order of first appearance. Events follow `event_order`
/// (chronological registry order), then unlisted ones by first appearance.
/// Metrics always follow first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultOrder {
    pub country_order: Vec<String>,
    pub event_order: Vec<String>,
}

impl ResultOrder {
    #[must_use]
    pub const fn new(country_order: Vec<String>, event_order: Vec<String>) -> Self {
        Self {
            country_order,
            event_order,
        }
    }

    /// Sort `results` by (country, metric, event, source).
    pub fn sort(&self, results: &mut [ImpactResult]) {
        let ranks = Ranks::new(results, self);
        results.sort_by_cached_key(|result| {
            let rank = ranks.of(result);
            (rank.country, rank.metric, rank.event, result.source_id.clone())
        });
    }
}

#[derive(Debug, Clone, Copy)]
struct Rank {
    country: usize,
    metric: usize,
    event: usize,
}

struct Ranks {
    country: HashMap<String, usize>,
    metric: HashMap<String, usize>,
    event: HashMap<String, usize>,
}

impl Ranks {
    fn new(results: &[ImpactResult], order: &ResultOrder) -> Self {
        let mut country = seeded(order.country_order.iter().map(|c| c.to_ascii_uppercase()));
        let mut metric = HashMap::new();
        let mut event = seeded(order.event_order.iter().cloned());

        for result in results {
            append(&mut country, result.country.to_ascii_uppercase());
            append(&mut metric, result.metric_id.clone());
            append(&mut event, result.event_id.clone());
        }
        Self {
            country,
            metric,
            event,
        }
    }

    fn of(&self, result: &ImpactResult) -> Rank {
        let lookup = |map: &HashMap<String, usize>, key: &str| {
            map.get(key).copied().unwrap_or(usize::MAX)
        };
        Rank {
            country: lookup(&self.country, &result.country.to_ascii_uppercase()),
            metric: lookup(&self.metric, &result.metric_id),
            event: lookup(&self.event, &result.event_id),
        }
    }
}

fn seeded(keys: impl Iterator<Item = String>) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for key in keys {
        append(&mut map, key);
    }
    map
}

type RowKey = ((usize, usize), String);

fn append(map: &mut HashMap<String, usize>, key: String) {
    let next = map.len();
    map.entry(key).or_insert(next);
}

/// Group `results` into a [`ComparisonTable`].
///
/// Every result is kept, including `insufficient_data` ones. Groups and the
/// rows inside each group are ordered by the dimensions of `group_by`:
///
/// | `group_by`     | groups by        | rows by           |
/// |----------------|------------------|-------------------|
/// | `metric_event` | metric, event    | country           |
/// | `metric`       | metric           | event, country    |
/// | `event`        | event            | metric, country   |
/// | `country`      | country          | event, metric     |
#[must_use]
pub fn aggregate(
    results: &[ImpactResult],
    group_by: GroupBy,
    order: &ResultOrder,
) -> ComparisonTable {
    let ranks = Ranks::new(results, order);
    let mut groups: BTreeMap<(usize, usize), (GroupKey, Vec<(RowKey, ImpactResult)>)> =
        BTreeMap::new();

    for result in results {
        let rank = ranks.of(result);
        let (group_rank, row_rank) = match group_by {
            GroupBy::MetricEvent => ((rank.metric, rank.event), (rank.country, 0)),
            GroupBy::Metric => ((rank.metric, 0), (rank.event, rank.country)),
            GroupBy::Event => ((rank.event, 0), (rank.metric, rank.country)),
            GroupBy::Country => ((rank.country, 0), (rank.event, rank.metric)),
        };
        groups
            .entry(group_rank)
            .or_insert_with(|| (GroupKey::for_result(result, group_by), Vec::new()))
            .1
            .push(((row_rank, result.source_id.clone()), result.clone()));
    }

    let groups = groups
        .into_values()
        .map(|(key, mut rows)| {
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            ComparisonGroup {
                key,
                results: rows.into_iter().map(|(_, result)| result).collect(),
            }
        })
        .collect();

    ComparisonTable { group_by, groups }
}
