//! Loader collaborator boundary.
//!
//! Parsing OECD/UN/Eurostat exports into [`Observation`]s happens outside the
//! store. A loader hands back observations for one [`SourceDescriptor`] in the
//! order the source listed them; validation is the store's job.

use std::collections::HashMap;

use reg_core::{Observation, SeriesKey, SourceDescriptor};

use crate::error::LoaderError;

/// Supplies parsed observations for a series.
pub trait SeriesLoader {
    /// Observations for `descriptor`, in source order.
    fn fetch(&self, descriptor: &SourceDescriptor) -> Result<Vec<Observation>, LoaderError>;
}

/// Loader over observations already held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLoader {
    data: HashMap<SeriesKey, Vec<Observation>>,
}

impl InMemoryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register observations for `descriptor`, replacing earlier ones.
    #[must_use]
    pub fn with(mut self, descriptor: &SourceDescriptor, observations: Vec<Observation>) -> Self {
        self.data.insert(descriptor.key(), observations);
        self
    }

    pub fn insert(&mut self, descriptor: &SourceDescriptor, observations: Vec<Observation>) {
        self.data.insert(descriptor.key(), observations);
    }
}

impl SeriesLoader for InMemoryLoader {
    fn fetch(&self, descriptor: &SourceDescriptor) -> Result<Vec<Observation>, LoaderError> {
        self.data
            .get(&descriptor.key())
            .cloned()
            .ok_or_else(|| LoaderError::no_data(descriptor))
    }
}

/// Split a flat list of observations into per-series groups.
///
/// Groups appear in order of first appearance and each keeps its rows in
/// input order, so ordering problems still surface at load time. The
/// descriptor frequency is taken from a group's first observation.
#[must_use]
pub fn group_by_series(
    observations: Vec<Observation>,
) -> Vec<(SourceDescriptor, Vec<Observation>)> {
    let mut index: HashMap<SeriesKey, usize> = HashMap::new();
    let mut groups: Vec<(SourceDescriptor, Vec<Observation>)> = Vec::new();

    for obs in observations {
        let key = SeriesKey {
            country: obs.country.clone(),
            metric_id: obs.metric_id.clone(),
            source_id: obs.source_id.clone(),
        };
        if let Some(&position) = index.get(&key) {
            groups[position].1.push(obs);
        } else {
            let descriptor = SourceDescriptor::new(
                &obs.country,
                &obs.metric_id,
                &obs.source_id,
                obs.period.frequency(),
            );
            index.insert(key, groups.len());
            groups.push((descriptor, vec![obs]));
        }
    }

    groups
}
