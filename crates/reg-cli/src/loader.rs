//! JSONL observation files.
//!
//! One [`Observation`] per line, in the JSON shape the core types serialize
//! to. Rows are grouped per (country, metric, source) in order of first
//! appearance and handed to the store through [`SeriesLoader`].

use std::collections::HashMap;
use std::path::Path;

use reg_core::{Observation, SeriesKey, SkippedPair, SourceDescriptor};
use reg_series::{LoaderError, SeriesLoader, SeriesStore, StoreError, group_by_series};

/// Observations read from one JSONL file.
#[derive(Debug, Default)]
pub struct JsonlLoader {
    descriptors: Vec<SourceDescriptor>,
    rows: HashMap<SeriesKey, Vec<Observation>>,
}

impl JsonlLoader {
    pub fn open(path: &Path) -> Result<Self, LoaderError> {
        let observations = serde_jsonlines::json_lines::<Observation, _>(path)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| LoaderError::Parse(format!("{}: {err}", path.display())))?;

        let mut loader = Self::default();
        for (descriptor, rows) in group_by_series(observations) {
            loader.rows.insert(descriptor.key(), rows);
            loader.descriptors.push(descriptor);
        }
        tracing::debug!(
            path = %path.display(),
            series = loader.descriptors.len(),
            "observation file read"
        );
        Ok(loader)
    }

    /// Series found in the file, in order of first appearance.
    pub fn descriptors(&self) -> &[SourceDescriptor] {
        &self.descriptors
    }
}

impl SeriesLoader for JsonlLoader {
    fn fetch(&self, descriptor: &SourceDescriptor) -> Result<Vec<Observation>, LoaderError> {
        self.rows
            .get(&descriptor.key())
            .cloned()
            .ok_or_else(|| LoaderError::no_data(descriptor))
    }
}

/// A populated store plus the series rejected while loading it.
#[derive(Debug)]
pub struct LoadedInput {
    pub store: SeriesStore,
    pub rejected: Vec<SkippedPair>,
}

/// Read `path` into a [`SeriesStore`].
///
/// A series that fails validation is rejected on its own; the others still
/// load. Only an unreadable or unparseable file is an error.
pub fn load_input(path: &Path) -> Result<LoadedInput, LoaderError> {
    let loader = JsonlLoader::open(path)?;
    let mut store = SeriesStore::new();
    let mut rejected = Vec::new();

    for descriptor in loader.descriptors() {
        match store.load(&loader, descriptor) {
            Ok(_) => {}
            Err(StoreError::Loader(err)) => return Err(err),
            Err(err) => {
                tracing::warn!(series = %descriptor.key(), error = %err, "series rejected");
                rejected.push(SkippedPair {
                    country: descriptor.country.clone(),
                    metric_id: descriptor.metric_id.clone(),
                    source_id: descriptor.source_id.clone(),
                    event_id: None,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(LoadedInput { store, rejected })
}
