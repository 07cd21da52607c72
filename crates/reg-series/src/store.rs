use std::collections::HashMap;

use reg_core::{DataIntegrityError, Frequency, Series, SeriesKey, SourceDescriptor};

use crate::error::{ResampleError, StoreError};
use crate::loader::SeriesLoader;
use crate::resample::{ResampleOptions, resample};

/// In-memory owner of every loaded series.
///
/// Series are kept in load order. When several sources provide the same
/// (country, metric), the first one loaded is the primary source returned by
/// [`SeriesStore::get`].
#[derive(Debug, Default)]
pub struct SeriesStore {
    series: Vec<Series>,
    by_key: HashMap<SeriesKey, usize>,
    primary: HashMap<(String, String), usize>,
}

impl SeriesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch observations for `descriptor` from `loader`, validate, and store.
    ///
    /// Fails with [`StoreError::Integrity`] on duplicate or non-monotonic
    /// timestamps; nothing is dropped or reordered.
    pub fn load<L>(
        &mut self,
        loader: &L,
        descriptor: &SourceDescriptor,
    ) -> Result<&Series, StoreError>
    where
        L: SeriesLoader + ?Sized,
    {
        let observations = loader.fetch(descriptor)?;
        let series = Series::new(descriptor.clone(), observations)?;
        self.insert(series)
    }

    /// Store an already-validated series.
    pub fn insert(&mut self, series: Series) -> Result<&Series, StoreError> {
        let key = series.key();
        if self.by_key.contains_key(&key) {
            return Err(DataIntegrityError::AlreadyLoaded {
                series: key.to_string(),
            }
            .into());
        }

        let position = self.series.len();
        tracing::debug!(series = %key, observations = series.len(), "series loaded");
        self.primary
            .entry((key.country.clone(), key.metric_id.clone()))
            .or_insert(position);
        self.by_key.insert(key, position);
        self.series.push(series);
        Ok(&self.series[position])
    }

    /// Primary-source series for (country, metric).
    pub fn get(&self, country: &str, metric_id: &str) -> Result<&Series, StoreError> {
        self.primary
            .get(&(country.to_string(), metric_id.to_string()))
            .map(|&position| &self.series[position])
            .ok_or_else(|| StoreError::NotFound {
                country: country.to_string(),
                metric_id: metric_id.to_string(),
            })
    }

    /// Series for (country, metric) from a specific source.
    pub fn get_from(
        &self,
        country: &str,
        metric_id: &str,
        source_id: &str,
    ) -> Result<&Series, StoreError> {
        let key = SeriesKey {
            country: country.to_string(),
            metric_id: metric_id.to_string(),
            source_id: source_id.to_string(),
        };
        self.by_key
            .get(&key)
            .map(|&position| &self.series[position])
            .ok_or_else(|| StoreError::NotFound {
                country: country.to_string(),
                metric_id: metric_id.to_string(),
            })
    }

    /// All series, in load order.
    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Resample `series` to `target`. See [`crate::resample()`].
    pub fn resample(
        &self,
        series: &Series,
        target: Frequency,
        options: ResampleOptions,
    ) -> Result<Series, ResampleError> {
        resample(series, target, options)
    }
}
