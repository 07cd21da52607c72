//! Event registry and metric catalog sources.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// TOML file replacing the builtin event registry. Empty uses the builtin.
    #[serde(default)]
    pub events_file: String,

    /// TOML file replacing the builtin metric catalog. Empty uses the builtin.
    #[serde(default)]
    pub metrics_file: String,
}

impl RegistryConfig {
    #[must_use]
    pub fn events_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.events_file)
    }

    #[must_use]
    pub fn metrics_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.metrics_file)
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
