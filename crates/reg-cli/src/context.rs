use reg_config::RegulaConfig;
use reg_registry::{EventRegistry, MetricCatalog};

use crate::bootstrap;

/// Configuration and reference catalogs shared by every command.
#[derive(Debug)]
pub struct AppContext {
    pub config: RegulaConfig,
    pub registry: EventRegistry,
    pub catalog: MetricCatalog,
}

impl AppContext {
    pub fn init(config: RegulaConfig) -> anyhow::Result<Self> {
        let registry = bootstrap::load_registry(&config)?;
        let catalog = bootstrap::load_catalog(&config)?;
        tracing::debug!(
            events = registry.len(),
            metrics = catalog.len(),
            "reference catalogs loaded"
        );
        Ok(Self {
            config,
            registry,
            catalog,
        })
    }
}
