use std::path::Path;

use anyhow::Context;
use reg_config::RegulaConfig;
use reg_registry::{EventRegistry, MetricCatalog};

use crate::cli::GlobalFlags;

/// Load the layered configuration, honouring `.env` and `--config`.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<RegulaConfig> {
    load_project_dotenv()?;

    let config = match &flags.config {
        Some(path) => RegulaConfig::load_from_path(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => RegulaConfig::load().context("failed to load configuration")?,
    };
    tracing::debug!(
        measure = %config.analysis.measure,
        pre_span = config.analysis.pre_span_periods,
        post_span = config.analysis.post_span_periods,
        "configuration loaded"
    );
    Ok(config)
}

/// Event registry from `registry.events_file`, or the builtin one.
pub fn load_registry(config: &RegulaConfig) -> anyhow::Result<EventRegistry> {
    match config.registry.events_path() {
        Some(path) => EventRegistry::from_path(&path)
            .with_context(|| format!("failed to load event registry {}", path.display())),
        None => Ok(EventRegistry::builtin()),
    }
}

/// Metric catalog from `registry.metrics_file`, or the builtin one.
pub fn load_catalog(config: &RegulaConfig) -> anyhow::Result<MetricCatalog> {
    match config.registry.metrics_path() {
        Some(path) => MetricCatalog::from_path(&path)
            .with_context(|| format!("failed to load metric catalog {}", path.display())),
        None => Ok(MetricCatalog::builtin()),
    }
}

fn load_project_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    load_dotenv_from(&cwd)
}

fn load_dotenv_from(dir: &Path) -> anyhow::Result<()> {
    let env_path = dir.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_registry_paths_use_builtins() {
        let config = RegulaConfig::default();
        let registry = load_registry(&config).expect("builtin registry");
        let catalog = load_catalog(&config).expect("builtin catalog");
        assert!(registry.get("gdpr").is_some());
        assert!(!catalog.is_empty());
    }

    #[test]
    fn missing_events_file_names_the_path() {
        let mut config = RegulaConfig::default();
        config.registry.events_file = "/nonexistent/regula/events.toml".into();
        let err = load_registry(&config).expect_err("missing file must fail");
        assert!(format!("{err:#}").contains("/nonexistent/regula/events.toml"));
    }

    #[test]
    fn metrics_file_replaces_builtin_catalog() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
[[metrics]]
metric_id = "fixed_price"
display_unit = "EUR"
expected_frequency = "annual"
higher_is_better = false
"#
        )
        .expect("write metrics");

        let mut config = RegulaConfig::default();
        config.registry.metrics_file = file.path().display().to_string();
        let catalog = load_catalog(&config).expect("catalog loads");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("fixed_price").is_some());
    }

    #[test]
    fn directory_without_dotenv_is_fine() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(load_dotenv_from(dir.path()).is_ok());
    }
}
