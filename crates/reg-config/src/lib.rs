//! # reg-config
//!
//! Layered configuration loading for Regula using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`REGULA_*` prefix, `__` as separator)
//! 2. An explicit file passed to [`RegulaConfig::load_from_path`]
//! 3. Project-level `.regula/config.toml`
//! 4. User-level `~/.config/regula/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `REGULA_ANALYSIS__PRE_SPAN_PERIODS` -> `analysis.pre_span_periods`,
//! `REGULA_PIPELINE__WORKER_THREADS` -> `pipeline.worker_threads`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use reg_config::RegulaConfig;
//!
//! let config = RegulaConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//! println!("pre window: {} periods", config.analysis.pre_span_periods);
//! ```

mod analysis;
mod error;
mod pipeline;
mod registry;
mod resample;

pub use analysis::{AnalysisConfig, Measure};
pub use error::ConfigError;
pub use pipeline::PipelineConfig;
pub use registry::RegistryConfig;
pub use resample::ResampleConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RegulaConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub resample: ResampleConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl RegulaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    /// The result is not validated; call [`Self::validate`] before a run.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load configuration with `path` layered above the discovered TOML files
    /// and below environment variables.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::files_figment()
            .merge(Toml::file(path))
            .merge(Self::env_provider())
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::files_figment().merge(Self::env_provider())
    }

    /// Check every section for values a pipeline run cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        if self
            .pipeline
            .country_order
            .iter()
            .any(|code| code.trim().is_empty())
        {
            return Err(ConfigError::invalid(
                "pipeline.country_order",
                "country codes must not be empty",
            ));
        }
        Ok(())
    }

    fn files_figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".regula/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    fn env_provider() -> Env {
        Env::prefixed("REGULA_").split("__")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("regula").join("config.toml"))
    }
}
