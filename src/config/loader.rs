//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles file discovery,
//! environment detection, and layering with environment variables.

use super::error::{ConfigResult, ConfigurationError};
use super::GarageConfig;
use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const BASE_FILE: &str = "garage.toml";
const ENVIRONMENTS_DIR: &str = "environments";
const ENV_PREFIX: &str = "GARAGE";

/// Loaded configuration together with where it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: GarageConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = crate::logging::get_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_layered(config_dir, environment, None)
    }

    /// Load with `vars` standing in for the process environment.
    ///
    /// Keys use the same `GARAGE__SECTION__FIELD` form as real variables.
    pub fn load_with_env_vars(
        config_dir: Option<PathBuf>,
        environment: &str,
        vars: HashMap<String, String>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_layered(config_dir, environment, Some(vars.into_iter().collect()))
    }

    fn load_layered(
        config_dir: Option<PathBuf>,
        environment: &str,
        env_vars: Option<config::Map<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config = Self::load_layers(&config_directory, environment, env_vars)?;
        config.validate()?;

        crate::log_config!(info, "Configuration loaded successfully",
            environment: environment,
            config_directory: config_directory.display().to_string(),
            seed_records: config.seed.len(),
            mutation_workers: config.runner.mutation_deltas.len()
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Wrap an already-built configuration (tests, embedded use)
    pub fn from_config(config: GarageConfig, environment: &str) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: Self::default_config_directory(),
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &GarageConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// JSON view of the loaded configuration for debugging output
    pub fn debug_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn default_config_directory() -> PathBuf {
        std::env::var("GARAGE_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"))
    }

    fn load_layers(
        config_directory: &Path,
        environment: &str,
        env_vars: Option<config::Map<String, String>>,
    ) -> ConfigResult<GarageConfig> {
        let base_path = config_directory.join(BASE_FILE);
        let override_path = config_directory
            .join(ENVIRONMENTS_DIR)
            .join(format!("{environment}.toml"));

        debug!(
            base = %base_path.display(),
            base_exists = base_path.exists(),
            override_file = %override_path.display(),
            override_exists = override_path.exists(),
            "Resolving configuration layers"
        );

        let settings = Config::builder()
            .add_source(
                File::from(base_path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                File::from(override_path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("runner.mutation_deltas")
                    .source(env_vars),
            )
            .build()
            .map_err(|e| ConfigurationError::load_error(config_directory.display().to_string(), e))?;

        settings.try_deserialize::<GarageConfig>().map_err(|e| {
            ConfigurationError::EnvironmentConfigError {
                environment: environment.to_string(),
                error: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_yields_defaults() {
        let manager = ConfigManager::load_from_directory_with_env(
            Some(PathBuf::from("definitely/not/a/config/dir")),
            "test",
        )
        .expect("missing files are optional");

        assert_eq!(manager.config(), &GarageConfig::default());
        assert_eq!(manager.environment(), "test");
    }

    #[test]
    fn test_from_config_validates() {
        let mut config = GarageConfig::default();
        config.events.channel_capacity = 0;
        assert!(ConfigManager::from_config(config, "test").is_err());
    }

    #[test]
    fn test_debug_config_is_json_object() {
        let manager = ConfigManager::from_config(GarageConfig::default(), "test").unwrap();
        let json = manager.debug_config();
        assert_eq!(json["runner"]["cancel_after_ms"], 2000);
        assert_eq!(json["seed"][0]["model"], "Giant");
    }
}
