use super::{
    dataset::{DatasetConfig, ScalingConfig},
    model::ModelConfig,
    schema::SchemaConfig,
    traits::ConfigSection,
    walk_forward::WalkForwardConfig,
};
use crate::error::TrendcastError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment overrides, e.g. `TRENDCAST__DATASET__LOOKBACK=10`
pub const ENV_PREFIX: &str = "TRENDCAST";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub scaling: ScalingConfig,
    #[serde(default)]
    pub walk_forward: WalkForwardConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), TrendcastError> {
        self.schema.validate()?;
        self.dataset.validate()?;
        self.scaling.validate()?;
        self.walk_forward.validate()?;
        self.model.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TrendcastError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TrendcastError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)?;
        self.replace(config)
    }

    /// Load a TOML file and apply `TRENDCAST__SECTION__FIELD` environment overrides on top
    pub fn load_layered<P: AsRef<Path>>(&self, path: P) -> Result<(), TrendcastError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TrendcastError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| TrendcastError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| TrendcastError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Apply `f` to a copy and commit it only if the result validates
    pub fn update<F>(&self, f: F) -> Result<(), TrendcastError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), TrendcastError> {
        config.validate()?;
        log::debug!("Config accepted: {:?}", config);
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelKind;

    #[test]
    fn test_roundtrip_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trendcast.toml");

        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.dataset.lookback = 7;
                c.schema.feature_columns = vec!["close".into(), "rsi_14".into()];
                c.model.kind = ModelKind::Majority;
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get(), manager.get());
    }

    #[test]
    fn test_invalid_update_is_not_committed() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.dataset.train_fraction = 1.0);
        assert!(result.is_err());
        assert_eq!(manager.get().dataset.train_fraction, 0.8);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[dataset]\nlookback = 10\ntrain_fraction = 0.75\n").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        let config = manager.get();
        assert_eq!(config.dataset.lookback, 10);
        assert_eq!(config.walk_forward, WalkForwardConfig::default());
    }

    #[test]
    fn test_layered_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layered.toml");
        std::fs::write(
            &path,
            "[walk_forward]\nn_folds = 4\nparallel = false\nbase_seed = 7\n",
        )
        .unwrap();

        let manager = ConfigManager::new();
        manager.load_layered(&path).unwrap();
        assert_eq!(manager.get().walk_forward.n_folds, 4);
        assert!(!manager.get().walk_forward.parallel);
    }
}
