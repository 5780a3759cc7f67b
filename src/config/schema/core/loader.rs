use super::Config;
use super::types::asteroniris_dir;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// Load `~/.asteroniris/recall.toml`, writing the defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let dir = asteroniris_dir();
        let config_path = dir.join("recall.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir).context("Failed to create .asteroniris directory")?;
        }

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let mut config = Self {
                config_path,
                ..Self::default()
            };
            config.save()?;
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load from an explicit path. `~` is expanded; the file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let config_path = PathBuf::from(expanded);

        let contents = fs::read_to_string(&config_path)
            .map_err(ConfigError::from)
            .with_context(|| {
                format!("Failed to read config file {}", config_path.display())
            })?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(e.to_string()))
            .with_context(|| {
                format!("Failed to parse config file {}", config_path.display())
            })?;
        config.config_path = config_path;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.onebot.base_url).map_err(|e| {
            ConfigError::Validation(format!(
                "onebot.base_url '{}' is not a valid URL: {e}",
                self.onebot.base_url
            ))
        })?;
        if self.recall.batch_default_count == 0 {
            return Err(ConfigError::Validation(
                "recall.batch_default_count must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
