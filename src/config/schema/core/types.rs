use super::super::{OneBotConfig, RecallConfig};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_locale() -> String {
    "en".into()
}

/// Directory holding `recall.toml`.
pub(super) fn asteroniris_dir() -> PathBuf {
    let home = UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
    home.join(".asteroniris")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to recall.toml - computed from home or `--config`, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub recall: RecallConfig,

    #[serde(default)]
    pub onebot: OneBotConfig,

    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: asteroniris_dir().join("recall.toml"),
            recall: RecallConfig::default(),
            onebot: OneBotConfig::default(),
            locale: default_locale(),
        }
    }
}
