use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://127.0.0.1:3000".into()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Connection settings for the OneBot v11 HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneBotConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OneBotConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
