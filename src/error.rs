use thiserror::Error;

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Transport errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{action} request failed: {message}")]
    Http { action: String, message: String },

    #[error("{action} rejected (retcode {retcode}): {message}")]
    Rejected {
        action: String,
        retcode: i64,
        message: String,
    },

    #[error("{action} returned an unreadable response: {message}")]
    Decode { action: String, message: String },

    #[error("{0} is not supported by this transport")]
    Unsupported(String),
}

impl TransportError {
    pub fn rejected(action: &str, retcode: i64, message: impl Into<String>) -> Self {
        Self::Rejected {
            action: action.to_string(),
            retcode,
            message: message.into(),
        }
    }
}
