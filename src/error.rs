use std::io;

/// Custom error type for discord_build_notifier operations
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Nothing to send: payload has neither content nor an embed")]
    EmptyPayload,

    #[error("Webhook delivery failed{}: {message}", status_suffix(.status))]
    Delivery {
        status: Option<u16>,
        message: String,
    },

    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

impl NotifyError {
    /// HTTP status returned by the webhook, if the failure got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            NotifyError::Delivery { status, .. } => *status,
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (HTTP {})", code))
        .unwrap_or_default()
}

/// Helper type for Results that use NotifyError
pub type Result<T> = std::result::Result<T, NotifyError>;
