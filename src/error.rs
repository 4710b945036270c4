//! Error types for the candidate inspector.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Message source errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    /// Transient; the source may deliver again on the next read.
    #[error("Channel {name} disconnected: {reason}")]
    Disconnected { name: String, reason: String },

    /// The subscription cannot recover.
    #[error("Channel {name} failed: {reason}")]
    Fatal { name: String, reason: String },

    #[error("Channel {name} is closed")]
    Closed { name: String },
}

/// Outbound decision delivery errors.
///
/// One variant per step of a delivery so each failure is logged on its own.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to serialize decision: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to build HTTP request to {url}: {source}")]
    BuildRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to send HTTP request to {url}: {source}")]
    Send {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read HTTP response body from {url}: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
