//! Error types for mail-ingest.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail provider error: {0}")]
    Mail(#[from] MailError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures talking to the remote mail provider.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Network-level failure before a response was obtained.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Protocol { status: u16, body: String },

    /// The response arrived but could not be decoded (malformed JSON
    /// or malformed base64 payload data).
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Failures writing to a persistence sink.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A store write failed after the data was otherwise valid.
    #[error("{store} write failed: {reason}")]
    Persistence { store: String, reason: String },

    /// A header batch exceeded the store's per-call row ceiling.
    #[error("batch of {got} rows exceeds the {max}-row limit")]
    BatchTooLarge { got: usize, max: usize },
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
