//! Error handling for the reputation engine.

use thiserror::Error;

/// Main error type for the reputation engine
#[derive(Debug, Error)]
pub enum Error {
    /// Network or HTTP failure talking to a data provider
    #[error("Provider {provider} unavailable: {message}")]
    ProviderUnavailable { provider: &'static str, message: String },

    /// Provider answered with a payload we could not interpret
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: &'static str, message: String },

    /// Failure raised outside the adapters while computing a score.
    /// Never conflated with a zero score.
    #[error("Aggregation failed: {0}")]
    AggregationFailure(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid argument errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    /// Classify a transport error from `provider`. Body decoding failures are
    /// reported as malformed payloads, everything else as unavailability.
    pub fn from_transport(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::MalformedResponse { provider, message: err.to_string() }
        } else {
            Error::ProviderUnavailable { provider, message: err.to_string() }
        }
    }

    /// True for the two failure kinds adapters absorb into zeroed summaries.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Error::ProviderUnavailable { .. } | Error::MalformedResponse { .. })
    }
}

/// Result type for the reputation engine
pub type Result<T> = std::result::Result<T, Error>;

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::ConfigError(format!("invalid url: {}", err))
    }
}
