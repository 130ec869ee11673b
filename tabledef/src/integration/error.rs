use thiserror::Error;

use crate::config::ConfigError;

/// An enum representing the errors raised by integrations.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// Error returned by the setup hook of an integration.
    #[error("Integration `{integration}` failed to set up: {message}")]
    Setup {
        integration: String,
        message: String,
    },
    /// Error when an entrypoint is neither a path nor a `file:` URL.
    #[error("Unsupported entrypoint `{0}`; expected a path or a file: URL")]
    UnsupportedEntrypoint(String),
    /// Error when the config registered by an integration cannot be loaded or merged.
    #[error("Invalid config from integration `{integration}`: {source}")]
    Config {
        integration: String,
        source: ConfigError,
    },
}

/// Integration Result type
pub type IntegrationResult<T> = Result<T, IntegrationError>;
