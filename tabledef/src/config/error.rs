use thiserror::Error;

/// An enum representing the errors raised while loading a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when the config file cannot be read.
    #[error("Failed to read config file `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Error when the config file is not valid TOML or doesn't match the config shape.
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    /// Error when the config file is not valid JSON or doesn't match the config shape.
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    /// Error when the config file extension is neither `.toml` nor `.json`.
    #[error("Unsupported config format for `{0}`; expected a .toml or .json file")]
    UnsupportedFormat(String),
    /// Error when two merged configs define the same table.
    #[error("Table `{0}` is defined more than once")]
    DuplicateTable(String),
}

/// Config Result type
pub type ConfigResult<T> = Result<T, ConfigError>;
