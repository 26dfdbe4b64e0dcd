//! Error types for Lookbook

use thiserror::Error;

/// The main error type for Lookbook operations
#[derive(Debug, Error)]
pub enum LookbookError {
    /// A mode-required input asset has not been uploaded. The payload is the
    /// user-facing message naming the missing asset.
    #[error("{0}")]
    MissingInput(String),

    #[error("Credential error: {0}")]
    CredentialError(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Asset error: {0}")]
    AssetError(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Lookbook operations
pub type Result<T> = std::result::Result<T, LookbookError>;

impl From<toml::de::Error> for LookbookError {
    fn from(err: toml::de::Error) -> Self {
        LookbookError::TomlParseError(err.to_string())
    }
}
