//! Error types for the API parser

use thiserror::Error;

/// Result type alias for parser operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parser error types
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to fetch OpenAPI spec: {0}")]
    FetchError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("Invalid parser configuration: {0}")]
    InvalidConfig(String),

    /// The operation declares none of the probed status codes and no default response
    #[error("No usable response for {method} {endpoint}")]
    MissingResponse { endpoint: String, method: String },
}

impl From<regex::Error> for ParseError {
    fn from(err: regex::Error) -> Self {
        ParseError::InvalidConfig(err.to_string())
    }
}
