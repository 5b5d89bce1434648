use rspotify::ClientError;
use thiserror::Error;

/// Errors raised by the catalog pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Client-credentials exchange failed; fatal for the run
    #[error("Spotify authorization error: {0}")]
    AuthError(String),

    /// Transport-level failure talking to the catalog API
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Catalog body could not be decoded
    #[error("Failed to parse catalog response, error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or invalid settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Database connection or statement failure
    #[error("Storage error: {0}")]
    StorageError(#[from] async_duckdb::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

impl From<ClientError> for Error {
    fn from(err: ClientError) -> Self {
        Error::AuthError(err.to_string())
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_var_is_configuration_error() {
        let err = Error::from(std::env::var("RCATALOG_TEST_UNSET_VARIABLE").unwrap_err());
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[test]
    fn io_error_is_configuration_error() {
        let err = Error::from(std::io::Error::other("read-only file system"));
        assert!(err.to_string().contains("read-only file system"));
    }
}
