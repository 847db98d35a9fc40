//! Error types for the smoke runner
//!
//! Failures of individual API calls never surface here; they are recorded in
//! the run report. These errors cover configuration and CLI input.

use thiserror::Error;

use crate::client::ClientError;

/// Main error type for runner setup and CLI operations
#[derive(Error, Debug)]
pub enum SmokeError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration value rejected during validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Configuration file parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialization of output failed
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// HTTP client could not be constructed
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl SmokeError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        SmokeError::InvalidInput(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        SmokeError::ConfigError(msg.into())
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        SmokeError::ParseError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SmokeError::InvalidInput(_)
                | SmokeError::ConfigError(_)
                | SmokeError::FileError(_)
                | SmokeError::ParseError(_)
        )
    }
}

impl From<serde_json::Error> for SmokeError {
    fn from(err: serde_json::Error) -> Self {
        SmokeError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(SmokeError::invalid_input("bad method").is_user_error());
        assert!(SmokeError::config_error("bad url").is_user_error());
        assert!(!SmokeError::SerializationError("oops".into()).is_user_error());
        assert!(!SmokeError::Client(ClientError::Build("tls".into())).is_user_error());
    }
}
