//! Error types for the Postal client.
//!
//! Covers every way a send can fail: construction-time hostname checks,
//! misuse of a closed request, missing required fields, structured errors
//! reported by the Postal server, and transport-level failures.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for Postal operations.
pub type PostalResult<T> = Result<T, PostalError>;

/// Error type for Postal client operations.
#[derive(Debug, Error)]
pub enum PostalError {
    /// The server hostname does not match `^[0-9A-Za-z\-_.]+$`.
    #[error("Invalid server hostname '{hostname}': expected something like mail.example.com")]
    InvalidHostname {
        /// The rejected hostname.
        hostname: String,
    },

    /// The request was already sent successfully and can no longer be changed.
    #[error("Request has already been sent; start a new chain from the client to call {operation}()")]
    ClosedRequest {
        /// The builder operation that was attempted.
        operation: &'static str,
    },

    /// Neither `from` nor `sender` was set.
    #[error("from and sender are not defined")]
    MissingSender,

    /// Neither `plain_body` nor `html_body` was set.
    #[error("plain_body and html_body are not defined")]
    MissingBody,

    /// No subject was set.
    #[error("subject is not defined")]
    MissingSubject,

    /// The Postal server answered with an error envelope.
    #[error("[{code}] {message}")]
    Remote {
        /// Error code reported by the server, e.g. `InvalidServerAPIKey`.
        code: String,
        /// Human readable message reported by the server.
        message: String,
    },

    /// Connection, TLS or body read failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Request encoding or response parsing failed.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Configuration error (empty API key, bad base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },
}

impl PostalError {
    /// Returns true for errors raised while materializing the wire record.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PostalError::MissingSender | PostalError::MissingBody | PostalError::MissingSubject
        )
    }

    /// Returns the server error code for [`PostalError::Remote`].
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            PostalError::Remote { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Creates a closed request error for the given operation.
    pub fn closed(operation: &'static str) -> Self {
        PostalError::ClosedRequest { operation }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        PostalError::Configuration {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PostalError {
    fn from(err: serde_json::Error) -> Self {
        PostalError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for PostalError {
    fn from(err: url::ParseError) -> Self {
        PostalError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
