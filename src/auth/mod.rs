//! Authentication module for the Postal client.
//!
//! Postal authenticates API calls with a static per-server key sent in the
//! `X-Server-API-Key` header.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::config::API_KEY_HEADER;
use crate::errors::{PostalError, PostalResult};

/// Checks that `key` can be sent as the `X-Server-API-Key` header value.
///
/// Only visible ASCII is accepted.
pub(crate) fn validate_api_key(key: &str) -> PostalResult<()> {
    if key.is_empty() {
        return Err(PostalError::configuration("API key cannot be empty"));
    }

    if !key.chars().all(|c| c.is_ascii_graphic()) {
        return Err(PostalError::configuration(
            "API key contains characters that are not valid in a header",
        ));
    }

    Ok(())
}

/// Masks all but the last 4 characters of `key`.
pub(crate) fn key_hint(key: &str) -> String {
    let count = key.chars().count();
    if count > 4 {
        let tail: String = key.chars().skip(count - 4).collect();
        format!("...{}", tail)
    } else {
        "****".to_string()
    }
}

/// Authentication provider trait.
///
/// Implementations of this trait provide authentication credentials
/// for API requests.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the name of the header carrying the credential.
    fn header_name(&self) -> &str;

    /// Validate the credentials.
    fn validate(&self) -> Result<(), PostalError>;
}

/// Server API key authentication provider.
pub struct ServerApiKeyAuth {
    api_key: SecretString,
}

impl ServerApiKeyAuth {
    /// Creates a new API key authentication provider.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    /// Gets a hint of the API key for debugging (last 4 characters).
    pub fn key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

impl AuthProvider for ServerApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            API_KEY_HEADER.to_string(),
            self.api_key.expose_secret().clone(),
        );
    }

    fn header_name(&self) -> &str {
        API_KEY_HEADER
    }

    fn validate(&self) -> Result<(), PostalError> {
        validate_api_key(self.api_key.expose_secret())
    }
}

impl std::fmt::Debug for ServerApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}
