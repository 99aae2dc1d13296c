//! Configuration module for the Postal client.
//!
//! Holds the server identity (hostname and API key) along with the few
//! transport settings a caller may tune.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::OnceLock;
use std::time::Duration;

use crate::auth;
use crate::errors::{PostalError, PostalResult};

/// Path of the send-message endpoint on every Postal server.
pub const SEND_MESSAGE_PATH: &str = "/api/v1/send/message";

/// Header carrying the server API key.
pub const API_KEY_HEADER: &str = "X-Server-API-Key";

/// Default maximum number of redirect hops followed per request.
pub const DEFAULT_MAX_REDIRECTS: usize = 2;

fn hostname_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[0-9A-Za-z\-_.]+$").ok())
        .as_ref()
}

/// Returns true if `hostname` is an acceptable Postal server hostname.
pub fn is_valid_hostname(hostname: &str) -> bool {
    hostname_pattern().is_some_and(|pattern| pattern.is_match(hostname))
}

/// Server identity and transport settings.
///
/// Immutable once built. The client shares a single instance with every
/// request it starts.
#[derive(Clone)]
pub struct PostalConfig {
    hostname: String,
    api_key: SecretString,
    /// Base URL requests are sent to, `https://<hostname>` unless overridden.
    pub base_url: String,
    /// Request timeout. `None` leaves the HTTP stack default in place.
    pub timeout: Option<Duration>,
    /// Maximum redirect hops followed transparently.
    pub max_redirects: usize,
}

impl PostalConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> PostalConfigBuilder {
        PostalConfigBuilder::new()
    }

    /// Creates a configuration with default settings.
    pub fn new(hostname: impl Into<String>, api_key: impl Into<String>) -> PostalResult<Self> {
        PostalConfigBuilder::new()
            .hostname(hostname)
            .api_key(api_key)
            .build()
    }

    /// Returns the server hostname.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        auth::key_hint(self.api_key.expose_secret())
    }
}

impl std::fmt::Debug for PostalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostalConfig")
            .field("hostname", &self.hostname)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}

/// Builder for [`PostalConfig`].
#[derive(Default)]
pub struct PostalConfigBuilder {
    hostname: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_redirects: Option<usize>,
}

impl PostalConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server hostname, e.g. `mail.example.com`.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Sets the server API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overrides the base URL derived from the hostname.
    ///
    /// Intended for TLS-terminating proxies and local test servers.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the maximum number of redirect hops.
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = Some(max_redirects);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> PostalResult<PostalConfig> {
        let hostname = self
            .hostname
            .ok_or_else(|| PostalError::configuration("Hostname is required"))?;

        if !is_valid_hostname(&hostname) {
            return Err(PostalError::InvalidHostname { hostname });
        }

        let api_key = self
            .api_key
            .ok_or_else(|| PostalError::configuration("API key is required"))?;

        auth::validate_api_key(&api_key)?;

        let base_url = match self.base_url {
            Some(base_url) => {
                let parsed = url::Url::parse(&base_url)?;
                if !matches!(parsed.scheme(), "https" | "http") {
                    return Err(PostalError::configuration(format!(
                        "Unsupported URL scheme: {}",
                        parsed.scheme()
                    )));
                }
                if parsed.scheme() == "http" {
                    tracing::warn!(%base_url, "Postal base URL is not using HTTPS");
                }
                base_url.trim_end_matches('/').to_string()
            }
            None => format!("https://{}", hostname),
        };

        Ok(PostalConfig {
            hostname,
            api_key: SecretString::new(api_key),
            base_url,
            timeout: self.timeout,
            max_redirects: self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
        })
    }
}
