//! Postal API client.
//!
//! Holds the server identity and starts new message requests.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthProvider, ServerApiKeyAuth};
use crate::builders::SendMessageRequest;
use crate::config::{PostalConfig, PostalConfigBuilder};
use crate::errors::{PostalError, PostalResult};
use crate::services::MessagesService;
use crate::transport::{HttpTransport, HttpTransportImpl};
use crate::types::addresses::Addresses;

/// The main Postal client.
///
/// Each of the starter methods (`to`, `cc`, `bcc`, `from`, `sender`, ...)
/// returns a brand new [`SendMessageRequest`] with that one field set. The
/// client itself is never mutated and can be shared across tasks.
///
/// # Example
///
/// ```rust,no_run
/// use integrations_postal::PostalClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PostalClient::new("postal.example.com", "server-api-key")?;
///
///     let mut request = client.from("noreply@example.com");
///     request
///         .to("alice@example.com")?
///         .subject("Your receipt")?
///         .html_body("<p>Thanks for your order.</p>")?;
///
///     let result = request.send().await?;
///     for message in &result.messages {
///         println!("{} -> {}", message.address, message.id);
///     }
///     Ok(())
/// }
/// ```
pub struct PostalClient {
    messages: Arc<MessagesService>,
}

impl PostalClient {
    /// Creates a client for `hostname` authenticated with `api_key`.
    ///
    /// Fails with [`PostalError::InvalidHostname`] unless the hostname
    /// matches `^[0-9A-Za-z\-_.]+$`.
    pub fn new(hostname: impl Into<String>, api_key: impl Into<String>) -> PostalResult<Self> {
        PostalClientBuilder::new()
            .hostname(hostname)
            .api_key(api_key)
            .build()
    }

    /// Creates a new client builder.
    pub fn builder() -> PostalClientBuilder {
        PostalClientBuilder::new()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PostalConfig {
        self.messages.config()
    }

    /// Returns the messages service shared by every request.
    pub fn messages(&self) -> &Arc<MessagesService> {
        &self.messages
    }

    /// Starts an empty request.
    pub fn message(&self) -> SendMessageRequest {
        SendMessageRequest::new(Arc::clone(&self.messages))
    }

    fn start(
        &self,
        first: impl FnOnce(&mut SendMessageRequest) -> PostalResult<&mut SendMessageRequest>,
    ) -> SendMessageRequest {
        let mut request = self.message();
        let outcome = first(&mut request).map(|_| ());
        debug_assert!(outcome.is_ok(), "a new request is always open");
        request
    }

    /// Starts a request with primary recipients.
    pub fn to(&self, addresses: impl Into<Addresses>) -> SendMessageRequest {
        self.start(|r| r.to(addresses))
    }

    /// Starts a request with carbon-copy recipients.
    pub fn cc(&self, addresses: impl Into<Addresses>) -> SendMessageRequest {
        self.start(|r| r.cc(addresses))
    }

    /// Starts a request with blind carbon-copy recipients.
    pub fn bcc(&self, addresses: impl Into<Addresses>) -> SendMessageRequest {
        self.start(|r| r.bcc(addresses))
    }

    /// Starts a request with the from address.
    pub fn from(&self, address: impl Into<String>) -> SendMessageRequest {
        self.start(|r| r.from(address))
    }

    /// Starts a request with the sender address.
    pub fn sender(&self, address: impl Into<String>) -> SendMessageRequest {
        self.start(|r| r.sender(address))
    }

    /// Starts a request with the subject.
    pub fn subject(&self, text: impl Into<String>) -> SendMessageRequest {
        self.start(|r| r.subject(text))
    }

    /// Starts a request with a Postal tag.
    pub fn tag(&self, text: impl Into<String>) -> SendMessageRequest {
        self.start(|r| r.tag(text))
    }

    /// Starts a request with the Reply-To address.
    pub fn reply_to(&self, address: impl Into<String>) -> SendMessageRequest {
        self.start(|r| r.reply_to(address))
    }

    /// Starts a request with the plain text body.
    pub fn plain_body(&self, body: impl Into<String>) -> SendMessageRequest {
        self.start(|r| r.plain_body(body))
    }

    /// Starts a request with the HTML body.
    pub fn html_body(&self, body: impl Into<String>) -> SendMessageRequest {
        self.start(|r| r.html_body(body))
    }

    /// Starts a request with one base64 encoded attachment.
    pub fn attachment(
        &self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        base64_data: impl Into<String>,
    ) -> SendMessageRequest {
        self.start(|r| r.attachment(filename, content_type, base64_data))
    }
}

impl std::fmt::Debug for PostalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostalClient")
            .field("config", self.config())
            .finish()
    }
}

/// Builder for the Postal client.
pub struct PostalClientBuilder {
    config_builder: PostalConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl PostalClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: PostalConfigBuilder::new(),
            transport: None,
            auth: None,
        }
    }

    /// Sets the server hostname.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.hostname(hostname);
        self
    }

    /// Sets the server API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Overrides the base URL derived from the hostname.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the maximum number of redirect hops.
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config_builder = self.config_builder.max_redirects(max_redirects);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the client.
    pub fn build(self) -> PostalResult<PostalClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout, config.max_redirects)
                    .map_err(|e| PostalError::configuration(e.to_string()))?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ServerApiKeyAuth::from_string(config.api_key())),
        };
        auth.validate()?;

        tracing::debug!(
            hostname = config.hostname(),
            key_hint = %config.api_key_hint(),
            "Postal client configured"
        );

        let messages = Arc::new(MessagesService::new(Arc::new(config), transport, auth));

        Ok(PostalClient { messages })
    }
}

impl Default for PostalClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
