//! Messages service.

use std::sync::Arc;
use tracing::instrument;

use crate::auth::AuthProvider;
use crate::config::{PostalConfig, SEND_MESSAGE_PATH};
use crate::errors::{PostalError, PostalResult};
use crate::observability::RequestTimer;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::message::MailMessage;
use crate::types::response::ResponseEnvelope;

/// Performs the single request/response cycle against the send-message
/// endpoint.
pub struct MessagesService {
    config: Arc<PostalConfig>,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl MessagesService {
    /// Creates a new messages service.
    pub fn new(
        config: Arc<PostalConfig>,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            transport,
            auth,
        }
    }

    /// Returns the server identity this service posts to.
    pub fn config(&self) -> &PostalConfig {
        &self.config
    }

    /// Posts `message` and parses the response envelope.
    ///
    /// Makes exactly one attempt. The HTTP status code is not inspected;
    /// the envelope's `status` field carries the outcome.
    #[instrument(skip(self, message), fields(hostname = %self.config.hostname(), recipients = message.to.len() + message.cc.len() + message.bcc.len()))]
    pub async fn perform_request(&self, message: &MailMessage) -> PostalResult<ResponseEnvelope> {
        let http_request = self.build_request(message)?;
        let timer = RequestTimer::new("send_message");

        let response = self.transport.send(http_request).await.map_err(|e| {
            tracing::debug!(error = %e, elapsed_ms = timer.elapsed().as_millis(), "Transport failure");
            PostalError::from(e)
        })?;

        tracing::debug!(
            operation = timer.operation(),
            status = response.status,
            elapsed_ms = timer.elapsed().as_millis(),
            "Send-message request completed"
        );

        Self::parse_response(&response)
    }

    /// Builds an HTTP request.
    fn build_request(&self, message: &MailMessage) -> PostalResult<HttpRequest> {
        let body = serde_json::to_vec(message)?;

        let mut request = HttpRequest::post(SEND_MESSAGE_PATH)
            .with_header("Content-Type", mime::APPLICATION_JSON.as_ref())
            .with_body(body);

        self.auth.apply_auth(&mut request.headers);

        Ok(request)
    }

    /// Parses the HTTP response.
    fn parse_response(response: &HttpResponse) -> PostalResult<ResponseEnvelope> {
        if !response.is_success() {
            tracing::debug!(
                status = response.status,
                "Non-2xx HTTP status, reading envelope from body"
            );
        }

        response.json().map_err(|e| PostalError::Serialization {
            message: format!(
                "Failed to parse response (HTTP {}): {}",
                response.status, e
            ),
        })
    }
}

impl std::fmt::Debug for MessagesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagesService")
            .field("config", &self.config)
            .finish()
    }
}
