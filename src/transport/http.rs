//! HTTP transport implementation.

use async_trait::async_trait;
use reqwest::{redirect, Client, ClientBuilder};
use std::collections::HashMap;
use std::error::Error as _;
use std::time::Duration;
use tracing::instrument;

use super::TransportError;

/// HTTP request representation.
///
/// The send-message API only accepts POST, so every request is a POST.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request path.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a new POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// HTTP response representation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, fully buffered.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP transport trait.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and buffer the whole response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransportImpl {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpTransportImpl {
    /// Creates a new HTTP transport.
    ///
    /// With `timeout` unset, reqwest's own defaults govern how long a request
    /// may hang.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        max_redirects: usize,
    ) -> Result<Self, TransportError> {
        let mut builder = ClientBuilder::new().redirect(redirect_policy(max_redirects));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| TransportError::Connection {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Builds the full URL for a path.
    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn map_error(&self, e: &reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                timeout: self.timeout.unwrap_or_default(),
            }
        } else if e.is_redirect() {
            TransportError::Redirect {
                message: e.to_string(),
            }
        } else if e.is_connect() {
            if is_tls_failure(e) {
                TransportError::Tls {
                    message: error_chain(e),
                }
            } else {
                TransportError::Connection {
                    message: error_chain(e),
                }
            }
        } else {
            TransportError::InvalidResponse {
                message: e.to_string(),
            }
        }
    }
}

/// Follows up to `max_redirects` hops and fails on the next one.
///
/// `attempt.previous()` holds the original URL plus every URL already
/// redirected from, so its length equals the hop being attempted.
fn redirect_policy(max_redirects: usize) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

/// Joins an error with its sources so the root cause survives into the message.
fn error_chain(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Detects a failed TLS handshake inside a connect error.
///
/// hyper-rustls reports `rustls::Error` wrapped in an `io::Error` of kind
/// `InvalidData`. native-tls (openssl, schannel, security-framework) only
/// exposes text such as "certificate verify failed" or "handshake failure",
/// so the rendered chain is searched as well.
fn is_tls_failure(e: &reqwest::Error) -> bool {
    let mut source = e.source();
    while let Some(cause) = source {
        if cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::InvalidData)
        {
            return true;
        }
        source = cause.source();
    }

    let chain = error_chain(e).to_ascii_lowercase();
    chain.contains("certificate") || chain.contains("tls") || chain.contains("handshake")
}

#[async_trait]
impl HttpTransport for HttpTransportImpl {
    #[instrument(skip(self, request), fields(path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.build_url(&request.path);

        let mut req_builder = self.client.post(&url);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await.map_err(|e| self.map_error(&e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::InvalidResponse {
                message: e.to_string(),
            })?
            .to_vec();

        tracing::debug!(status, body_len = body.len(), "Received response");

        Ok(HttpResponse { status, body })
    }
}

impl std::fmt::Debug for HttpTransportImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportImpl")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_path() {
        let transport = HttpTransportImpl::new("https://mail.example.com", None, 2).unwrap();
        assert_eq!(
            transport.build_url("/api/v1/send/message"),
            "https://mail.example.com/api/v1/send/message"
        );
    }

    #[test]
    fn test_request_builders() {
        let request = HttpRequest::post("/api/v1/send/message")
            .with_header("Content-Type", "application/json")
            .with_body(b"{}".to_vec());

        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }

    async fn redirect_chain(server: &wiremock::MockServer, hops: usize) {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, ResponseTemplate};

        for hop in 0..hops {
            let location = format!("{}/r{}", server.uri(), hop + 1);
            Mock::given(method("POST"))
                .and(path(format!("/r{}", hop)))
                .respond_with(
                    ResponseTemplate::new(307).insert_header("Location", location.as_str()),
                )
                .mount(server)
                .await;
        }
        Mock::given(method("POST"))
            .and(path(format!("/r{}", hops)))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_redirect_policy_allows_exactly_max_hops() {
        let server = wiremock::MockServer::start().await;
        redirect_chain(&server, 3).await;
        let transport = HttpTransportImpl::new(server.uri(), None, 2).unwrap();

        let response = transport.send(HttpRequest::post("/r1")).await.unwrap();
        assert_eq!(response.status, 200);

        let result = transport.send(HttpRequest::post("/r0")).await;
        assert!(matches!(result, Err(TransportError::Redirect { .. })));
    }

    #[test]
    fn test_response_json() {
        let response = HttpResponse {
            status: 200,
            body: br#"{"status":"success"}"#.to_vec(),
        };

        assert!(response.is_success());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["status"], "success");
    }
}
