//! Integration tests using WireMock
//!
//! These tests drive the real reqwest transport against a local mock
//! server, covering the full request/response cycle: headers, body,
//! redirects, envelope parsing and error propagation.

mod send_message;
mod transport;

use integrations_postal::{PostalClient, SendMessageRequest};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-server-key";
pub const SEND_PATH: &str = "/api/v1/send/message";

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at `base_url` instead of `https://<hostname>`.
pub fn client_for(base_url: &str) -> PostalClient {
    PostalClient::builder()
        .hostname("postal.example.com")
        .api_key(API_KEY)
        .base_url(base_url)
        .build()
        .expect("Failed to build client")
}

/// A request with every required field set.
pub fn valid_request(client: &PostalClient) -> SendMessageRequest {
    let mut request = client.to("a@b.com");
    request
        .from("noreply@example.com")
        .and_then(|r| r.subject("Hello"))
        .and_then(|r| r.plain_body("Hi there"))
        .expect("Failed to build request");
    request
}

/// Mock matching an authenticated send-message call
pub fn authenticated_send() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(header("X-Server-API-Key", API_KEY))
        .and(header("Content-Type", "application/json"))
}

/// Helper to create success response templates
pub fn success_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// A success envelope for a single recipient.
pub fn single_recipient_success() -> Value {
    json!({
        "status": "success",
        "time": 0.25,
        "flags": {},
        "data": {
            "message_id": "m1",
            "messages": {"a@b.com": {"id": 1, "token": "t1"}}
        }
    })
}
