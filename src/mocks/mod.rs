//! Mock implementations for testing.
//!
//! Provides a mock transport and envelope fixtures for unit testing
//! without reaching a real Postal server.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Mock HTTP transport for testing.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<MockResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path.
    pub path: String,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a 200 response with a JSON body.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        Self {
            status: 200,
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// Creates a response with an arbitrary body.
    pub fn raw(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a response with custom status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.responses).push_back(Ok(response));
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues a transport failure.
    pub fn queue_failure(&self, error: TransportError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Sets the response used once the queue is empty.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_response(&self) -> Result<MockResponse, TransportError> {
        if let Some(next) = lock(&self.responses).pop_front() {
            return next;
        }
        lock(&self.default_response)
            .clone()
            .ok_or_else(|| TransportError::Connection {
                message: "No mock response configured".to_string(),
            })
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            path: request.path,
            body: request.body,
            headers: request.headers,
        });

        let response = self.next_response()?;
        Ok(HttpResponse {
            status: response.status,
            body: response.body,
        })
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Test fixtures for common envelopes.
pub mod fixtures {
    use serde_json::{json, Value};

    /// A success envelope with one receipt per `(address, id, token)`.
    pub fn success_envelope(message_id: &str, receipts: &[(&str, u64, &str)]) -> Value {
        let messages: serde_json::Map<String, Value> = receipts
            .iter()
            .map(|(address, id, token)| {
                ((*address).to_string(), json!({"id": id, "token": token}))
            })
            .collect();

        json!({
            "status": "success",
            "time": 0.12,
            "flags": {},
            "data": {"message_id": message_id, "messages": messages}
        })
    }

    /// An error envelope.
    pub fn error_envelope(code: &str, message: &str) -> Value {
        json!({
            "status": "error",
            "time": 0.01,
            "flags": {},
            "data": {"code": code, "message": message}
        })
    }
}
