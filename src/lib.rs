//! Postal Client Library
//!
//! A Rust client for the send-message API of a [Postal](https://docs.postalserver.io)
//! mail server. Messages are assembled with a fluent request builder and
//! submitted as a single JSON POST to `/api/v1/send/message`.
//!
//! # Features
//!
//! - **Fluent builder**: recipients, bodies, tag, reply-to and attachments
//! - **Validation**: missing sender, body or subject are reported before any I/O
//! - **Typed results**: per-recipient message ids and tokens, in server order
//! - **Typed errors**: server error codes surface as [`PostalError::Remote`]
//! - **Single attempt**: no hidden retries; retry policy belongs to the caller
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_postal::PostalClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PostalClient::new("postal.example.com", "server-api-key")?;
//!
//!     let mut request = client.to(["alice@example.com", "bob@example.com"]);
//!     request
//!         .from("Example <noreply@example.com>")?
//!         .subject("Hello from Postal")?
//!         .plain_body("Hi there!")?
//!         .attachment_bytes("hello.txt", "text/plain", b"hello")?;
//!
//!     let result = request.send().await?;
//!     println!("message {} took {}s", result.id, result.time);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod builders;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use builders::SendMessageRequest;
pub use client::{PostalClient, PostalClientBuilder};
pub use config::PostalConfig;
pub use errors::{PostalError, PostalResult};
pub use transport::TransportError;

// Type re-exports
pub use types::addresses::Addresses;
pub use types::message::{MailAttachment, MailMessage};
pub use types::response::{
    ErrorPayload, MailResult, MailResultMessage, MessageReceipt, ResponseData, ResponseEnvelope,
    ResponseStatus, SuccessPayload,
};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
