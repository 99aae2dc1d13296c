//! Builders for constructing Postal send-message requests.
//!
//! A [`SendMessageRequest`] is normally started from
//! [`PostalClient`](crate::PostalClient), which pre-populates the first field
//! and binds the request to the client's server identity.

mod send_request;

pub use send_request::SendMessageRequest;
