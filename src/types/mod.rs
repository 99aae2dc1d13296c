//! Type definitions for the Postal send-message API.

pub mod addresses;
pub mod message;
pub mod response;
