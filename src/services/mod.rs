//! Service implementations for the Postal API.

mod messages;

pub use messages::MessagesService;
