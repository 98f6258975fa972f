//! REST client for the alumnet backend.
//!
//! This crate covers the request/response collaborators of the chat
//! core: the directory service (connections and profile names) and the
//! durable side of message delivery (history fetch and fallback send).
//! It implements the conversation crate's [`MessageDelivery`] port.
//!
//! [`MessageDelivery`]: alumnet_conversation::MessageDelivery

pub mod client;
pub mod directory;
pub mod error;

pub use client::{ApiClient, Connection, Profile};
pub use directory::Peer;
pub use error::ApiError;
