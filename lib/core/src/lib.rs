//! Core domain types and utilities for the alumnet chat client.
//!
//! This crate provides the foundational ID types shared by the
//! conversation, channel, and API crates. Error types are defined
//! per-crate next to the operations that produce them.

pub mod id;

pub use id::{ConnectionId, MessageId, ParseIdError, UserId};
