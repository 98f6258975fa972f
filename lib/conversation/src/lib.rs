//! Conversation session core for the alumnet chat client.
//!
//! This crate provides:
//!
//! - **Wire format**: parsing and encoding of the chat channel's text frames
//! - **Transcript**: append-only per-peer message history with active-peer state
//! - **Session**: the orchestrator merging optimistic sends, realtime pushes,
//!   and history fetches into one transcript, with request/response fallback

pub mod error;
pub mod message;
pub mod session;
pub mod transcript;
pub mod wire;

pub use error::{DeliveryError, HistoryError};
pub use message::Message;
pub use session::{ChatOutbound, ConversationSession, MessageDelivery, SendOutcome};
pub use transcript::Conversation;
