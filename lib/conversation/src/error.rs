//! Error types for the conversation crate.
//!
//! - `DeliveryError`: Errors delivering an outbound message
//! - `HistoryError`: Errors materializing a transcript from history

use std::fmt;

/// Errors from outbound message delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The realtime channel is closed or its writer has gone away.
    ChannelClosed,
    /// The request/response fallback send failed.
    RequestFailed { reason: String },
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelClosed => write!(f, "realtime channel is closed"),
            Self::RequestFailed { reason } => {
                write!(f, "fallback send failed: {reason}")
            }
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Errors from history fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The history request failed.
    RequestFailed { reason: String },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { reason } => {
                write!(f, "history fetch failed: {reason}")
            }
        }
    }
}

impl std::error::Error for HistoryError {}
