//! Error types for the channel crate.

use std::fmt;

/// Errors from realtime channel operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Opening the channel failed (connect or handshake).
    ConnectFailed { reason: String },
    /// The channel is closed; the frame was not written.
    Closed,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed { reason } => {
                write!(f, "channel connect failed: {reason}")
            }
            Self::Closed => write!(f, "channel is closed"),
        }
    }
}

impl std::error::Error for ChannelError {}
