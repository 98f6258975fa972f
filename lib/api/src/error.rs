//! Error types for the API crate.

use std::fmt;

/// Errors from backend REST calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response.
    RequestFailed { reason: String },
    /// The backend answered with a non-success status.
    Status { status: u16 },
    /// The response body did not match the expected schema.
    Decode { reason: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { reason } => {
                write!(f, "request failed: {reason}")
            }
            Self::Status { status } => {
                write!(f, "unexpected status: {status}")
            }
            Self::Decode { reason } => {
                write!(f, "response decode failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
