//! Text wire format of the realtime chat channel.
//!
//! The channel exchanges bare strings, not structured envelopes:
//!
//! - outbound: `"<recipientId>:<content>"`
//! - inbound: `"From <senderId>: <content>"`
//!
//! Content may itself contain the delimiter sequences; only the first
//! occurrence is structural.

use alumnet_core::UserId;

/// Prefix of every well-formed inbound frame.
const INBOUND_PREFIX: &str = "From ";

/// Delimiter between the inbound sender section and the content.
const INBOUND_DELIMITER: &str = ": ";

/// Parses an inbound frame into sender id and content.
///
/// The content is everything after the first `": "`, preserved verbatim
/// even when it contains further occurrences of the delimiter. Returns
/// `None` for frames without the `"From "` prefix, without a delimiter,
/// or with a non-numeric sender id.
#[must_use]
pub fn parse_inbound(frame: &str) -> Option<(UserId, String)> {
    let rest = frame.strip_prefix(INBOUND_PREFIX)?;
    let (sender, content) = rest.split_once(INBOUND_DELIMITER)?;
    let sender: UserId = sender.parse().ok()?;
    Some((sender, content.to_string()))
}

/// Encodes an outbound frame addressed to `recipient`.
#[must_use]
pub fn encode_outbound(recipient: UserId, content: &str) -> String {
    format!("{recipient}:{content}")
}
