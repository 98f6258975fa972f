//! Message types for one-to-one conversations.

use alumnet_core::{MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message in a one-to-one conversation.
///
/// History records carry server-assigned identifiers; optimistic and
/// realtime messages get a locally generated timestamp-based one, since
/// the channel's wire format carries no identifier at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Who authored the message.
    pub sender_id: UserId,
    /// Who the message is addressed to.
    pub recipient_id: UserId,
    /// Message content.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
    /// Read receipt flag carried by history records; unused by this core.
    #[serde(default)]
    pub is_read: bool,
}

impl Message {
    /// Creates a locally authored message with a timestamp-based id.
    #[must_use]
    pub fn outgoing(sender_id: UserId, recipient_id: UserId, content: impl Into<String>) -> Self {
        Self::local(sender_id, recipient_id, content)
    }

    /// Creates a message received over the realtime channel.
    ///
    /// The wire format carries neither an id nor a timestamp, so both are
    /// generated locally at receipt time.
    #[must_use]
    pub fn received(sender_id: UserId, recipient_id: UserId, content: impl Into<String>) -> Self {
        Self::local(sender_id, recipient_id, content)
    }

    fn local(sender_id: UserId, recipient_id: UserId, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: MessageId::new(now.timestamp_millis()),
            sender_id,
            recipient_id,
            content: content.into(),
            timestamp: now,
            is_read: false,
        }
    }

    /// Returns true if this message was authored by `user`.
    #[must_use]
    pub fn is_from(&self, user: UserId) -> bool {
        self.sender_id == user
    }
}
