//! Per-peer transcript state for a chat view.
//!
//! A [`Conversation`] tracks the currently active peer and the ordered,
//! append-only transcript rendered for them. Exactly one peer is active
//! at a time; transcript order is local append order, never re-sorted by
//! timestamp.

use crate::message::Message;
use crate::wire;
use alumnet_core::UserId;

/// The transcript and active-peer state for one logged-in user.
#[derive(Debug, Clone)]
pub struct Conversation {
    user_id: UserId,
    active_peer: Option<UserId>,
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation state for `user_id`.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            active_peer: None,
            messages: Vec::new(),
        }
    }

    /// The logged-in user who owns this conversation state.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The currently active peer, if any.
    #[must_use]
    pub fn active_peer(&self) -> Option<UserId> {
        self.active_peer
    }

    /// Marks `peer` as the active conversation partner.
    ///
    /// The transcript is left untouched; callers follow up with a history
    /// load to materialize the peer's messages.
    pub fn set_active_peer(&mut self, peer: UserId) {
        self.active_peer = Some(peer);
    }

    /// The rendered transcript, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of transcript messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the transcript is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the last transcript message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Appends a message to the transcript.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the transcript with fetched history for `peer`.
    ///
    /// Stale-response guard: the replacement only happens if `peer` is
    /// still the active peer, so a slow fetch cannot overwrite the
    /// transcript of a later selection. Returns whether the history was
    /// applied.
    pub fn load_history(&mut self, peer: UserId, history: Vec<Message>) -> bool {
        if self.active_peer != Some(peer) {
            tracing::debug!(peer = %peer, "discarding stale history response");
            return false;
        }
        self.messages = history;
        true
    }

    /// Routes an inbound wire frame into the transcript.
    ///
    /// The parsed message is appended only when its sender is the active
    /// peer; frames from other peers and malformed frames are dropped
    /// without error. Returns the appended message, if any.
    pub fn route_inbound(&mut self, frame: &str) -> Option<&Message> {
        let Some((sender, content)) = wire::parse_inbound(frame) else {
            tracing::debug!("ignoring malformed inbound frame");
            return None;
        };
        if self.active_peer != Some(sender) {
            tracing::debug!(sender = %sender, "dropping message from non-active peer");
            return None;
        }
        self.append(Message::received(sender, self.user_id, content));
        self.messages.last()
    }
}
