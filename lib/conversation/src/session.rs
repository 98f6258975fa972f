//! The conversation session orchestrator.
//!
//! [`ConversationSession`] merges three message sources into one
//! transcript: optimistic local sends, realtime pushes from the channel,
//! and history fetches on peer selection. Outbound delivery prefers the
//! realtime channel and degrades to a request/response call when the
//! channel is unavailable; the two paths are mutually exclusive per send
//! and nothing is retried automatically.

use crate::error::{DeliveryError, HistoryError};
use crate::message::Message;
use crate::transcript::Conversation;
use crate::wire;
use alumnet_core::UserId;
use async_trait::async_trait;
use std::sync::Arc;

/// Request/response port to the chat backend.
///
/// Covers the durable side of delivery: history materialization and the
/// fallback send used when the realtime channel is closed.
#[async_trait]
pub trait MessageDelivery: Send + Sync {
    /// Fetches the full history with `peer`, chronologically ascending.
    async fn history(&self, peer: UserId) -> Result<Vec<Message>, HistoryError>;

    /// Delivers one message via the request/response path.
    async fn send(&self, recipient: UserId, content: &str) -> Result<(), DeliveryError>;
}

/// Write half of the realtime channel.
#[async_trait]
pub trait ChatOutbound: Send + Sync {
    /// Whether the channel is currently open for writes.
    fn is_open(&self) -> bool;

    /// Writes one pre-encoded wire frame, fire-and-forget.
    async fn send_frame(&self, frame: String) -> Result<(), DeliveryError>;
}

/// Which path carried (or skipped) a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Written to the open realtime channel.
    Channel,
    /// Delivered via the request/response fallback.
    Fallback,
    /// No-op: empty text or no active peer.
    Skipped,
}

/// One user's live conversation session.
pub struct ConversationSession {
    conversation: Conversation,
    delivery: Arc<dyn MessageDelivery>,
    outbound: Option<Arc<dyn ChatOutbound>>,
}

impl ConversationSession {
    /// Creates a session for `user_id` with no realtime channel attached.
    #[must_use]
    pub fn new(user_id: UserId, delivery: Arc<dyn MessageDelivery>) -> Self {
        Self {
            conversation: Conversation::new(user_id),
            delivery,
            outbound: None,
        }
    }

    /// Attaches the realtime channel's write half.
    pub fn attach_channel(&mut self, outbound: Arc<dyn ChatOutbound>) {
        self.outbound = Some(outbound);
    }

    /// Detaches the realtime channel; subsequent sends use the fallback.
    pub fn detach_channel(&mut self) {
        self.outbound = None;
    }

    /// The transcript and active-peer state.
    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Routes an inbound wire frame into the transcript.
    ///
    /// Frames from non-active peers and malformed frames are dropped
    /// silently. Returns the appended message, if any.
    pub fn handle_inbound(&mut self, frame: &str) -> Option<&Message> {
        self.conversation.route_inbound(frame)
    }

    /// Sends `text` to the active peer.
    ///
    /// The optimistic transcript append happens before any network
    /// attempt and is never rolled back, not even when the fallback send
    /// fails. Exactly one delivery path is attempted per call.
    pub async fn send(&mut self, text: &str) -> Result<SendOutcome, DeliveryError> {
        let content = text.trim();
        if content.is_empty() {
            return Ok(SendOutcome::Skipped);
        }
        let Some(peer) = self.conversation.active_peer() else {
            return Ok(SendOutcome::Skipped);
        };

        self.conversation
            .append(Message::outgoing(self.conversation.user_id(), peer, content));

        match self.outbound.as_ref().filter(|ch| ch.is_open()) {
            Some(channel) => {
                channel
                    .send_frame(wire::encode_outbound(peer, content))
                    .await?;
                Ok(SendOutcome::Channel)
            }
            None => {
                self.delivery.send(peer, content).await.map_err(|e| {
                    tracing::warn!(peer = %peer, error = %e, "fallback send failed");
                    e
                })?;
                Ok(SendOutcome::Fallback)
            }
        }
    }

    /// Makes `peer` the active conversation and loads their history.
    ///
    /// On success the transcript is replaced with the fetched sequence,
    /// unless the active peer changed while the fetch was outstanding.
    /// On failure the prior transcript is left untouched.
    pub async fn select_peer(&mut self, peer: UserId) -> Result<(), HistoryError> {
        self.conversation.set_active_peer(peer);
        let history = self.delivery.history(peer).await.map_err(|e| {
            tracing::warn!(peer = %peer, error = %e, "history fetch failed");
            e
        })?;
        self.conversation.load_history(peer, history);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alumnet_core::MessageId;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct MockDelivery {
        history: Mutex<Vec<Message>>,
        sends: Mutex<Vec<(UserId, String)>>,
        fail_sends: AtomicBool,
        fail_history: AtomicBool,
    }

    impl MockDelivery {
        fn with_history(history: Vec<Message>) -> Self {
            Self {
                history: Mutex::new(history),
                ..Self::default()
            }
        }

        fn sends(&self) -> Vec<(UserId, String)> {
            self.sends.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageDelivery for MockDelivery {
        async fn history(&self, _peer: UserId) -> Result<Vec<Message>, HistoryError> {
            if self.fail_history.load(Ordering::SeqCst) {
                return Err(HistoryError::RequestFailed {
                    reason: "boom".to_string(),
                });
            }
            Ok(self.history.lock().unwrap().clone())
        }

        async fn send(&self, recipient: UserId, content: &str) -> Result<(), DeliveryError> {
            self.sends
                .lock()
                .unwrap()
                .push((recipient, content.to_string()));
            if self.fail_sends.load(Ordering::SeqCst) {
                return Err(DeliveryError::RequestFailed {
                    reason: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockChannel {
        open: AtomicBool,
        frames: Mutex<Vec<String>>,
    }

    impl MockChannel {
        fn open() -> Self {
            let channel = Self::default();
            channel.open.store(true, Ordering::SeqCst);
            channel
        }

        fn frames(&self) -> Vec<String> {
            self.frames.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatOutbound for MockChannel {
        fn is_open(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }

        async fn send_frame(&self, frame: String) -> Result<(), DeliveryError> {
            self.frames.lock().unwrap().push(frame);
            Ok(())
        }
    }

    fn history_message(id: i64, sender: i64, recipient: i64, content: &str) -> Message {
        Message {
            id: MessageId::new(id),
            sender_id: UserId::new(sender),
            recipient_id: UserId::new(recipient),
            content: content.to_string(),
            timestamp: Utc::now(),
            is_read: false,
        }
    }

    #[tokio::test]
    async fn send_over_open_channel_writes_one_frame_and_no_fallback() {
        let delivery = Arc::new(MockDelivery::default());
        let channel = Arc::new(MockChannel::open());
        let mut session = ConversationSession::new(UserId::new(1), delivery.clone());
        session.attach_channel(channel.clone());
        session.conversation.set_active_peer(UserId::new(2));

        let outcome = session.send("hello").await.expect("send");

        assert_eq!(outcome, SendOutcome::Channel);
        assert_eq!(channel.frames(), vec!["2:hello".to_string()]);
        assert!(delivery.sends().is_empty());
    }

    #[tokio::test]
    async fn send_without_channel_uses_fallback_exactly_once() {
        let delivery = Arc::new(MockDelivery::default());
        let mut session = ConversationSession::new(UserId::new(1), delivery.clone());
        session.conversation.set_active_peer(UserId::new(2));

        let outcome = session.send("hello").await.expect("send");

        assert_eq!(outcome, SendOutcome::Fallback);
        assert_eq!(delivery.sends(), vec![(UserId::new(2), "hello".to_string())]);
    }

    #[tokio::test]
    async fn closed_channel_behaves_like_no_channel() {
        let delivery = Arc::new(MockDelivery::default());
        let channel = Arc::new(MockChannel::default());
        let mut session = ConversationSession::new(UserId::new(1), delivery.clone());
        session.attach_channel(channel.clone());
        session.conversation.set_active_peer(UserId::new(2));

        let outcome = session.send("hello").await.expect("send");

        assert_eq!(outcome, SendOutcome::Fallback);
        assert!(channel.frames().is_empty());
        assert_eq!(delivery.sends().len(), 1);
    }

    #[tokio::test]
    async fn optimistic_append_happens_before_delivery_resolves() {
        let delivery = Arc::new(MockDelivery::default());
        delivery.fail_sends.store(true, Ordering::SeqCst);
        let mut session = ConversationSession::new(UserId::new(1), delivery.clone());
        session.conversation.set_active_peer(UserId::new(2));

        let result = session.send("hello").await;

        // Delivery failed, but the optimistic message stays.
        assert!(result.is_err());
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation().messages()[0].content, "hello");
        assert!(session.conversation().messages()[0].is_from(UserId::new(1)));
    }

    #[tokio::test]
    async fn empty_or_whitespace_send_is_a_no_op() {
        let delivery = Arc::new(MockDelivery::default());
        let mut session = ConversationSession::new(UserId::new(1), delivery.clone());
        session.conversation.set_active_peer(UserId::new(2));

        assert_eq!(session.send("").await.expect("send"), SendOutcome::Skipped);
        assert_eq!(
            session.send("   ").await.expect("send"),
            SendOutcome::Skipped
        );
        assert!(session.conversation().is_empty());
        assert!(delivery.sends().is_empty());
    }

    #[tokio::test]
    async fn send_without_active_peer_is_a_no_op() {
        let delivery = Arc::new(MockDelivery::default());
        let mut session = ConversationSession::new(UserId::new(1), delivery.clone());

        assert_eq!(
            session.send("hello").await.expect("send"),
            SendOutcome::Skipped
        );
        assert!(session.conversation().is_empty());
    }

    #[tokio::test]
    async fn select_peer_replaces_transcript_with_history() {
        let delivery = Arc::new(MockDelivery::with_history(vec![history_message(
            10, 2, 1, "hi",
        )]));
        let mut session = ConversationSession::new(UserId::new(1), delivery);
        session.conversation.set_active_peer(UserId::new(3));
        session
            .conversation
            .append(Message::outgoing(UserId::new(1), UserId::new(3), "old"));

        session.select_peer(UserId::new(2)).await.expect("select");

        assert_eq!(session.conversation().active_peer(), Some(UserId::new(2)));
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation().messages()[0].content, "hi");
    }

    #[tokio::test]
    async fn history_failure_leaves_transcript_untouched() {
        let delivery = Arc::new(MockDelivery::default());
        delivery.fail_history.store(true, Ordering::SeqCst);
        let mut session = ConversationSession::new(UserId::new(1), delivery);
        session.conversation.set_active_peer(UserId::new(2));
        session
            .conversation
            .append(Message::outgoing(UserId::new(1), UserId::new(2), "kept"));

        let result = session.select_peer(UserId::new(3)).await;

        assert!(result.is_err());
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation().messages()[0].content, "kept");
    }

    #[tokio::test]
    async fn history_then_send_scenario() {
        // User 1 selects peer 2, history has one message from 2, then
        // user 1 sends "hello" over the open channel.
        let delivery = Arc::new(MockDelivery::with_history(vec![history_message(
            10, 2, 1, "hi",
        )]));
        let channel = Arc::new(MockChannel::open());
        let mut session = ConversationSession::new(UserId::new(1), delivery.clone());
        session.attach_channel(channel.clone());

        session.select_peer(UserId::new(2)).await.expect("select");
        session.send("hello").await.expect("send");

        let transcript = session.conversation().messages();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].sender_id, UserId::new(2));
        assert_eq!(transcript[1].sender_id, UserId::new(1));
        assert_eq!(transcript[1].content, "hello");
        assert_eq!(channel.frames(), vec!["2:hello".to_string()]);
        assert!(delivery.sends().is_empty());
    }

    #[tokio::test]
    async fn inbound_routing_through_session() {
        let delivery = Arc::new(MockDelivery::default());
        let mut session = ConversationSession::new(UserId::new(1), delivery);
        session.conversation.set_active_peer(UserId::new(2));

        assert!(session.handle_inbound("From 2: hi: there").is_some());
        assert!(session.handle_inbound("From 3: nope").is_none());
        assert!(session.handle_inbound("bogus").is_none());

        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation().messages()[0].content, "hi: there");
    }

    #[tokio::test]
    async fn detached_channel_falls_back() {
        let delivery = Arc::new(MockDelivery::default());
        let channel = Arc::new(MockChannel::open());
        let mut session = ConversationSession::new(UserId::new(1), delivery.clone());
        session.attach_channel(channel.clone());
        session.conversation.set_active_peer(UserId::new(2));
        session.detach_channel();

        let outcome = session.send("hello").await.expect("send");

        assert_eq!(outcome, SendOutcome::Fallback);
        assert!(channel.frames().is_empty());
    }
}
