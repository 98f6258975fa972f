//! Channel session lifecycle: `Closed -> Opening -> Open -> Closed`.
//!
//! The session splits the socket into a writer task (fed by an mpsc the
//! cloneable [`ChannelHandle`] writes into) and a reader task that
//! forwards inbound text frames as [`ChannelEvent`]s. Either half
//! terminating marks the channel closed; the reader emits the final
//! [`ChannelEvent::Closed`].

use crate::error::ChannelError;
use alumnet_conversation::{ChatOutbound, DeliveryError};
use alumnet_core::UserId;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// Buffer size for the outbound frame queue and the event stream.
const CHANNEL_CAPACITY: usize = 64;

const STATE_CLOSED: u8 = 0;
const STATE_OPENING: u8 = 1;
const STATE_OPEN: u8 = 2;

/// Observable state of a channel session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No live socket.
    Closed,
    /// Connect in progress.
    Opening,
    /// Socket is established and accepting writes.
    Open,
}

impl ChannelState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            STATE_OPEN => Self::Open,
            STATE_OPENING => Self::Opening,
            _ => Self::Closed,
        }
    }

    /// Returns true if the channel accepts writes.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Events surfaced by the channel session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The socket was established.
    Opened,
    /// An inbound text frame arrived.
    Text(String),
    /// The socket closed; no further events follow.
    Closed,
}

/// Where the realtime channel lives.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Base URL of the WebSocket server, e.g. `ws://localhost:8000`.
    pub ws_base_url: String,
}

impl ChannelConfig {
    /// Creates a config for the given base URL.
    #[must_use]
    pub fn new(ws_base_url: impl Into<String>) -> Self {
        Self {
            ws_base_url: ws_base_url.into(),
        }
    }

    /// The per-user channel endpoint, authorized via a query parameter.
    fn endpoint(&self, user_id: UserId, token: &str) -> String {
        format!(
            "{}/api/v1/chat/ws/{}?token={}",
            self.ws_base_url.trim_end_matches('/'),
            user_id,
            token
        )
    }
}

/// Cloneable write half of an open channel.
#[derive(Clone)]
pub struct ChannelHandle {
    tx: mpsc::Sender<String>,
    state: Arc<AtomicU8>,
}

impl ChannelHandle {
    /// Current channel state.
    #[must_use]
    pub fn state(&self) -> ChannelState {
        ChannelState::from_raw(self.state.load(Ordering::SeqCst))
    }

    /// Returns true if the channel accepts writes.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Queues one text frame for the writer task, fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] if the channel is closed or the
    /// writer task has gone away.
    pub async fn send_text(&self, frame: String) -> Result<(), ChannelError> {
        if !self.is_open() {
            return Err(ChannelError::Closed);
        }
        self.tx.send(frame).await.map_err(|_| ChannelError::Closed)
    }
}

#[async_trait]
impl ChatOutbound for ChannelHandle {
    fn is_open(&self) -> bool {
        ChannelHandle::is_open(self)
    }

    async fn send_frame(&self, frame: String) -> Result<(), DeliveryError> {
        self.send_text(frame)
            .await
            .map_err(|_| DeliveryError::ChannelClosed)
    }
}

/// One user's realtime channel session.
///
/// Owns the socket exclusively; other components only write through the
/// [`ChannelHandle`] or read from the event receiver. Dropping the
/// session closes the socket.
pub struct ChannelSession {
    handle: ChannelHandle,
    close_tx: Option<oneshot::Sender<()>>,
}

impl ChannelSession {
    /// Opens the channel for `user_id`, authorized by `token`.
    ///
    /// On success the returned receiver yields [`ChannelEvent::Opened`]
    /// first, then inbound frames, then exactly one
    /// [`ChannelEvent::Closed`].
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::ConnectFailed`] if the connect or
    /// handshake fails; no retry is attempted.
    pub async fn open(
        config: &ChannelConfig,
        user_id: UserId,
        token: &str,
    ) -> Result<(Self, mpsc::Receiver<ChannelEvent>), ChannelError> {
        let url = config.endpoint(user_id, token);
        let state = Arc::new(AtomicU8::new(STATE_OPENING));

        let (ws_stream, _response) = connect_async(url.as_str()).await.map_err(|e| {
            state.store(STATE_CLOSED, Ordering::SeqCst);
            ChannelError::ConnectFailed {
                reason: e.to_string(),
            }
        })?;
        state.store(STATE_OPEN, Ordering::SeqCst);
        tracing::info!(user = %user_id, "chat channel open");

        let (mut write, mut read) = ws_stream.split();
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (out_tx, mut out_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
        let (close_tx, mut close_rx) = oneshot::channel::<()>();

        let _ = event_tx.send(ChannelEvent::Opened).await;

        let writer_state = state.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    frame = out_rx.recv() => match frame {
                        Some(text) => {
                            if let Err(e) = write.send(WsMessage::Text(text)).await {
                                tracing::warn!(error = %e, "channel write failed");
                                break;
                            }
                        }
                        None => break,
                    },
                    _ = &mut close_rx => {
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                }
            }
            writer_state.store(STATE_CLOSED, Ordering::SeqCst);
        });

        let reader_state = state.clone();
        tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(WsMessage::Text(text)) => {
                        if event_tx.send(ChannelEvent::Text(text)).await.is_err() {
                            // Receiver gone; the owning view was torn down.
                            break;
                        }
                    }
                    Ok(WsMessage::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "channel read failed");
                        break;
                    }
                }
            }
            reader_state.store(STATE_CLOSED, Ordering::SeqCst);
            let _ = event_tx.send(ChannelEvent::Closed).await;
            tracing::info!("chat channel closed");
        });

        Ok((
            Self {
                handle: ChannelHandle { tx: out_tx, state },
                close_tx: Some(close_tx),
            },
            event_rx,
        ))
    }

    /// A cloneable write half of this channel.
    #[must_use]
    pub fn handle(&self) -> ChannelHandle {
        self.handle.clone()
    }

    /// Current channel state.
    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.handle.state()
    }

    /// Returns true if the channel accepts writes.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Closes the channel. Idempotent.
    pub fn close(&mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
        self.handle.state.store(STATE_CLOSED, Ordering::SeqCst);
    }
}

impl Drop for ChannelSession {
    fn drop(&mut self) {
        // Socket release on every exit path.
        self.close();
    }
}
