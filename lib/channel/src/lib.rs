//! Realtime chat channel lifecycle for the alumnet chat client.
//!
//! One [`ChannelSession`] exists per logged-in user for the lifetime of
//! that login. It owns the underlying WebSocket, surfaces inbound frames
//! as [`ChannelEvent`]s, and guarantees the socket is released on every
//! exit path. There is no reconnection policy: a closed channel stays
//! closed until the owner opens a new session.

pub mod error;
pub mod session;

pub use error::ChannelError;
pub use session::{ChannelConfig, ChannelEvent, ChannelHandle, ChannelSession, ChannelState};
