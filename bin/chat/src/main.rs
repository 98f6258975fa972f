//! Terminal chat frontend for the alumnet backend.
//!
//! Wires the REST client, the realtime channel, and the conversation
//! session into a line-based loop: `/chat <id>` selects a peer, plain
//! lines are sent to them, inbound frames for the active peer are
//! printed as they arrive.

use alumnet_api::{ApiClient, Peer};
use alumnet_channel::{ChannelConfig, ChannelEvent, ChannelSession};
use alumnet_conversation::{ConversationSession, Message};
use alumnet_core::UserId;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::ChatConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ChatConfig::from_env().expect("failed to load configuration");
    let user_id = UserId::new(config.user_id);
    tracing::info!(user = %user_id, "starting chat client");

    let api = Arc::new(
        ApiClient::new(&config.api_base_url, &config.token).expect("failed to build API client"),
    );

    let peers = match api.resolve_peers(user_id).await {
        Ok(peers) => peers,
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch connections");
            Vec::new()
        }
    };
    print_contacts(&peers);

    // One funnel for channel events so the select loop never sees a
    // drained receiver; `_event_tx` stays alive in this scope.
    let (event_tx, mut events) = mpsc::channel::<ChannelEvent>(64);
    let _event_tx = event_tx.clone();

    let channel_config = ChannelConfig::new(&config.ws_base_url);
    let mut channel = match ChannelSession::open(&channel_config, user_id, &config.token).await {
        Ok((channel, mut channel_events)) => {
            tokio::spawn(async move {
                while let Some(event) = channel_events.recv().await {
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }
            });
            Some(channel)
        }
        Err(e) => {
            tracing::warn!(error = %e, "realtime channel unavailable, sends will use HTTP");
            None
        }
    };

    let mut session = ConversationSession::new(user_id, api.clone());
    if let Some(channel) = &channel {
        session.attach_channel(Arc::new(channel.handle()));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Commands: /chat <id>, /contacts, /quit. Anything else is sent.");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ChannelEvent::Opened) => {
                    tracing::debug!("channel opened");
                }
                Some(ChannelEvent::Text(frame)) => {
                    if let Some(message) = session.handle_inbound(&frame) {
                        print_message(user_id, &peers, message);
                    }
                }
                Some(ChannelEvent::Closed) | None => {
                    session.detach_channel();
                    println!("(realtime channel closed, sends will use HTTP)");
                }
            },
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                if !handle_line(&mut session, user_id, &peers, &line).await {
                    break;
                }
            }
        }
    }

    if let Some(channel) = channel.as_mut() {
        channel.close();
    }
    tracing::info!("chat client stopped");
}

/// Processes one input line; returns false on `/quit`.
async fn handle_line(
    session: &mut ConversationSession,
    user_id: UserId,
    peers: &[Peer],
    line: &str,
) -> bool {
    let line = line.trim();
    if line == "/quit" {
        return false;
    }
    if line == "/contacts" {
        print_contacts(peers);
        return true;
    }
    if let Some(raw) = line.strip_prefix("/chat ") {
        let Ok(peer) = raw.parse::<UserId>() else {
            println!("Not a user id: {raw}");
            return true;
        };
        match session.select_peer(peer).await {
            Ok(()) => {
                println!("--- {} ---", display_name(peers, peer));
                for message in session.conversation().messages() {
                    print_message(user_id, peers, message);
                }
            }
            Err(e) => {
                tracing::warn!(peer = %peer, error = %e, "could not load history");
                println!("Could not load history for {peer}");
            }
        }
        return true;
    }
    if session.conversation().active_peer().is_none() {
        println!("Select a contact first with /chat <id>");
        return true;
    }
    if let Err(e) = session.send(line).await {
        tracing::warn!(error = %e, "send failed");
        println!("Failed to send message");
    }
    true
}

fn print_contacts(peers: &[Peer]) {
    if peers.is_empty() {
        println!("No connections yet.");
        return;
    }
    println!("Contacts:");
    for peer in peers {
        println!("  {:>6}  {}", peer.id, peer.display_name);
    }
}

fn print_message(user_id: UserId, peers: &[Peer], message: &Message) {
    let label = if message.is_from(user_id) {
        "me".to_string()
    } else {
        display_name(peers, message.sender_id)
    };
    println!(
        "[{}] {label}: {}",
        message.timestamp.format("%H:%M"),
        message.content
    );
}

fn display_name(peers: &[Peer], id: UserId) -> String {
    peers
        .iter()
        .find(|p| p.id == id)
        .map_or_else(|| format!("User {id}"), |p| p.display_name.clone())
}
