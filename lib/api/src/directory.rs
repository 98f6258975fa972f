//! Peer directory resolution.
//!
//! Maps the current user's connection records to chat peers, resolving
//! each display name from the profile endpoint. Resolution failures
//! degrade per-peer to a placeholder label; they never fail the overall
//! lookup.

use crate::client::{ApiClient, Profile};
use crate::error::ApiError;
use alumnet_core::UserId;

/// The other participant of a one-to-one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    /// The peer's user id.
    pub id: UserId,
    /// Resolved display name, or a placeholder when unresolved.
    pub display_name: String,
}

impl Peer {
    /// A peer whose name could not be resolved.
    #[must_use]
    pub fn placeholder(id: UserId) -> Self {
        Self {
            id,
            display_name: format!("User {id}"),
        }
    }

    /// Builds a peer from the outcome of a profile lookup.
    ///
    /// A failed lookup or a profile without a name degrades to the
    /// placeholder; the lookup outcome never propagates as an error.
    #[must_use]
    pub fn from_profile_lookup(id: UserId, lookup: Result<Profile, ApiError>) -> Self {
        match lookup {
            Ok(Profile {
                full_name: Some(full_name),
                ..
            }) => Self {
                id,
                display_name: full_name,
            },
            Ok(_) => Self::placeholder(id),
            Err(e) => {
                tracing::debug!(peer = %id, error = %e, "profile lookup failed");
                Self::placeholder(id)
            }
        }
    }
}

impl ApiClient {
    /// Resolves the chat peers of `current_user` from their connections.
    ///
    /// One profile lookup per connection; a failed or nameless lookup
    /// yields the `"User <id>"` placeholder for that peer only.
    ///
    /// # Errors
    ///
    /// Returns an error only if the connection list itself cannot be
    /// fetched.
    pub async fn resolve_peers(&self, current_user: UserId) -> Result<Vec<Peer>, ApiError> {
        let connections = self.connections().await?;
        let mut peers = Vec::with_capacity(connections.len());
        for connection in connections {
            let other = connection.other_party(current_user);
            peers.push(Peer::from_profile_lookup(other, self.profile(other).await));
        }
        Ok(peers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(user_id: i64, full_name: Option<&str>) -> Profile {
        Profile {
            user_id: UserId::new(user_id),
            full_name: full_name.map(str::to_string),
        }
    }

    #[test]
    fn placeholder_name_derives_from_id() {
        let peer = Peer::placeholder(UserId::new(42));
        assert_eq!(peer.id, UserId::new(42));
        assert_eq!(peer.display_name, "User 42");
    }

    #[test]
    fn resolved_profile_provides_display_name() {
        let peer = Peer::from_profile_lookup(UserId::new(2), Ok(profile(2, Some("Ada Lovelace"))));
        assert_eq!(peer.id, UserId::new(2));
        assert_eq!(peer.display_name, "Ada Lovelace");
    }

    #[test]
    fn nameless_profile_degrades_to_placeholder() {
        let peer = Peer::from_profile_lookup(UserId::new(2), Ok(profile(2, None)));
        assert_eq!(peer.display_name, "User 2");
    }

    #[test]
    fn failed_lookup_degrades_to_placeholder() {
        let peer = Peer::from_profile_lookup(
            UserId::new(7),
            Err(ApiError::Status { status: 404 }),
        );
        assert_eq!(peer.id, UserId::new(7));
        assert_eq!(peer.display_name, "User 7");
    }
}
