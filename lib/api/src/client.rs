//! HTTP client for the alumnet backend.

use crate::error::ApiError;
use alumnet_conversation::{DeliveryError, HistoryError, Message, MessageDelivery};
use alumnet_core::{ConnectionId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A networking connection record between two users.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    /// Record identifier.
    pub id: ConnectionId,
    /// Who initiated the connection.
    pub requester_id: UserId,
    /// Who received the request.
    pub recipient_id: UserId,
    /// Connection status, e.g. `"accepted"`.
    pub status: String,
}

impl Connection {
    /// Resolves the other party of this connection relative to `me`.
    #[must_use]
    pub fn other_party(&self, me: UserId) -> UserId {
        if self.requester_id == me {
            self.recipient_id
        } else {
            self.requester_id
        }
    }
}

/// A user profile record.
///
/// Only the fields this client reads; the backend carries more.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// The user this profile belongs to.
    pub user_id: UserId,
    /// Display name; nullable on the backend.
    pub full_name: Option<String>,
}

/// Body of the fallback send request.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    recipient_id: UserId,
    content: &'a str,
}

/// Client for the backend REST API.
///
/// All paths are relative to a base URL that already includes the
/// `/api/v1` prefix; requests carry a bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8000/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::RequestFailed {
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                reason: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        response.json().await.map_err(|e| ApiError::Decode {
            reason: e.to_string(),
        })
    }

    /// Fetches the current user's connection records.
    pub async fn connections(&self) -> Result<Vec<Connection>, ApiError> {
        self.get_json("/networking/connections").await
    }

    /// Fetches the profile of `user_id`.
    pub async fn profile(&self, user_id: UserId) -> Result<Profile, ApiError> {
        self.get_json(&format!("/profiles/{user_id}")).await
    }

    /// Fetches the chat history with `peer`, chronologically ascending.
    pub async fn chat_history(&self, peer: UserId) -> Result<Vec<Message>, ApiError> {
        self.get_json(&format!("/chat/history/{peer}")).await
    }

    /// Sends one message via the request/response path.
    pub async fn post_message(
        &self,
        recipient_id: UserId,
        content: &str,
    ) -> Result<Message, ApiError> {
        let response = self
            .http
            .post(self.url("/chat/send"))
            .bearer_auth(&self.token)
            .json(&SendMessageRequest {
                recipient_id,
                content,
            })
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                reason: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        response.json().await.map_err(|e| ApiError::Decode {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl MessageDelivery for ApiClient {
    async fn history(&self, peer: UserId) -> Result<Vec<Message>, HistoryError> {
        self.chat_history(peer)
            .await
            .map_err(|e| HistoryError::RequestFailed {
                reason: e.to_string(),
            })
    }

    async fn send(&self, recipient: UserId, content: &str) -> Result<(), DeliveryError> {
        self.post_message(recipient, content)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError::RequestFailed {
                reason: e.to_string(),
            })
    }
}
