//! Centralized client configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! `ALUMNET`-prefixed environment variables.

use serde::Deserialize;

/// Chat client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the REST API, including the version prefix.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the WebSocket server.
    #[serde(default = "default_ws_base_url")]
    pub ws_base_url: String,

    /// Bearer token of the logged-in user, obtained out of band.
    pub token: String,

    /// Id of the logged-in user.
    pub user_id: i64,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_ws_base_url() -> String {
    "ws://localhost:8000".to_string()
}

impl ChatConfig {
    /// Loads configuration from `ALUMNET`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("ALUMNET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
