//! Payload shapes for the handshake and lifecycle dispatch events.

use serde::{Deserialize, Serialize};

/// Dispatch event name for a new interaction.
pub const INTERACTION_CREATE: &str = "INTERACTION_CREATE";
/// Dispatch event name acknowledging Identify.
pub const READY: &str = "READY";

/// Gateway intent bits (requested event categories).
pub mod intents {
    pub const GUILDS: u64 = 1 << 0;
    pub const GUILD_MESSAGES: u64 = 1 << 9;
    pub const MESSAGE_CONTENT: u64 = 1 << 15;

    /// Static capability declaration sent with every Identify.
    pub const DEFAULT: u64 = GUILDS | GUILD_MESSAGES | MESSAGE_CONTENT;
}

/// op 10 payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Hello {
    /// Heartbeat period in milliseconds.
    pub heartbeat_interval: u64,
}

/// op 2 payload.
#[derive(Clone, Serialize)]
pub struct Identify {
    pub token: String,
    pub properties: ConnectionProperties,
    pub intents: u64,
}

/// Fixed client-properties descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionProperties {
    pub os: String,
    pub browser: String,
    pub device: String,
}

impl ConnectionProperties {
    pub fn gatelink() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: "gatelink".to_string(),
            device: "gatelink".to_string(),
        }
    }
}

impl std::fmt::Debug for Identify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identify")
            .field("token", &"<redacted>")
            .field("properties", &self.properties)
            .field("intents", &self.intents)
            .finish()
    }
}

impl Identify {
    pub fn new(token: impl Into<String>, intents: u64) -> Self {
        Self {
            token: token.into(),
            properties: ConnectionProperties::gatelink(),
            intents,
        }
    }
}

/// `READY` dispatch payload (only the fields we log).
#[derive(Debug, Clone, Deserialize)]
pub struct Ready {
    pub session_id: String,
    #[serde(default)]
    pub user: Option<ReadyUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadyUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
}
