use std::fmt;

use serde::Deserialize;
use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::payload::intents;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatelinkConfig {
    pub version: u32,

    pub discord: DiscordSection,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub reconnect: ReconnectSection,
}

impl GatelinkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GatewayError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.discord.validate()?;
        self.reconnect.validate()?;

        Ok(())
    }
}

/// Endpoints and credentials.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordSection {
    pub base_url: String,
    pub token: String,
    pub application_id: String,
    pub guild_id: String,
    pub gateway_url: String,
    /// Read for parity with the bot's environment; nothing uses it yet.
    #[serde(default)]
    pub channel_id: Option<String>,
}

impl fmt::Debug for DiscordSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordSection")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("guild_id", &self.guild_id)
            .field("gateway_url", &self.gateway_url)
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

impl DiscordSection {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("discord.base_url", &self.base_url),
            ("discord.token", &self.token),
            ("discord.application_id", &self.application_id),
            ("discord.guild_id", &self.guild_id),
            ("discord.gateway_url", &self.gateway_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GatewayError::Config(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_intents")]
    pub intents: u64,

    #[serde(default = "default_require_heartbeat_ack")]
    pub require_heartbeat_ack: bool,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            intents: default_intents(),
            require_heartbeat_ack: default_require_heartbeat_ack(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconnectSection {
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectSection {
    fn default() -> Self {
        Self {
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            max_attempts: None,
        }
    }
}

impl ReconnectSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(GatewayError::Config(
                "reconnect.max_backoff_ms must be >= initial_backoff_ms".into(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(GatewayError::Config(
                "reconnect.max_attempts must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

fn default_intents() -> u64 {
    intents::DEFAULT
}
fn default_require_heartbeat_ack() -> bool {
    true
}
fn default_initial_backoff_ms() -> u64 {
    1000
}
fn default_max_backoff_ms() -> u64 {
    60000
}
