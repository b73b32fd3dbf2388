//! Client config loader (strict YAML, or process environment).

pub mod schema;

use std::fs;
use std::time::Duration;

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::payload::Identify;

use crate::supervisor::{GatewayOptions, ReconnectPolicy};

pub use schema::{DiscordSection, GatelinkConfig, GatewaySection, ReconnectSection};

pub fn load_from_file(path: &str) -> Result<GatelinkConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GatewayError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatelinkConfig> {
    let cfg: GatelinkConfig = serde_yaml::from_str(s)
        .map_err(|e| GatewayError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Environment variables (after loading `.env`, if one exists).
pub fn load_from_env() -> Result<GatelinkConfig> {
    let _ = dotenvy::dotenv();
    load_from_vars(|key| std::env::var(key).ok())
}

/// Build a config from `BASE_URL`, `TOKEN`, `APPLICATION_ID`, `GUILD_ID`,
/// `GATEWAY_URL` and optional `CHANNEL_ID`. Tuning sections take defaults.
pub fn load_from_vars<F>(lookup: F) -> Result<GatelinkConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| -> Result<String> {
        lookup(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| GatewayError::Config(format!("environment variable {key} is not set")))
    };

    let cfg = GatelinkConfig {
        version: 1,
        discord: DiscordSection {
            base_url: required("BASE_URL")?,
            token: required("TOKEN")?,
            application_id: required("APPLICATION_ID")?,
            guild_id: required("GUILD_ID")?,
            gateway_url: required("GATEWAY_URL")?,
            channel_id: lookup("CHANNEL_ID").filter(|v| !v.is_empty()),
        },
        gateway: GatewaySection::default(),
        reconnect: ReconnectSection::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

impl GatelinkConfig {
    /// Supervisor options derived from this config.
    pub fn gateway_options(&self) -> GatewayOptions {
        GatewayOptions {
            gateway_url: self.discord.gateway_url.clone(),
            identify: Identify::new(self.discord.token.clone(), self.gateway.intents),
            require_heartbeat_ack: self.gateway.require_heartbeat_ack,
            reconnect: ReconnectPolicy {
                initial: Duration::from_millis(self.reconnect.initial_backoff_ms),
                max: Duration::from_millis(self.reconnect.max_backoff_ms),
                max_attempts: self.reconnect.max_attempts,
            },
        }
    }
}
