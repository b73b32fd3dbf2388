//! REST boundary: interaction replies and slash command registration.
//!
//! Fire-and-forget POSTs; nothing here retries. A status other than 200/201
//! is a `Delivery` error.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::command::CommandDefinition;
use gatelink_core::protocol::interaction::InteractionResponse;

const USER_AGENT: &str = concat!("DiscordBot (gatelink, ", env!("CARGO_PKG_VERSION"), ")");

/// Where the router sends interaction replies.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn deliver(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        response: &InteractionResponse,
    ) -> Result<()>;
}

pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Config(format!("http client init failed: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Register every definition with one guild. Returns how many succeeded;
    /// failures are logged and skipped.
    pub async fn register_commands(
        &self,
        application_id: &str,
        guild_id: &str,
        definitions: &[CommandDefinition],
    ) -> usize {
        let url = format!(
            "{}/applications/{application_id}/guilds/{guild_id}/commands",
            self.base_url
        );
        let mut registered = 0;
        for def in definitions {
            match self.post_json(&url, def).await {
                Ok(()) => {
                    debug!(command = %def.name, "slash command registered");
                    registered += 1;
                }
                Err(e) => {
                    warn!(command = %def.name, error = %e, "slash command registration failed");
                }
            }
        }
        registered
    }

    async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<()> {
        let resp = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Bot {}", self.token))
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Delivery(format!("request failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(GatewayError::Delivery(format!("unexpected status {status}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplySink for RestClient {
    async fn deliver(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        response: &InteractionResponse,
    ) -> Result<()> {
        let url = format!(
            "{}/interactions/{interaction_id}/{interaction_token}/callback",
            self.base_url
        );
        self.post_json(&url, response).await
    }
}
