//! Shared application state for the gatelink client.
//!
//! Wires the REST client, the command registry with its built-in commands,
//! the router and the session supervisor. Startup errors come back as
//! `Result` instead of panicking.

use std::sync::Arc;

use tracing::info;

use gatelink_core::error::Result;

use crate::commands::{self, LocationBook};
use crate::config::GatelinkConfig;
use crate::dispatch::{CommandRegistry, CommandRouter};
use crate::rest::RestClient;
use crate::supervisor::GatewayClient;
use crate::transport::ws::WsConnector;
use crate::transport::Connector;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatelinkConfig,
    rest: Arc<RestClient>,
    registry: Arc<CommandRegistry>,
    locations: Arc<LocationBook>,
    client: Arc<GatewayClient>,
}

impl AppState {
    /// Build state backed by the real WebSocket transport.
    pub fn new(cfg: GatelinkConfig) -> Result<Self> {
        Self::with_connector(cfg, Arc::new(WsConnector))
    }

    pub fn with_connector(cfg: GatelinkConfig, connector: Arc<dyn Connector>) -> Result<Self> {
        let rest = Arc::new(RestClient::new(&cfg.discord.base_url, &cfg.discord.token)?);

        let registry = Arc::new(CommandRegistry::new());
        let locations = Arc::new(LocationBook::new());
        commands::register_builtin(&registry, Arc::clone(&locations));

        let router = Arc::new(CommandRouter::new(Arc::clone(&registry), rest.clone()));
        let client = Arc::new(GatewayClient::new(cfg.gateway_options(), connector, router));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                rest,
                registry,
                locations,
                client,
            }),
        })
    }

    pub fn cfg(&self) -> &GatelinkConfig {
        &self.inner.cfg
    }

    pub fn rest(&self) -> &Arc<RestClient> {
        &self.inner.rest
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.inner.registry
    }

    pub fn locations(&self) -> &Arc<LocationBook> {
        &self.inner.locations
    }

    pub fn client(&self) -> &Arc<GatewayClient> {
        &self.inner.client
    }

    /// Register every known command with the configured guild.
    pub async fn register_slash_commands(&self) -> usize {
        let discord = &self.inner.cfg.discord;
        let definitions = self.inner.registry.definitions();
        let registered = self
            .inner
            .rest
            .register_commands(&discord.application_id, &discord.guild_id, &definitions)
            .await;
        info!(registered, total = definitions.len(), "slash commands registered");
        registered
    }
}
