//! Command router: interaction -> registry lookup -> handler -> REST reply.
//!
//! Unregistered commands are dropped silently. Handler failures produce no
//! reply; they come back as `Handler` errors for the event loop to log.

use std::sync::Arc;

use tracing::debug;

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::interaction::{
    Choice, Interaction, InteractionKind, InteractionResponse,
};

use crate::dispatch::registry::CommandRegistry;
use crate::rest::ReplySink;

/// Upper bound on suggestions the gateway accepts in one reply.
pub const MAX_CHOICES: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A reply was delivered.
    Replied,
    /// No command by that name.
    Unregistered,
    /// The command exists but offers no autocomplete.
    NoAutocomplete,
    /// Not a command or autocomplete interaction.
    Ignored,
}

pub struct CommandRouter {
    registry: Arc<CommandRegistry>,
    replies: Arc<dyn ReplySink>,
}

impl CommandRouter {
    pub fn new(registry: Arc<CommandRegistry>, replies: Arc<dyn ReplySink>) -> Self {
        Self { registry, replies }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn route(&self, interaction: Interaction) -> Result<RouteOutcome> {
        let Some(name) = interaction.command_name() else {
            return Ok(RouteOutcome::Ignored);
        };
        match interaction.kind {
            InteractionKind::ApplicationCommand => self.execute(name, &interaction).await,
            InteractionKind::Autocomplete => self.autocomplete(name, &interaction).await,
            _ => Ok(RouteOutcome::Ignored),
        }
    }

    async fn execute(&self, name: &str, interaction: &Interaction) -> Result<RouteOutcome> {
        let Some(command) = self.registry.get(name) else {
            debug!(command = %name, "unregistered command; dropping");
            return Ok(RouteOutcome::Unregistered);
        };
        let reply = command
            .execute(interaction)
            .await
            .map_err(|e| handler_error(name, e))?;
        self.replies
            .deliver(&interaction.id, &interaction.token, &reply)
            .await?;
        Ok(RouteOutcome::Replied)
    }

    async fn autocomplete(&self, name: &str, interaction: &Interaction) -> Result<RouteOutcome> {
        let Some(command) = self.registry.get(name) else {
            debug!(command = %name, "autocomplete for unregistered command; dropping");
            return Ok(RouteOutcome::Unregistered);
        };
        let Some(source) = command.autocomplete() else {
            return Ok(RouteOutcome::NoAutocomplete);
        };
        let candidates = source
            .candidates(interaction)
            .await
            .map_err(|e| handler_error(name, e))?;
        let choices = suggest(candidates, &interaction.focused_value());
        self.replies
            .deliver(
                &interaction.id,
                &interaction.token,
                &InteractionResponse::autocomplete(choices),
            )
            .await?;
        Ok(RouteOutcome::Replied)
    }
}

fn handler_error(command: &str, err: GatewayError) -> GatewayError {
    match err {
        GatewayError::Handler(msg) => GatewayError::Handler(format!("{command}: {msg}")),
        other => GatewayError::Handler(format!("{command}: {other}")),
    }
}

/// Case-insensitive prefix filter over `candidates`, order preserved, capped
/// at `MAX_CHOICES`.
pub fn suggest<I, S>(candidates: I, input: &str) -> Vec<Choice>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let needle = input.to_lowercase();
    candidates
        .into_iter()
        .map(Into::into)
        .filter(|c: &String| c.to_lowercase().starts_with(&needle))
        .take(MAX_CHOICES)
        .map(Choice::same)
        .collect()
}
