use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::warn;

use gatelink_core::error::Result;
use gatelink_core::protocol::command::CommandDefinition;
use gatelink_core::protocol::interaction::{Interaction, InteractionResponse};

/// A slash command handler.
#[async_trait]
pub trait Command: Send + Sync {
    fn definition(&self) -> CommandDefinition;

    /// Handle a normal invocation; the returned reply is delivered by the router.
    async fn execute(&self, interaction: &Interaction) -> Result<InteractionResponse>;

    /// Autocomplete capability, if this command offers one.
    fn autocomplete(&self) -> Option<&dyn Autocomplete> {
        None
    }
}

/// Supplies candidate values for autocomplete; the router does the filtering.
#[async_trait]
pub trait Autocomplete: Send + Sync {
    async fn candidates(&self, interaction: &Interaction) -> Result<Vec<String>>;
}

/// Name -> handler registry. Populated before the gateway connects.
#[derive(Default)]
pub struct CommandRegistry {
    commands: DashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: DashMap::new(),
        }
    }

    /// Register under the definition's name, replacing any previous entry.
    pub fn register(&self, command: Arc<dyn Command>) {
        let name = command.definition().name;
        if self.commands.insert(name.clone(), command).is_some() {
            warn!(command = %name, "command replaced in registry");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).map(|e| Arc::clone(e.value()))
    }

    /// All definitions, sorted by name.
    pub fn definitions(&self) -> Vec<CommandDefinition> {
        let mut defs: Vec<CommandDefinition> =
            self.commands.iter().map(|e| e.value().definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
