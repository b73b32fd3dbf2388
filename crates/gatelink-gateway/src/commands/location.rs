//! `/addlocal` and `/local`: a tiny in-memory location catalogue.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::command::{CommandDefinition, OptionDefinition};
use gatelink_core::protocol::interaction::{Interaction, InteractionResponse};

use crate::dispatch::{Autocomplete, Command};

/// Location name -> description. Lives for the process; nothing is persisted.
#[derive(Debug, Default)]
pub struct LocationBook {
    entries: DashMap<String, String>,
}

impl LocationBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite.
    pub fn insert(&self, name: impl Into<String>, description: impl Into<String>) {
        self.entries.insert(name.into(), description.into());
    }

    pub fn describe(&self, name: &str) -> Option<String> {
        self.entries.get(name).map(|e| e.value().clone())
    }

    /// All names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Named option value, falling back to the option at `position`.
fn argument(interaction: &Interaction, name: &str, position: usize) -> Option<String> {
    interaction
        .option(name)
        .or_else(|| interaction.options().get(position))
        .map(|o| o.value_text())
}

pub struct AddLocalCommand {
    book: Arc<LocationBook>,
}

impl AddLocalCommand {
    pub fn new(book: Arc<LocationBook>) -> Self {
        Self { book }
    }
}

#[async_trait]
impl Command for AddLocalCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new("addlocal", "Add a new location.")
            .option(OptionDefinition::string("name", "Location name").required())
            .option(OptionDefinition::string("description", "Location description").required())
    }

    async fn execute(&self, interaction: &Interaction) -> Result<InteractionResponse> {
        if interaction.options().len() < 2 {
            return Err(GatewayError::Handler(
                "missing arguments; usage: /addlocal <name> <description>".into(),
            ));
        }
        let (Some(name), Some(description)) = (
            argument(interaction, "name", 0),
            argument(interaction, "description", 1),
        ) else {
            return Err(GatewayError::Handler("missing arguments".into()));
        };

        self.book.insert(name.clone(), description.clone());
        info!(location = %name, "location added");

        Ok(InteractionResponse::message(format!(
            "🗺️ Location **{name}** added!\nDescription: ***{description}***"
        )))
    }
}

pub struct LocalCommand {
    book: Arc<LocationBook>,
}

impl LocalCommand {
    pub fn new(book: Arc<LocationBook>) -> Self {
        Self { book }
    }

    fn listing(&self) -> String {
        let names = self.book.names();
        if names.is_empty() {
            return "No locations registered yet! Use `/addlocal` to add one.".to_string();
        }
        let mut out = String::from("**Available locations:**\n");
        for name in names {
            let _ = writeln!(out, "- {name}");
        }
        out
    }
}

#[async_trait]
impl Command for LocalCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new(
            "local",
            "List available locations or show the details of one.",
        )
        .option(
            OptionDefinition::string("name", "Location to show details for").with_autocomplete(),
        )
    }

    async fn execute(&self, interaction: &Interaction) -> Result<InteractionResponse> {
        let requested = argument(interaction, "name", 0).filter(|n| !n.is_empty());
        let content = match requested {
            None => self.listing(),
            Some(name) => match self.book.describe(&name) {
                Some(description) => format!("🧭 **{name}**\n\n- ***{description}***"),
                None => format!("❌ Location '{name}' not found."),
            },
        };
        Ok(InteractionResponse::message(content))
    }

    fn autocomplete(&self) -> Option<&dyn Autocomplete> {
        Some(self)
    }
}

#[async_trait]
impl Autocomplete for LocalCommand {
    async fn candidates(&self, _interaction: &Interaction) -> Result<Vec<String>> {
        Ok(self.book.names())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dispatch::fakes::interaction;

    fn content(reply: InteractionResponse) -> String {
        reply.data.content.unwrap()
    }

    fn local(options: serde_json::Value) -> Interaction {
        interaction(json!({ "type": 2, "data": { "name": "local", "options": options } }))
    }

    #[tokio::test]
    async fn add_then_look_up() {
        let book = Arc::new(LocationBook::new());
        let add = AddLocalCommand::new(Arc::clone(&book));
        let show = LocalCommand::new(Arc::clone(&book));

        let reply = add
            .execute(&interaction(json!({
                "type": 2,
                "data": { "name": "addlocal", "options": [
                    { "name": "name", "value": "Harbor" },
                    { "name": "description", "value": "Ships and gulls" }
                ]}
            })))
            .await
            .unwrap();
        assert_eq!(
            content(reply),
            "🗺️ Location **Harbor** added!\nDescription: ***Ships and gulls***"
        );

        let reply = show
            .execute(&local(json!([{ "name": "name", "value": "Harbor" }])))
            .await
            .unwrap();
        assert_eq!(content(reply), "🧭 **Harbor**\n\n- ***Ships and gulls***");

        let reply = show
            .execute(&local(json!([{ "name": "name", "value": "Nowhere" }])))
            .await
            .unwrap();
        assert_eq!(content(reply), "❌ Location 'Nowhere' not found.");
    }

    #[tokio::test]
    async fn listing_is_sorted_or_hints_when_empty() {
        let book = Arc::new(LocationBook::new());
        let show = LocalCommand::new(Arc::clone(&book));

        let reply = show.execute(&local(json!([]))).await.unwrap();
        assert_eq!(
            content(reply),
            "No locations registered yet! Use `/addlocal` to add one."
        );

        book.insert("Tower", "tall");
        book.insert("Bridge", "long");
        let reply = show.execute(&local(json!([]))).await.unwrap();
        assert_eq!(content(reply), "**Available locations:**\n- Bridge\n- Tower\n");
    }

    #[tokio::test]
    async fn addlocal_needs_two_arguments() {
        let book = Arc::new(LocationBook::new());
        let add = AddLocalCommand::new(Arc::clone(&book));
        let err = add
            .execute(&interaction(json!({
                "type": 2,
                "data": { "name": "addlocal", "options": [{ "name": "name", "value": "X" }] }
            })))
            .await
            .unwrap_err();
        assert_eq!(err.kind().as_str(), "HANDLER");
        assert!(book.is_empty());
    }

    #[tokio::test]
    async fn autocomplete_offers_every_name() {
        let book = Arc::new(LocationBook::new());
        book.insert("Paris", "");
        book.insert("London", "");
        let show = LocalCommand::new(book);
        let source = show.autocomplete().unwrap();
        let names = source.candidates(&local(json!([]))).await.unwrap();
        assert_eq!(names, vec!["London", "Paris"]);
    }

    #[test]
    fn definitions_match_registration_payload() {
        let book = Arc::new(LocationBook::new());
        let v = serde_json::to_value(LocalCommand::new(book).definition()).unwrap();
        assert_eq!(v["name"], "local");
        assert_eq!(v["options"][0]["type"], 3);
        assert_eq!(v["options"][0]["autocomplete"], true);
    }
}
