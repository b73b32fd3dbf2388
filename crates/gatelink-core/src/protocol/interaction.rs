//! Interaction events (`INTERACTION_CREATE`) and the replies sent for them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interaction type (`type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum InteractionKind {
    Ping,
    /// Normal slash command execution.
    ApplicationCommand,
    MessageComponent,
    /// The user is typing into an autocomplete-enabled option.
    Autocomplete,
    ModalSubmit,
    Other(u8),
}

impl From<u8> for InteractionKind {
    fn from(code: u8) -> Self {
        match code {
            1 => InteractionKind::Ping,
            2 => InteractionKind::ApplicationCommand,
            3 => InteractionKind::MessageComponent,
            4 => InteractionKind::Autocomplete,
            5 => InteractionKind::ModalSubmit,
            other => InteractionKind::Other(other),
        }
    }
}

/// Decoded `INTERACTION_CREATE` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub token: String,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    #[serde(default)]
    pub data: Option<InteractionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOptionValue>,
}

/// One option as filled in by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOptionValue {
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub focused: bool,
}

impl CommandOptionValue {
    /// Value as text; strings unquoted, other scalars via their JSON form.
    pub fn value_text(&self) -> String {
        match &self.value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

impl Interaction {
    /// Invoked command name, if the interaction carries command data.
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.name.as_str())
    }

    pub fn options(&self) -> &[CommandOptionValue] {
        self.data.as_ref().map(|d| d.options.as_slice()).unwrap_or(&[])
    }

    /// Option by name.
    pub fn option(&self, name: &str) -> Option<&CommandOptionValue> {
        self.options().iter().find(|o| o.name == name)
    }

    /// What the user has typed so far into the option being completed.
    ///
    /// Falls back to the first option when none is flagged `focused`, and to
    /// the empty string when there are no options.
    pub fn focused_value(&self) -> String {
        let options = self.options();
        options
            .iter()
            .find(|o| o.focused)
            .or_else(|| options.first())
            .map(CommandOptionValue::value_text)
            .unwrap_or_default()
    }
}

/// Reply type (`type` field of the callback body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ResponseKind {
    ChannelMessageWithSource,
    AutocompleteResult,
}

impl From<ResponseKind> for u8 {
    fn from(k: ResponseKind) -> u8 {
        match k {
            ResponseKind::ChannelMessageWithSource => 4,
            ResponseKind::AutocompleteResult => 8,
        }
    }
}

/// Autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

impl Choice {
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

/// Body of `POST /interactions/{id}/{token}/callback`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    pub data: ResponseData,
}

impl InteractionResponse {
    /// `{type: 4, data: {content}}`.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::ChannelMessageWithSource,
            data: ResponseData {
                content: Some(content.into()),
                choices: None,
            },
        }
    }

    /// `{type: 8, data: {choices}}`.
    pub fn autocomplete(choices: Vec<Choice>) -> Self {
        Self {
            kind: ResponseKind::AutocompleteResult,
            data: ResponseData {
                content: None,
                choices: Some(choices),
            },
        }
    }
}
