//! Slash command definitions as registered with the REST API.

use serde::Serialize;

/// Option value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum OptionType {
    String,
    Integer,
    Boolean,
    Number,
}

impl From<OptionType> for u8 {
    fn from(t: OptionType) -> u8 {
        match t {
            OptionType::String => 3,
            OptionType::Integer => 4,
            OptionType::Boolean => 5,
            OptionType::Number => 10,
        }
    }
}

/// One declared parameter of a command.
#[derive(Debug, Clone, Serialize)]
pub struct OptionDefinition {
    #[serde(rename = "type")]
    pub kind: OptionType,
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub autocomplete: bool,
}

impl OptionDefinition {
    /// Optional string parameter.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: OptionType::String,
            name: name.into(),
            description: description.into(),
            required: false,
            autocomplete: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }
}

/// Name, description and parameter schema of a command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionDefinition>,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, option: OptionDefinition) -> Self {
        self.options.push(option);
        self
    }
}
