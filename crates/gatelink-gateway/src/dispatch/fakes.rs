//! Test doubles for routing.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::command::CommandDefinition;
use gatelink_core::protocol::interaction::{Interaction, InteractionResponse};

use crate::dispatch::registry::{Autocomplete, Command};
use crate::rest::ReplySink;

pub(crate) fn interaction(v: Value) -> Interaction {
    serde_json::from_value(v).unwrap()
}

/// Replies with a fixed message; optionally offers fixed candidates.
pub(crate) struct StaticCommand {
    name: String,
    reply: String,
    candidates: Option<Vec<String>>,
    calls: AtomicUsize,
}

impl StaticCommand {
    pub fn new(name: &str, reply: &str) -> Self {
        Self {
            name: name.to_string(),
            reply: reply.to_string(),
            candidates: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_candidates(mut self, candidates: &[&str]) -> Self {
        self.candidates = Some(candidates.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Command for StaticCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new(&self.name, "test command")
    }

    async fn execute(&self, _interaction: &Interaction) -> Result<InteractionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(InteractionResponse::message(self.reply.clone()))
    }

    fn autocomplete(&self) -> Option<&dyn Autocomplete> {
        if self.candidates.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl Autocomplete for StaticCommand {
    async fn candidates(&self, _interaction: &Interaction) -> Result<Vec<String>> {
        Ok(self.candidates.clone().unwrap_or_default())
    }
}

pub(crate) struct FailingCommand {
    name: String,
}

impl FailingCommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Command for FailingCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new(&self.name, "always fails")
    }

    async fn execute(&self, _interaction: &Interaction) -> Result<InteractionResponse> {
        Err(GatewayError::Handler("deliberate failure".into()))
    }
}

/// Captures `(id, token, response)` for every delivery.
#[derive(Default)]
pub(crate) struct RecordingReplies {
    sent: Mutex<Vec<(String, String, InteractionResponse)>>,
    fail_next: AtomicBool,
}

impl RecordingReplies {
    pub fn take(&self) -> Vec<(String, String, InteractionResponse)> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReplySink for RecordingReplies {
    async fn deliver(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        response: &InteractionResponse,
    ) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Delivery("status 500".into()));
        }
        self.sent.lock().unwrap().push((
            interaction_id.to_string(),
            interaction_token.to_string(),
            response.clone(),
        ));
        Ok(())
    }
}
