//! Gateway envelope `{op, d, s?, t?}`.
//!
//! The payload is stored as `RawValue` so it can be reinterpreted lazily
//! once the opcode is known.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{GatewayError, Result};
use crate::protocol::opcode::OpCode;
use crate::protocol::payload::Identify;

/// The sole unit of wire exchange, in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Opcode (raw, so unknown codes still decode).
    pub op: i64,
    /// Opaque payload. `None` when the peer sent `null` or omitted it.
    #[serde(rename = "d", default)]
    pub payload: Option<Box<RawValue>>,
    /// Running sequence number (dispatch only).
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    /// Event name (dispatch only).
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

impl Envelope {
    /// Build an outbound (non-dispatch) envelope with a serialized payload.
    pub fn new<T: Serialize>(op: OpCode, payload: &T) -> Result<Self> {
        let raw = serde_json::value::to_raw_value(payload)
            .map_err(|e| GatewayError::MalformedEnvelope(format!("payload encode failed: {e}")))?;
        Ok(Self {
            op: op.code(),
            payload: Some(raw),
            sequence: None,
            event_type: None,
        })
    }

    /// `{op: 1, d: <last sequence or null>}`.
    pub fn heartbeat(last_sequence: Option<u64>) -> Result<Self> {
        Self::new(OpCode::Heartbeat, &last_sequence)
    }

    /// `{op: 2, d: {token, properties, intents}}`.
    pub fn identify(identify: &Identify) -> Result<Self> {
        Self::new(OpCode::Identify, identify)
    }

    /// Known opcode, if any.
    pub fn opcode(&self) -> Option<OpCode> {
        OpCode::from_code(self.op)
    }

    pub fn is_dispatch(&self) -> bool {
        self.op == OpCode::Dispatch.code()
    }

    /// Sequence number, honored only on dispatch envelopes.
    pub fn dispatch_sequence(&self) -> Option<u64> {
        if self.is_dispatch() {
            self.sequence
        } else {
            None
        }
    }

    /// Event name, honored only on dispatch envelopes.
    pub fn dispatch_event(&self) -> Option<&str> {
        if self.is_dispatch() {
            self.event_type.as_deref()
        } else {
            None
        }
    }

    /// Raw payload text (`"null"` when absent).
    pub fn raw_payload(&self) -> &str {
        self.payload.as_deref().map(RawValue::get).unwrap_or("null")
    }

    /// Second decoding phase: parse the payload into the shape the caller
    /// expects for this opcode.
    pub fn reinterpret<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(self.raw_payload())
            .map_err(|e| GatewayError::ShapeMismatch(format!("op {}: {e}", self.op)))
    }
}
