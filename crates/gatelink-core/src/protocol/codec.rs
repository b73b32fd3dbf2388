//! Frame <-> envelope codec.
//!
//! `decode` only reads the envelope header; payloads stay raw until the
//! caller reinterprets them (see `Envelope::reinterpret`).

use crate::error::{GatewayError, Result};
use crate::protocol::envelope::Envelope;

/// Decode a text frame into an envelope.
pub fn decode(frame: &str) -> Result<Envelope> {
    serde_json::from_str(frame)
        .map_err(|e| GatewayError::MalformedEnvelope(format!("invalid envelope json: {e}")))
}

/// Decode a binary frame carrying UTF-8 JSON.
pub fn decode_bytes(frame: &[u8]) -> Result<Envelope> {
    let s = std::str::from_utf8(frame)
        .map_err(|e| GatewayError::MalformedEnvelope(format!("utf8 invalid: {e}")))?;
    decode(s)
}

/// Encode an envelope into a text frame.
pub fn encode(env: &Envelope) -> Result<String> {
    serde_json::to_string(env)
        .map_err(|e| GatewayError::MalformedEnvelope(format!("envelope encode failed: {e}")))
}
