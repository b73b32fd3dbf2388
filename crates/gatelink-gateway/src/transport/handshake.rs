//! Handshake negotiator (Hello -> Identify).
//!
//! Order is fixed:
//! 1. The peer speaks first; anything but op 10 is a protocol violation.
//! 2. The Hello payload yields the heartbeat interval (ms, > 0).
//! 3. Exactly one Identify is written.
//!
//! READY arrives later as an ordinary dispatch on the event loop, so nothing
//! is awaited after Identify. No retries here; the supervisor owns recovery.

use tracing::debug;

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::payload::{Hello, Identify};
use gatelink_core::protocol::{Envelope, OpCode};

use crate::transport::{ConnectionHandle, FrameReader};

pub async fn negotiate(
    handle: &ConnectionHandle,
    reader: &mut dyn FrameReader,
    identify: &Identify,
) -> Result<Hello> {
    let env = reader.next_frame().await?.decode()?;
    if env.opcode() != Some(OpCode::Hello) {
        return Err(GatewayError::HandshakeRejected { op: env.op });
    }

    let hello: Hello = env.reinterpret()?;
    if hello.heartbeat_interval == 0 {
        return Err(GatewayError::ShapeMismatch(
            "hello.heartbeat_interval must be positive".into(),
        ));
    }
    debug!(interval_ms = hello.heartbeat_interval, "hello received");

    handle.send(&Envelope::identify(identify)?).await?;
    debug!(intents = identify.intents, "identify sent");

    Ok(hello)
}
