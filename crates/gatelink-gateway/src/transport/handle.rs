use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::{codec, Envelope};

use crate::transport::FrameWriter;

/// Shared write side of one gateway connection.
///
/// Identify, heartbeats and gateway-requested heartbeats all write through
/// here. Only the supervisor closes it; after `close` every `send` fails
/// with a `Transport` error.
pub struct ConnectionHandle {
    writer: Mutex<Box<dyn FrameWriter>>,
    closed: AtomicBool,
}

impl ConnectionHandle {
    pub fn new(writer: Box<dyn FrameWriter>) -> Self {
        Self {
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
        }
    }

    pub async fn send(&self, env: &Envelope) -> Result<()> {
        if self.is_closed() {
            return Err(GatewayError::Transport("connection closed".into()));
        }
        let text = codec::encode(env)?;
        self.writer.lock().await.send_text(text).await
    }

    /// Idempotent; only the first call reaches the socket.
    pub(crate) async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.writer.lock().await.close().await
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
