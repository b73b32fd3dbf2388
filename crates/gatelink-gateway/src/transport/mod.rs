//! Transport layer (client WebSocket).
//!
//! The gateway runtime only sees three seams: a `Connector` that opens a
//! connection, a `FrameWriter` half owned by the `ConnectionHandle`, and a
//! `FrameReader` half owned by the event loop. The tungstenite-backed
//! implementation lives in `ws`; tests swap in an in-memory one.

pub mod handle;
pub mod handshake;
pub mod ws;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;

use gatelink_core::error::Result;
use gatelink_core::protocol::{codec, Envelope};

pub use handle::ConnectionHandle;

/// An inbound data frame. Control frames never reach this type.
#[derive(Debug)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

impl Frame {
    /// First decoding phase (envelope header only).
    pub fn decode(&self) -> Result<Envelope> {
        match self {
            Frame::Text(s) => codec::decode(s),
            Frame::Binary(b) => codec::decode_bytes(b),
        }
    }
}

/// Write half of a gateway connection.
#[async_trait]
pub trait FrameWriter: Send {
    async fn send_text(&mut self, text: String) -> Result<()>;
    async fn close(&mut self) -> Result<()>;
}

/// Read half of a gateway connection.
#[async_trait]
pub trait FrameReader: Send {
    /// Next data frame. A closed or broken connection is a `Transport` error.
    async fn next_frame(&mut self) -> Result<Frame>;
}

/// Opens gateway connections.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<(Box<dyn FrameWriter>, Box<dyn FrameReader>)>;
}
