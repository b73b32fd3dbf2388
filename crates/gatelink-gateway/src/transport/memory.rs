//! In-memory transport for tests.
//!
//! Each connection is a pair of unbounded channels. The test drives the
//! `MemoryPeer` side: it pushes frames (or failures) to the client and reads
//! what the client wrote.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use gatelink_core::error::{GatewayError, Result};

use crate::transport::{Connector, Frame, FrameReader, FrameWriter};

#[derive(Debug, Default)]
pub(crate) struct MemoryStats {
    pub connects: AtomicUsize,
    pub closes: AtomicUsize,
    /// Value of `closes` observed at each connect, in order.
    pub closes_at_connect: Mutex<Vec<usize>>,
}

pub(crate) struct MemoryPeer {
    to_client: mpsc::UnboundedSender<Result<Frame>>,
    from_client: mpsc::UnboundedReceiver<String>,
}

impl MemoryPeer {
    pub fn send_json(&self, v: Value) {
        let _ = self.to_client.send(Ok(Frame::Text(v.to_string())));
    }

    pub fn send_raw(&self, text: &str) {
        let _ = self.to_client.send(Ok(Frame::Text(text.to_string())));
    }

    pub fn fail(&self, msg: &str) {
        let _ = self.to_client.send(Err(GatewayError::Transport(msg.to_string())));
    }

    pub async fn recv_json(&mut self) -> Value {
        let text = self.from_client.recv().await.unwrap();
        serde_json::from_str(&text).unwrap()
    }

    /// Everything the client has written so far.
    pub fn drain_json(&mut self) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(text) = self.from_client.try_recv() {
            out.push(serde_json::from_str(&text).unwrap());
        }
        out
    }
}

struct MemoryWriter {
    tx: mpsc::UnboundedSender<String>,
    stats: Arc<MemoryStats>,
}

#[async_trait]
impl FrameWriter for MemoryWriter {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.tx
            .send(text)
            .map_err(|_| GatewayError::Transport("peer gone".into()))
    }

    async fn close(&mut self) -> Result<()> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MemoryReader {
    rx: mpsc::UnboundedReceiver<Result<Frame>>,
}

#[async_trait]
impl FrameReader for MemoryReader {
    async fn next_frame(&mut self) -> Result<Frame> {
        match self.rx.recv().await {
            Some(frame) => frame,
            None => Err(GatewayError::Transport("peer gone".into())),
        }
    }
}

pub(crate) fn pair(
    stats: Arc<MemoryStats>,
) -> (Box<dyn FrameWriter>, Box<dyn FrameReader>, MemoryPeer) {
    let (to_client, client_rx) = mpsc::unbounded_channel();
    let (client_tx, from_client) = mpsc::unbounded_channel();
    (
        Box::new(MemoryWriter { tx: client_tx, stats }),
        Box::new(MemoryReader { rx: client_rx }),
        MemoryPeer {
            to_client,
            from_client,
        },
    )
}

/// Hands every new connection's peer side to the test.
pub(crate) struct MemoryConnector {
    pub stats: Arc<MemoryStats>,
    peers: mpsc::UnboundedSender<MemoryPeer>,
}

impl MemoryConnector {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MemoryPeer>) {
        let (peers, rx) = mpsc::unbounded_channel();
        (
            Self {
                stats: Arc::new(MemoryStats::default()),
                peers,
            },
            rx,
        )
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, _url: &str) -> Result<(Box<dyn FrameWriter>, Box<dyn FrameReader>)> {
        let closes = self.stats.closes.load(Ordering::SeqCst);
        self.stats.closes_at_connect.lock().unwrap().push(closes);
        self.stats.connects.fetch_add(1, Ordering::SeqCst);

        let (writer, reader, peer) = pair(Arc::clone(&self.stats));
        self.peers
            .send(peer)
            .map_err(|_| GatewayError::Transport("test harness gone".into()))?;
        Ok((writer, reader))
    }
}
