//! tokio-tungstenite client transport.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use gatelink_core::error::{GatewayError, Result};

use crate::transport::{Connector, Frame, FrameReader, FrameWriter};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects to `ws://` / `wss://` gateway URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<(Box<dyn FrameWriter>, Box<dyn FrameReader>)> {
        debug!(url = %url, "opening websocket");
        let (ws, _resp) = connect_async(url)
            .await
            .map_err(|e| GatewayError::Transport(format!("websocket connect failed: {e}")))?;
        let (sink, stream) = ws.split();
        Ok((Box::new(WsWriter { sink }), Box::new(WsReader { stream })))
    }
}

struct WsWriter {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameWriter for WsWriter {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(|e| GatewayError::Transport(format!("send failed: {e}")))
    }

    async fn close(&mut self) -> Result<()> {
        self.sink
            .close()
            .await
            .map_err(|e| GatewayError::Transport(format!("close failed: {e}")))
    }
}

struct WsReader {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl FrameReader for WsReader {
    async fn next_frame(&mut self) -> Result<Frame> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(s))) => return Ok(Frame::Text(s)),
                Some(Ok(Message::Binary(b))) => return Ok(Frame::Binary(b)),
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| format!("{} {}", u16::from(f.code), f.reason))
                        .unwrap_or_else(|| "no close frame".to_string());
                    return Err(GatewayError::Transport(format!("closed by peer: {reason}")));
                }
                // Pongs are queued by tungstenite and flushed with the next write.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Err(e)) => return Err(GatewayError::Transport(format!("read failed: {e}"))),
                None => return Err(GatewayError::Transport("stream ended".into())),
            }
        }
    }
}
