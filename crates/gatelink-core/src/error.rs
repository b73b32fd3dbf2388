//! Shared error type across gatelink crates.

use thiserror::Error;

/// Stable error classes (used in logs and by callers deciding propagation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection-level I/O failure.
    Transport,
    /// Peer did not open with Hello.
    HandshakeRejected,
    /// Peer asked us to reconnect or dropped our session.
    Reconnect,
    /// Frame was not a valid envelope.
    Malformed,
    /// Payload did not match the shape expected for its opcode.
    ShapeMismatch,
    /// A routed command handler failed.
    Handler,
    /// The REST reply could not be delivered.
    Delivery,
    /// Invalid or missing configuration.
    Config,
}

impl ErrorKind {
    /// String representation used in structured logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::HandshakeRejected => "HANDSHAKE_REJECTED",
            ErrorKind::Reconnect => "RECONNECT",
            ErrorKind::Malformed => "MALFORMED",
            ErrorKind::ShapeMismatch => "SHAPE_MISMATCH",
            ErrorKind::Handler => "HANDLER",
            ErrorKind::Delivery => "DELIVERY",
            ErrorKind::Config => "CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("handshake rejected: expected hello, got op {op}")]
    HandshakeRejected { op: i64 },
    #[error("no heartbeat ack since the previous heartbeat")]
    ZombieConnection,
    #[error("gateway requested reconnect")]
    ReconnectRequested,
    #[error("gateway invalidated the session")]
    SessionInvalidated,
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("handler: {0}")]
    Handler(String),
    #[error("delivery: {0}")]
    Delivery(String),
    #[error("config: {0}")]
    Config(String),
    #[error("gave up reconnecting after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl GatewayError {
    /// Map an error to its stable class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Transport(_)
            | GatewayError::ZombieConnection
            | GatewayError::RetriesExhausted { .. } => ErrorKind::Transport,
            GatewayError::HandshakeRejected { .. } => ErrorKind::HandshakeRejected,
            GatewayError::ReconnectRequested | GatewayError::SessionInvalidated => {
                ErrorKind::Reconnect
            }
            GatewayError::MalformedEnvelope(_) => ErrorKind::Malformed,
            GatewayError::ShapeMismatch(_) => ErrorKind::ShapeMismatch,
            GatewayError::Handler(_) => ErrorKind::Handler,
            GatewayError::Delivery(_) => ErrorKind::Delivery,
            GatewayError::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether this error tears down the connection and triggers recovery.
    ///
    /// Per-event failures (malformed frame, bad payload shape, handler or
    /// delivery failure) are isolated to the event that caused them.
    pub fn escalates(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Transport | ErrorKind::HandshakeRejected | ErrorKind::Reconnect
        )
    }
}
