//! Gateway opcode table.

/// Opcodes this client understands. Anything else is carried as a raw integer
/// on the envelope and ignored by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Server -> client: an application event (`t`/`s` present).
    Dispatch,
    /// Both ways: liveness ping carrying the last sequence.
    Heartbeat,
    /// Client -> server: authenticate a new session.
    Identify,
    /// Client -> server: resume a dropped session (not used by this client).
    Resume,
    /// Server -> client: reconnect and start over.
    Reconnect,
    /// Server -> client: the session is no longer valid.
    InvalidSession,
    /// Server -> client: first frame, carries the heartbeat interval.
    Hello,
    /// Server -> client: heartbeat acknowledged.
    HeartbeatAck,
}

impl OpCode {
    /// Numeric wire value.
    pub const fn code(self) -> i64 {
        match self {
            OpCode::Dispatch => 0,
            OpCode::Heartbeat => 1,
            OpCode::Identify => 2,
            OpCode::Resume => 6,
            OpCode::Reconnect => 7,
            OpCode::InvalidSession => 9,
            OpCode::Hello => 10,
            OpCode::HeartbeatAck => 11,
        }
    }

    /// Look up a wire value. `None` for codes this client does not model.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(OpCode::Dispatch),
            1 => Some(OpCode::Heartbeat),
            2 => Some(OpCode::Identify),
            6 => Some(OpCode::Resume),
            7 => Some(OpCode::Reconnect),
            9 => Some(OpCode::InvalidSession),
            10 => Some(OpCode::Hello),
            11 => Some(OpCode::HeartbeatAck),
            _ => None,
        }
    }
}
