//! Gateway wire protocol.
//!
//! Two-phase decoding: `codec::decode` reads the envelope header (opcode,
//! sequence, event type) and keeps the payload as an unparsed `RawValue`.
//! The caller then reinterprets the payload into the shape its opcode
//! implies (`Hello`, `Interaction`, ...). Unknown opcodes and event types
//! decode fine and are left for the caller to ignore.

pub mod codec;
pub mod command;
pub mod envelope;
pub mod interaction;
pub mod opcode;
pub mod payload;

pub use envelope::Envelope;
pub use opcode::OpCode;
