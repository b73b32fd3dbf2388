//! gatelink core: transport-agnostic gateway protocol primitives and errors.
//!
//! This crate defines the wire envelope, the opcode table, the payload shapes
//! exchanged during the handshake and steady state, the interaction model
//! routed to commands, and the error surface shared by the gateway runtime.
//! It carries no transport or async runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A malformed frame from the peer must surface as `GatewayError`, never as a
//! crashed session task.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorKind, GatewayError, Result};
