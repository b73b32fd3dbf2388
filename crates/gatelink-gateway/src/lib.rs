//! gatelink gateway library entry.
//!
//! This crate wires the transport, handshake, heartbeat, event loop, command
//! router, REST client and session supervisor into one gateway client. It
//! is consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod heartbeat;
pub mod rest;
pub mod session;
pub mod supervisor;
pub mod transport;
