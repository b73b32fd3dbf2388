//! Top-level facade crate for gatelink.
//!
//! Re-exports the protocol core and the gateway runtime so users can depend on a single crate.

pub mod core {
    pub use gatelink_core::*;
}

pub mod gateway {
    pub use gatelink_gateway::*;
}
