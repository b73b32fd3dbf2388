//! Dispatch module exports.
//!
//! The event loop decodes inbound envelopes and hands interaction events to
//! the router, which resolves commands through the registry.

pub mod event_loop;
pub mod registry;
pub mod router;

#[cfg(test)]
pub(crate) mod fakes;

pub use event_loop::EventLoop;
pub use registry::{Autocomplete, Command, CommandRegistry};
pub use router::{suggest, CommandRouter, RouteOutcome};
