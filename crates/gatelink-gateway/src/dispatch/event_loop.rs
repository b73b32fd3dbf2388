//! Inbound event loop for one session.
//!
//! Reads frames until the connection fails or the gateway asks us to go
//! away. Per-event problems (bad JSON, wrong payload shape, handler or
//! delivery failure) are logged and the loop moves on to the next frame.

use std::sync::Arc;

use tracing::{debug, info, trace, warn, Instrument};

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::interaction::Interaction;
use gatelink_core::protocol::payload::{Ready, INTERACTION_CREATE, READY};
use gatelink_core::protocol::{Envelope, OpCode};

use crate::dispatch::router::CommandRouter;
use crate::heartbeat::beat_now;
use crate::session::Liveness;
use crate::transport::{ConnectionHandle, FrameReader};

pub struct EventLoop {
    handle: Arc<ConnectionHandle>,
    liveness: Arc<Liveness>,
    router: Arc<CommandRouter>,
}

impl EventLoop {
    pub fn new(
        handle: Arc<ConnectionHandle>,
        liveness: Arc<Liveness>,
        router: Arc<CommandRouter>,
    ) -> Self {
        Self {
            handle,
            liveness,
            router,
        }
    }

    /// Run until an escalating error; that error is returned.
    pub async fn run(&self, reader: &mut dyn FrameReader) -> GatewayError {
        loop {
            let frame = match reader.next_frame().await {
                Ok(f) => f,
                Err(e) => return e,
            };
            let env = match frame.decode() {
                Ok(env) => env,
                Err(e) => {
                    warn!(kind = e.kind().as_str(), error = %e, "dropping undecodable frame");
                    continue;
                }
            };
            if let Err(e) = self.handle_envelope(env).await {
                if e.escalates() {
                    return e;
                }
                warn!(kind = e.kind().as_str(), error = %e, "event failed");
            }
        }
    }

    /// Act on one decoded envelope.
    pub async fn handle_envelope(&self, env: Envelope) -> Result<()> {
        match env.opcode() {
            Some(OpCode::Dispatch) => self.on_dispatch(env).await,
            Some(OpCode::HeartbeatAck) => {
                self.liveness.ack();
                trace!("heartbeat ack");
                Ok(())
            }
            Some(OpCode::Heartbeat) => {
                debug!("gateway requested a heartbeat");
                beat_now(&self.handle, &self.liveness).await
            }
            Some(OpCode::Reconnect) => Err(GatewayError::ReconnectRequested),
            Some(OpCode::InvalidSession) => Err(GatewayError::SessionInvalidated),
            _ => {
                trace!(op = env.op, "ignoring envelope");
                Ok(())
            }
        }
    }

    async fn on_dispatch(&self, env: Envelope) -> Result<()> {
        match env.dispatch_sequence() {
            Some(seq) => self.liveness.observe(seq),
            None => warn!(event = ?env.dispatch_event(), "dispatch without sequence"),
        }

        match env.dispatch_event() {
            Some(INTERACTION_CREATE) => {
                let interaction: Interaction = env.reinterpret()?;
                let span = tracing::info_span!(
                    "interaction",
                    id = %interaction.id,
                    command = interaction.command_name().unwrap_or(""),
                );
                let outcome = self.router.route(interaction).instrument(span).await?;
                debug!(?outcome, "interaction routed");
                Ok(())
            }
            Some(READY) => {
                match env.reinterpret::<Ready>() {
                    Ok(ready) => info!(
                        session_id = %ready.session_id,
                        user = ready.user.as_ref().map(|u| u.username.as_str()).unwrap_or(""),
                        "gateway ready"
                    ),
                    Err(e) => warn!(error = %e, "unreadable READY payload"),
                }
                Ok(())
            }
            other => {
                trace!(event = ?other, "ignoring dispatch");
                Ok(())
            }
        }
    }
}
