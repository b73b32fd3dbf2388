//! Heartbeat driver.
//!
//! Sends `{op: 1, d: <last sequence>}` once per interval until cancelled or
//! until a write fails. The first beat goes out one full interval after the
//! handshake. The driver never reconnects; it reports the failure and exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::Envelope;

use crate::session::Liveness;
use crate::transport::ConnectionHandle;

pub struct Heartbeat {
    handle: Arc<ConnectionHandle>,
    interval: Duration,
    liveness: Arc<Liveness>,
    require_ack: bool,
}

impl Heartbeat {
    pub fn new(
        handle: Arc<ConnectionHandle>,
        interval: Duration,
        liveness: Arc<Liveness>,
        require_ack: bool,
    ) -> Self {
        Self {
            handle,
            interval,
            liveness,
            require_ack,
        }
    }

    /// Run until `cancel` flips to `true` (or its sender is dropped).
    pub async fn run(self, mut cancel: watch::Receiver<bool>) -> Result<()> {
        let mut tick = time::interval_at(Instant::now() + self.interval, self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    let stop = changed.is_err() || *cancel.borrow();
                    if stop {
                        debug!("heartbeat cancelled");
                        return Ok(());
                    }
                }
                _ = tick.tick() => {
                    if self.require_ack && !self.liveness.take_ack() {
                        warn!("previous heartbeat was never acknowledged");
                        return Err(GatewayError::ZombieConnection);
                    }
                    beat_now(&self.handle, &self.liveness).await?;
                }
            }
        }
    }
}

/// Send one heartbeat carrying the sequence current at send time.
pub async fn beat_now(handle: &ConnectionHandle, liveness: &Liveness) -> Result<()> {
    let seq = liveness.last_sequence();
    handle.send(&Envelope::heartbeat(seq)?).await?;
    debug!(seq = ?seq, "heartbeat sent");
    Ok(())
}
