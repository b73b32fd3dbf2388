//! Session supervisor.
//!
//! Owns the connect -> handshake -> heartbeat + event loop cycle. Any
//! escalating failure ends the current session; the supervisor closes the
//! old connection, waits out the backoff, and starts over. Only one session
//! is active at a time.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::time;
use tracing::{debug, error, info, warn};

use gatelink_core::error::{GatewayError, Result};
use gatelink_core::protocol::payload::Identify;

use crate::dispatch::{CommandRouter, EventLoop};
use crate::heartbeat::Heartbeat;
use crate::session::{Liveness, Session};
use crate::transport::handshake::negotiate;
use crate::transport::{ConnectionHandle, Connector};

/// How long a cancelled heartbeat task gets to wind down before it is aborted.
const HEARTBEAT_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Exponential backoff between reconnect attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial: Duration,
    pub max: Duration,
    /// Consecutive failed attempts tolerated; `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(60),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 || self.initial.is_zero() {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor).min(self.max)
    }
}

#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub gateway_url: String,
    pub identify: Identify,
    pub require_heartbeat_ack: bool,
    pub reconnect: ReconnectPolicy,
}

pub struct GatewayClient {
    options: GatewayOptions,
    connector: Arc<dyn Connector>,
    router: Arc<CommandRouter>,
    liveness: Arc<Liveness>,
    current: Mutex<Option<Arc<ConnectionHandle>>>,
    attempts: AtomicU32,
    recoveries: AtomicU64,
    shutdown: watch::Sender<bool>,
}

impl GatewayClient {
    pub fn new(
        options: GatewayOptions,
        connector: Arc<dyn Connector>,
        router: Arc<CommandRouter>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            options,
            connector,
            router,
            liveness: Arc::new(Liveness::new()),
            current: Mutex::new(None),
            attempts: AtomicU32::new(0),
            recoveries: AtomicU64::new(0),
            shutdown,
        }
    }

    /// Connect and negotiate a fresh session. The new connection becomes the
    /// current one even if the handshake fails, so `recover` can close it.
    pub async fn ensure_connected(&self) -> Result<Session> {
        let url = &self.options.gateway_url;
        debug!(%url, "connecting to gateway");
        let (writer, mut reader) = self.connector.connect(url).await?;
        let handle = Arc::new(ConnectionHandle::new(writer));
        *self.current.lock().await = Some(Arc::clone(&handle));

        let hello = negotiate(&handle, reader.as_mut(), &self.options.identify).await?;
        self.liveness.reset();
        info!(interval_ms = hello.heartbeat_interval, "gateway session established");

        Ok(Session {
            handle,
            reader,
            heartbeat_interval: Duration::from_millis(hello.heartbeat_interval),
            liveness: Arc::clone(&self.liveness),
        })
    }

    /// Tear down after `err` and wait out the backoff. Fails once the
    /// attempt budget is spent.
    pub async fn recover(&self, err: GatewayError) -> Result<()> {
        self.recoveries.fetch_add(1, Ordering::Relaxed);
        let attempt = self.attempts.fetch_add(1, Ordering::AcqRel) + 1;
        warn!(kind = err.kind().as_str(), error = %err, attempt, "gateway session lost");

        self.close_current().await;

        if let Some(max) = self.options.reconnect.max_attempts {
            if attempt > max {
                error!(attempts = max, "reconnect attempts exhausted");
                return Err(GatewayError::RetriesExhausted { attempts: max });
            }
        }

        let delay = self.options.reconnect.delay_for(attempt);
        if !delay.is_zero() {
            info!(delay_ms = delay.as_millis() as u64, "reconnecting after backoff");
            let mut shutdown = self.shutdown.subscribe();
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = shutdown_requested(&mut shutdown) => {}
            }
        }
        Ok(())
    }

    /// Supervise sessions until `shutdown` or until reconnects are exhausted.
    pub async fn run(&self) -> Result<()> {
        let mut shutdown = self.shutdown.subscribe();
        loop {
            if *shutdown.borrow() {
                break;
            }
            let connected = tokio::select! {
                res = self.ensure_connected() => res,
                _ = shutdown_requested(&mut shutdown) => break,
            };
            let err = match connected {
                Ok(session) => {
                    self.attempts.store(0, Ordering::Release);
                    match self.run_session(session, &mut shutdown).await {
                        Some(err) => err,
                        None => break,
                    }
                }
                Err(err) => err,
            };
            self.recover(err).await?;
        }

        self.close_current().await;
        info!("gateway client stopped");
        Ok(())
    }

    /// Drive one session. Returns the error that ended it, or `None` on
    /// shutdown.
    async fn run_session(
        &self,
        session: Session,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Option<GatewayError> {
        let Session {
            handle,
            mut reader,
            heartbeat_interval,
            liveness,
        } = session;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let heartbeat = Heartbeat::new(
            Arc::clone(&handle),
            heartbeat_interval,
            Arc::clone(&liveness),
            self.options.require_heartbeat_ack,
        );
        let mut beat_task = tokio::spawn(heartbeat.run(cancel_rx));
        let events = EventLoop::new(handle, liveness, Arc::clone(&self.router));

        let outcome = tokio::select! {
            err = events.run(reader.as_mut()) => Some(err),
            joined = &mut beat_task => Some(match joined {
                Ok(Ok(())) => GatewayError::Transport("heartbeat stopped".into()),
                Ok(Err(e)) => e,
                Err(e) => GatewayError::Transport(format!("heartbeat task failed: {e}")),
            }),
            _ = shutdown_requested(shutdown) => None,
        };

        let _ = cancel_tx.send(true);
        if !beat_task.is_finished()
            && time::timeout(HEARTBEAT_JOIN_TIMEOUT, &mut beat_task).await.is_err()
        {
            warn!("heartbeat did not stop in time; aborting");
            beat_task.abort();
        }
        outcome
    }

    async fn close_current(&self) {
        let previous = self.current.lock().await.take();
        if let Some(handle) = previous {
            if let Err(e) = handle.close().await {
                debug!(error = %e, "close of previous connection failed");
            }
        }
    }

    /// Ask `run` to stop; safe to call from any task.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Latest dispatch sequence of the current (or last) session.
    pub fn last_sequence(&self) -> Option<u64> {
        self.liveness.last_sequence()
    }

    /// Number of recoveries performed so far.
    pub fn recoveries(&self) -> u64 {
        self.recoveries.load(Ordering::Relaxed)
    }
}

async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
