//! gatelink gateway client.
//!
//! Usage: `gatelink-gateway [config.yaml]`. Without a path the config comes
//! from the environment (and `.env`, when present).

use tracing_subscriber::{fmt, EnvFilter};

use gatelink_core::error::{GatewayError, Result};
use gatelink_gateway::{app_state::AppState, config};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(&path)?,
        None => config::load_from_env()?,
    };
    tracing::info!(
        gateway = %cfg.discord.gateway_url,
        guild = %cfg.discord.guild_id,
        "gatelink starting"
    );

    let state = AppState::new(cfg)?;
    state.register_slash_commands().await;

    let client = state.client().clone();
    let mut supervisor = tokio::spawn(async move { client.run().await });

    tokio::select! {
        res = &mut supervisor => {
            return res.map_err(join_error)?;
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received");
            state.client().shutdown();
        }
    }

    supervisor.await.map_err(join_error)?
}

fn join_error(e: tokio::task::JoinError) -> GatewayError {
    GatewayError::Transport(format!("supervisor task failed: {e}"))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
