//! wsRelay gateway binary.
//!
//! - WebSocket endpoint: /ws/:client_id (join/echo/relay/leave notices)
//! - Resource CRUD: /categories, /items, /users (mutations broadcast to all sessions)
//! - Ops: /healthz, /readyz, /metrics
//! - Graceful shutdown on Ctrl+C / SIGTERM

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use wsrelay_core::error::{Result, WsRelayError};
use wsrelay_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "wsrelay-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.gateway.listen.parse().map_err(|e| {
        WsRelayError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}"))
    })?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "wsrelay-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| WsRelayError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| WsRelayError::Internal(format!("server failed: {e}")))?;

    tracing::info!("wsrelay-gateway stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!(sessions = state.registry().len(), "signal received, starting graceful shutdown");
    state.begin_shutdown();
}
