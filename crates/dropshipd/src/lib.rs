//! Assembly of the dropship daemon: history store, deployer and API router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tracing::{error, info, warn};

use dropship_api::auth::StaticSessions;
use dropship_api::{ApiState, build_router};
use dropship_core::{DeployMode, DropshipConfig};
use dropship_deploy::{Orchestrator, deployer_for};
use dropship_state::HistoryStore;

/// File name of the history database inside `[server] data_dir`.
pub const HISTORY_DB: &str = "history.redb";

/// Build the full application router for `config`.
pub fn build_app(config: &DropshipConfig, mode: DeployMode) -> anyhow::Result<Router> {
    std::fs::create_dir_all(&config.server.data_dir)?;
    let db_path = config.server.data_dir.join(HISTORY_DB);
    let history = HistoryStore::open(&db_path)?;
    info!(path = ?db_path, "history store opened");

    match mode {
        DeployMode::Live => info!(
            flyctl = %config.deploy.flyctl,
            region = %config.deploy.region,
            "deploying to the hosting platform"
        ),
        DeployMode::Simulated => warn!(
            delay_ms = config.simulation.delay_ms,
            "simulation mode: no real deployments will be made"
        ),
    }
    let orchestrator = Orchestrator::new(deployer_for(mode, config));

    if config.auth.tokens.is_empty() {
        warn!("no session tokens configured; deployment history is unreachable");
    }
    let sessions = Arc::new(StaticSessions::new(config.auth.tokens.clone()));

    Ok(build_router(ApiState::new(orchestrator, history, sessions)))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: DropshipConfig, mode: DeployMode) -> anyhow::Result<()> {
    info!("dropship daemon starting");

    let router = build_app(&config, mode)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("dropship daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
    }
}
