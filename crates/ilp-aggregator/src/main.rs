//! ILP aggregator service.
//!
//! - Transaction ingestion: POST /api/v1/transactions
//! - Operational signals:   POST /api/v1/signals
//! - Dashboard metrics:     GET  /api/v1/metrics
//! - Ops: /healthz, /readyz, /metrics

use tracing_subscriber::{fmt, EnvFilter};

use ilp_aggregator::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, code = e.client_code().as_str(), "ilp-aggregator failed");
        std::process::exit(1);
    }
}

async fn run() -> ilp_core::Result<()> {
    let state = app_state::AppState::new(config::load_from_env()?)?;
    let listen = state.cfg().service.listen_addr()?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "ilp-aggregator starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ilp_core::IlpError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown(state))
        .await
        .map_err(|e| ilp_core::IlpError::Internal(format!("server failed: {e}")))
}

async fn shutdown(state: app_state::AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable; serving until killed");
        std::future::pending::<()>().await;
    }
    state.set_draining();
    tracing::info!("draining; shutting down");
}
