//! Axum router wiring.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, http, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/metrics", get(http::get_metrics))
        .route("/api/v1/transactions", post(http::post_transaction))
        .route("/api/v1/signals", post(http::post_signal))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
