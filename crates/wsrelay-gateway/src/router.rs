//! Axum router wiring (HTTP + WS upgrade).

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, resources, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws/:client_id", get(transport::ws::ws_upgrade))
        .merge(resources::routes())
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
