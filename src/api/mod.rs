// src/api/mod.rs

pub mod lighthouse;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::models::AppState;

pub use lighthouse::{queue_status_handler, run_lighthouse_handler};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/run-lighthouse", post(run_lighthouse_handler))
        .route("/queue", get(queue_status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
