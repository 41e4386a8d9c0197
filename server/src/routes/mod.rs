//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! A single Axum router serves the liveness endpoints and the form-processing
//! endpoint the query client posts to. CORS is open to any origin because the
//! client may be served from a different host.

pub mod form;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(hello))
        .route("/healthz", get(healthz))
        .route("/process_form", post(form::process_form))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Lets a browser or curl confirm the server is up.
async fn hello() -> &'static str {
    "Hello, World!"
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
