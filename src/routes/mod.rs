//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the admin API under `/api` with CORS and request tracing. Every
//! cabin route requires a staff bearer token; login is the only open
//! endpoint besides the health probe.

pub mod auth;
pub mod cabins;

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
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/cabins", get(cabins::list_cabins).post(cabins::create_cabin))
        .route(
            "/api/cabins/{id}",
            axum::routing::patch(cabins::update_cabin).delete(cabins::delete_cabin),
        )
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
