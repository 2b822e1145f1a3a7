//! Axum HTTP surface for Tally.
//!
//! Routes for the two record resources, the bearer-token middleware in
//! front of them, and the request/response DTOs.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tally_shared::TokenService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Verifier for bearer tokens.
    pub tokens: Arc<TokenService>,
}

/// Assembles the application router with tracing and CORS applied.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
