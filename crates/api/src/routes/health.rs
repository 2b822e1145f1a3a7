//! Liveness probe, served unauthenticated.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::AppState;

/// Reports that the service is up, and which version is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Creates the health route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
