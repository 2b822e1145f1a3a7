//! Route tables for the API.

use axum::{Router, middleware};

use crate::{AppState, middleware::require_auth};

pub mod credits;
pub mod debits;
pub mod health;

/// Wires up the public and token-protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Every credit and debit route sits behind the auth middleware.
    let protected = Router::new()
        .merge(credits::routes())
        .merge(debits::routes())
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().merge(health::routes()).merge(protected)
}
