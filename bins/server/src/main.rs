//! Tally server binary.
//!
//! Loads configuration, connects to Postgres, and serves the API.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router};
use tally_shared::{AppConfig, TokenConfig, TokenService};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load().context("could not load configuration")?;

    let db = tally_db::connect(&config.database.url)
        .await
        .context("could not connect to the database")?;
    info!("Connected to database");

    let tokens = TokenService::new(&TokenConfig {
        secret: config.jwt.secret.clone(),
        ttl_minutes: config.jwt.token_ttl_minutes,
    });

    let state = AppState {
        db: Arc::new(db),
        tokens: Arc::new(tokens),
    };

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    info!(%addr, "Server listening");

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
