//! Migration runner for the Tally database.
//!
//! Thin wrapper around the sea-orm-migration CLI; supports the usual
//! `up`, `down`, `status`, and `fresh` subcommands against `DATABASE_URL`.

use sea_orm_migration::prelude::*;

use tally_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
