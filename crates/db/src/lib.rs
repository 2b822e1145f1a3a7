//! Persistence layer for Tally.
//!
//! `SeaORM` entities for the credit and debit tables, the repositories that
//! operate on them, the filtered-pagination engine they share, and the
//! schema migrations.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{CreditRepository, DebitRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Opens a connection pool against the given database URL.
///
/// # Errors
///
/// Returns an error when the database is unreachable.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
