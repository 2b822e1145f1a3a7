//! Initial migration creating the credits and debits tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS credits CASCADE; DROP TABLE IF EXISTS debits CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r#"
-- Credits: funds paid into an account
CREATE TABLE credits (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_id TEXT NOT NULL,
    amount NUMERIC(19, 4),
    description TEXT NOT NULL,
    "from" TEXT NOT NULL,
    date TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Indexes for the equality filters and default ordering
CREATE INDEX idx_credits_account ON credits(account_id);
CREATE INDEX idx_credits_from ON credits("from");
CREATE INDEX idx_credits_date ON credits(date);
CREATE INDEX idx_credits_created_at ON credits(created_at);

-- Debits: funds paid out of an account
CREATE TABLE debits (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_id TEXT NOT NULL,
    amount NUMERIC(19, 4),
    description TEXT NOT NULL,
    "to" TEXT NOT NULL,
    date TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_debits_account ON debits(account_id);
CREATE INDEX idx_debits_to ON debits("to");
CREATE INDEX idx_debits_date ON debits(date);
CREATE INDEX idx_debits_created_at ON debits(created_at);
"#;
